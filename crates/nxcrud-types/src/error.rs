use thiserror::Error;

/// Errors produced while building values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("property \"{0}\" is not an allowed argument for a pointer")]
    UnknownPointerProperty(String),

    #[error("pointer property \"{property}\" must be {expected}")]
    InvalidPointerProperty {
        property: String,
        expected: &'static str,
    },

    #[error("pointer requires an action name")]
    MissingAction,
}
