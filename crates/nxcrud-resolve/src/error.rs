/// Errors from pointer and resource resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No route matches the pointer's action and scopes.
    #[error("no route for action '{action}' (controller: {controller:?}, package: {package:?})")]
    UnknownRoute {
        action: String,
        controller: Option<String>,
        package: Option<String>,
    },

    /// The route template needs an argument the pointer does not carry.
    #[error("route '{template}' requires argument '{argument}'")]
    MissingArgument { template: String, argument: String },

    /// An argument has no text form (containers, opaque objects, ...).
    #[error("argument '{argument}' of kind {kind} cannot be rendered into a URI")]
    UnrenderableArgument { argument: String, kind: &'static str },

    /// The route template is malformed.
    #[error("invalid route template '{0}'")]
    InvalidTemplate(String),

    /// The resource reference cannot be turned into a URI.
    #[error("invalid resource: {0}")]
    InvalidResource(String),

    /// Route configuration could not be parsed.
    #[error("route configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// A resolver backend failed.
    #[error("resolver backend error: {0}")]
    Backend(String),
}

/// Result alias for resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;
