//! Serialization engine for REST resources.
//!
//! [`SerializationService::process`] walks a [`Value`](nxcrud_types::Value)
//! into a JSON tree, resolving pointers and resources through a
//! [`Resolver`](nxcrud_resolve::Resolver), then runs the metadata processors
//! of the requested processor group over every leaf. Metadata lands next to
//! the data under `path#key`:
//!
//! ```text
//! {"items": ["/items/1"]}   ->   {"items": {"0": "/items/1", "0#content": {..}}}
//! ```
//!
//! # Key Types
//!
//! - [`SerializationService`] -- the engine; shareable, re-entrant
//! - [`EngineConfig`] -- depth limit and date format
//! - [`JsonView`] -- renders controller variables with the action's group
//! - [`processors`] -- built-in processors and catalog helpers
//!
//! # Call Isolation
//!
//! Each call owns its path, its bindings and one storage slot per binding.
//! Processors that serialize nested objects start a fresh call; the outer
//! call's state is unaffected. Concurrent calls share nothing mutable except
//! an optional cache.

pub mod config;
pub mod context;
pub mod error;
pub mod metadata;
pub mod processors;
pub mod service;
pub mod view;
mod walk;

pub use config::EngineConfig;
pub use context::CallState;
pub use error::{EngineError, EngineResult};
pub use metadata::METADATA_SEPARATOR;
pub use processors::{
    builtin_catalog, register_builtins, register_remote_content, ContentFetcher, FetchedContent,
    NestedObjectProcessor, RemoteContentProcessor, StaticMetaDataProcessor,
};
pub use service::SerializationService;
pub use view::JsonView;
