//! Metadata processor registry.
//!
//! Metadata is out-of-band data attached next to a node of the serialized
//! tree: links, pre-fetched nested content, computed flags. Which processors
//! run is configured per *processor group* (typically one per API endpoint):
//! each group is an ordered list of bindings, and each binding pairs a
//! property-path pattern with a [`MetaDataProcessor`].
//!
//! # Resolution
//!
//! [`ProcessorRegistry::resolve_group`] loads [`ProcessorSettings`] from a
//! [`ConfigSource`] on every call, so configuration changes apply to the next
//! serialization. Processor references are looked up in a
//! [`ProcessorCatalog`].
//!
//! # Invalid bindings
//!
//! By default a binding with a missing or broken pattern, or an unknown
//! processor reference, is skipped with a warning and resolution continues.
//! With [`RegistryConfig::strict`] the first invalid binding fails the call.
//! An unknown group name always yields no bindings.

pub mod binding;
pub mod catalog;
pub mod error;
pub mod pattern;
pub mod processor;
pub mod registry;
pub mod settings;
pub mod source;

pub use binding::ProcessorBinding;
pub use catalog::{ProcessorCatalog, ProcessorOptions};
pub use error::{ProcessorError, RegistryError, RegistryResult};
pub use pattern::compile_pattern;
pub use processor::{MetaDataProcessor, Metadata, ProcessorScope, ProcessorStorage};
pub use registry::{BindingIssue, ProcessorRegistry, RegistryConfig};
pub use settings::{GroupMembers, IndividualSettings, ProcessorSettings};
pub use source::{ConfigSource, StaticConfig, TomlFileConfig};
