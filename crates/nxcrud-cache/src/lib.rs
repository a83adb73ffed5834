//! Optional memoization of serialized objects.
//!
//! The engine works the same with or without a cache; a bound cache only
//! short-circuits repeated serialization of identified exposable objects.
//!
//! # Key Types
//!
//! - [`SerializationCache`] -- the capability the engine talks to
//! - [`InMemoryCache`] -- `HashMap`-based backend with tag invalidation
//! - [`CacheEnvironment`] -- per-call stack collecting tags of nested objects
//! - [`cache_identifier`] -- cache key of an object within a processor group
//!
//! # Tags
//!
//! Serializing an object tags the result with the object's identity and the
//! identities of everything serialized beneath it. Flushing a tag drops every
//! entry that includes that object.

pub mod environment;
pub mod error;
pub mod key;
pub mod memory;
pub mod traits;

pub use environment::CacheEnvironment;
pub use error::{CacheError, CacheResult};
pub use key::{cache_identifier, identity_tag};
pub use memory::InMemoryCache;
pub use traits::SerializationCache;
