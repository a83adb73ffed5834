//! Foundation types for the nxcrud serialization engine.
//!
//! Every value handed to the engine is a [`Value`]. The variants cover what a
//! REST payload can be built from: plain scalars, ordered sequences, keyed
//! containers, exposable domain objects, date/time values, deferred URI
//! pointers and persistent resources. Anything else is an [`OpaqueObject`],
//! which serializes to `null` unless a [`DtoFactory`] knows how to expose it.
//!
//! # Key Types
//!
//! - [`Value`]: the polymorphic input value
//! - [`Pointer`]: deferred reference to a URI (action + arguments)
//! - [`ResourceRef`]: persistent resource resolvable to a public URI
//! - [`Exposable`]: object declaring the ordered list of properties it exposes
//! - [`DtoFactory`]: maps opaque domain objects onto exposable DTOs
//! - [`DEFAULT_DATE_FORMAT`]: the date/time text format of the wire contract

pub mod dto;
pub mod error;
pub mod exposable;
pub mod pointer;
pub mod resource;
pub mod temporal;
pub mod value;

pub use dto::{DtoFactory, MappedDtoFactory, OpaqueObject};
pub use error::TypeError;
pub use exposable::{Dto, Exposable};
pub use pointer::{Arguments, Pointer, PointerBuilder};
pub use resource::ResourceRef;
pub use temporal::{format_temporal, DEFAULT_DATE_FORMAT};
pub use value::{Scalar, Value};

/// Separator between the segments of a property path.
pub const PATH_SEPARATOR: char = '.';
