//! URI resolution for deferred pointers and persistent resources.
//!
//! The serialization engine never builds URIs itself. It hands every
//! [`Pointer`](nxcrud_types::Pointer) and [`ResourceRef`](nxcrud_types::ResourceRef)
//! to a [`Resolver`] and embeds the returned string.
//!
//! # Implementations
//!
//! - [`RouteTable`] -- template-based routes keyed by controller action
//! - [`PersistentResourceLocator`] -- public URIs for stored resources
//! - [`RoutingResolver`] -- both of the above behind one [`Resolver`]
//!
//! Resolution is synchronous and expected to be local. An implementation
//! that has to do I/O must fail fast rather than block the caller.

pub mod error;
pub mod resource;
pub mod routes;
pub mod traits;

pub use error::{ResolveError, ResolveResult};
pub use resource::PersistentResourceLocator;
pub use routes::{Route, RouteTable};
pub use traits::{Resolver, RoutingResolver};
