use nxcrud_types::{Arguments, ResourceRef};

use crate::error::ResolveResult;
use crate::resource::PersistentResourceLocator;
use crate::routes::RouteTable;

/// Turns deferred references into final URI strings.
///
/// Both methods are called synchronously during the tree walk. An error
/// aborts the whole serialization call; no partial output is produced.
pub trait Resolver: Send + Sync {
    /// Build the URI of a controller action.
    fn resolve_pointer(
        &self,
        action: &str,
        arguments: &Arguments,
        controller: Option<&str>,
        package: Option<&str>,
        sub_package: Option<&str>,
    ) -> ResolveResult<String>;

    /// Public URI of a persistent resource.
    fn resolve_resource(&self, resource: &ResourceRef) -> ResolveResult<String>;
}

/// A [`RouteTable`] for pointers and a [`PersistentResourceLocator`] for
/// resources.
#[derive(Clone, Debug, Default)]
pub struct RoutingResolver {
    routes: RouteTable,
    resources: PersistentResourceLocator,
}

impl RoutingResolver {
    pub fn new(routes: RouteTable, resources: PersistentResourceLocator) -> Self {
        Self { routes, resources }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn resources(&self) -> &PersistentResourceLocator {
        &self.resources
    }
}

impl Resolver for RoutingResolver {
    fn resolve_pointer(
        &self,
        action: &str,
        arguments: &Arguments,
        controller: Option<&str>,
        package: Option<&str>,
        sub_package: Option<&str>,
    ) -> ResolveResult<String> {
        self.routes
            .uri_for(action, arguments, controller, package, sub_package)
    }

    fn resolve_resource(&self, resource: &ResourceRef) -> ResolveResult<String> {
        self.resources.public_uri(resource)
    }
}
