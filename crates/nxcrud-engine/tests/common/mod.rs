#![allow(dead_code)]

use std::sync::Arc;

use nxcrud_engine::{builtin_catalog, SerializationService};
use nxcrud_registry::{
    MetaDataProcessor, ProcessorCatalog, ProcessorOptions, ProcessorRegistry, ProcessorSettings,
    StaticConfig,
};
use nxcrud_resolve::{PersistentResourceLocator, Route, RouteTable, RoutingResolver};
use nxcrud_types::{Pointer, Value};
use serde_json::Value as JsonValue;

pub const GROUP: &str = "Acme\\Controller\\ItemController\\showAction";

pub fn resolver() -> RoutingResolver {
    RoutingResolver::new(
        RouteTable::new("")
            .with_route(Route::new("show", "/items/{id}"))
            .with_route(Route::new("list", "/items")),
        PersistentResourceLocator::new("https://cdn.example.com"),
    )
}

pub fn show(id: impl Into<Value>) -> Pointer {
    Pointer::builder("show").argument("id", id).build()
}

pub fn options(json: JsonValue) -> ProcessorOptions {
    match json {
        JsonValue::Object(map) => map,
        other => panic!("options must be an object, got {other}"),
    }
}

/// Catalog with the built-in processors.
pub fn catalog() -> ProcessorCatalog {
    builtin_catalog()
}

/// Catalog with the built-in processors plus `processor` as `name`.
pub fn catalog_with(name: &str, processor: Arc<dyn MetaDataProcessor>) -> ProcessorCatalog {
    let mut catalog = builtin_catalog();
    catalog.register(name, processor);
    catalog
}

pub fn service(settings: ProcessorSettings, catalog: ProcessorCatalog) -> SerializationService {
    SerializationService::new(ProcessorRegistry::new(
        Arc::new(StaticConfig::new(settings)),
        catalog,
    ))
}
