mod common;

use std::sync::Arc;

use chrono::{FixedOffset, TimeZone};
use nxcrud_engine::{EngineConfig, EngineError, JsonView};
use nxcrud_registry::{
    MetaDataProcessor, Metadata, ProcessorError, ProcessorRegistry, ProcessorScope,
    ProcessorSettings, ProcessorStorage, RegistryConfig, RegistryError, StaticConfig,
};
use nxcrud_types::{Exposable, ResourceRef, Value};
use serde_json::{json, Value as JsonValue};

use common::{catalog, catalog_with, options, resolver, service, show, GROUP};

const SHA1: &str = "a94a8fe5ccb19ba61c4c0873d391e987982fbbd3";

fn plain() -> nxcrud_engine::SerializationService {
    service(ProcessorSettings::new(), catalog())
}

// ---------------------------------------------------------------------------
// 1. Leaf kinds
// ---------------------------------------------------------------------------

#[test]
fn temporal_uses_w3c_format() {
    let moment = FixedOffset::east_opt(3600)
        .unwrap()
        .with_ymd_and_hms(2024, 1, 31, 12, 0, 0)
        .unwrap();
    let out = plain()
        .process(&Value::keyed([("created", moment)]), &resolver(), None)
        .unwrap();
    assert_eq!(out, json!({"created": "2024-01-31T12:00:00+01:00"}));
}

#[test]
fn temporal_format_is_configurable() {
    let moment = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 1, 31, 12, 0, 0)
        .unwrap();
    let service = plain().with_config(EngineConfig {
        date_format: "%d.%m.%Y".into(),
        ..Default::default()
    });
    let out = service.process(&Value::from(moment), &resolver(), None).unwrap();
    assert_eq!(out, json!("31.01.2024"));
}

#[test]
fn resource_resolves_to_public_uri() {
    let out = plain()
        .process(
            &Value::keyed([("image", ResourceRef::new(SHA1, "chair.png"))]),
            &resolver(),
            None,
        )
        .unwrap();
    assert_eq!(
        out,
        json!({"image": format!("https://cdn.example.com/_Resources/Persistent/{SHA1}/chair.png")})
    );
}

#[test]
fn opaque_values_become_null() {
    struct Connection;
    let out = plain()
        .process(
            &Value::sequence([Value::opaque(Connection), Value::from(1i64)]),
            &resolver(),
            None,
        )
        .unwrap();
    assert_eq!(out, json!([null, 1]));
}

#[test]
fn exposable_declared_names_only() {
    struct Partial;
    impl Exposable for Partial {
        fn exposed_property_names(&self) -> Vec<String> {
            vec!["b".into(), "a".into(), "missing".into()]
        }
        fn property(&self, name: &str) -> Option<Value> {
            match name {
                "a" => Some(Value::from(1i64)),
                "b" => Some(Value::from(2i64)),
                "secret" => Some(Value::from("x")),
                _ => None,
            }
        }
    }
    let out = plain()
        .process(&Value::exposable(Partial), &resolver(), None)
        .unwrap();
    assert_eq!(out.to_string(), r#"{"b":2,"a":1,"missing":null}"#);
}

#[test]
fn cyclic_graph_is_rejected() {
    struct Endless;
    impl Exposable for Endless {
        fn exposed_property_names(&self) -> Vec<String> {
            vec!["next".into()]
        }
        fn property(&self, _name: &str) -> Option<Value> {
            Some(Value::exposable(Endless))
        }
    }
    let err = plain()
        .with_config(EngineConfig {
            max_depth: 8,
            ..Default::default()
        })
        .process(&Value::exposable(Endless), &resolver(), None)
        .unwrap_err();
    match err {
        EngineError::DepthExceeded { limit, path } => {
            assert_eq!(limit, 8);
            assert_eq!(path.split('.').count(), 8);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn json_encode_returns_string() {
    let encoded = plain()
        .json_encode(&Value::keyed([("item", show("3"))]), &resolver(), None)
        .unwrap();
    assert_eq!(encoded, r#"{"item":"/items/3"}"#);
}

// ---------------------------------------------------------------------------
// 2. Registry and processor failures
// ---------------------------------------------------------------------------

#[test]
fn strict_registry_fails_the_call() {
    let settings = ProcessorSettings::new()
        .with_group(GROUP, ["ghost"])
        .with_processor("ghost", "^a$", "does-not-exist");
    let registry = ProcessorRegistry::with_config(
        Arc::new(StaticConfig::new(settings)),
        catalog(),
        RegistryConfig { strict: true },
    );
    let err = nxcrud_engine::SerializationService::new(registry)
        .process(&Value::from_json(json!({"a": 1})), &resolver(), Some(GROUP))
        .unwrap_err();
    assert!(matches!(err, EngineError::Registry(RegistryError::UnknownProcessor(_))));
}

#[test]
fn lenient_registry_skips_invalid_bindings() {
    let settings = ProcessorSettings::new()
        .with_group(GROUP, ["ghost", "flag"])
        .with_processor("ghost", "^a$", "does-not-exist")
        .with_configured_processor("flag", "^a$", "static", options(json!({"flag": true})));
    let out = service(settings, catalog())
        .process(&Value::from_json(json!({"a": 1})), &resolver(), Some(GROUP))
        .unwrap();
    assert_eq!(out, json!({"a": 1, "a#flag": true}));
}

const MISTYPED_SETTINGS: &str = r#"
    [groups]
    good = ["flag"]
    other = ["bad"]

    [processors.flag]
    path = "^title$"
    processor = "static"
    options = { flag = true }

    [processors.bad]
    path = 5
    processor = "static"
"#;

#[test]
fn mistyped_binding_only_affects_its_group() {
    let settings = ProcessorSettings::from_toml_str(MISTYPED_SETTINGS).unwrap();
    let service = service(settings, catalog());
    let value = Value::from_json(json!({"title": "Chair"}));

    let good = service.process(&value, &resolver(), Some("good")).unwrap();
    assert_eq!(good, json!({"title": "Chair", "title#flag": true}));

    let other = service.process(&value, &resolver(), Some("other")).unwrap();
    assert_eq!(other, json!({"title": "Chair"}));
}

#[test]
fn strict_registry_rejects_mistyped_binding() {
    let settings = ProcessorSettings::from_toml_str(MISTYPED_SETTINGS).unwrap();
    let registry = ProcessorRegistry::with_config(
        Arc::new(StaticConfig::new(settings)),
        catalog(),
        RegistryConfig { strict: true },
    );
    let service = nxcrud_engine::SerializationService::new(registry);
    let value = Value::from_json(json!({"title": "Chair"}));

    assert!(service.process(&value, &resolver(), Some("good")).is_ok());
    let err = service
        .process(&value, &resolver(), Some("other"))
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Registry(RegistryError::InvalidBinding { ref binding, .. }) if binding == "bad"
    ));
}

struct Explode;

impl MetaDataProcessor for Explode {
    fn name(&self) -> &str {
        "explode"
    }

    fn process(
        &self,
        _metadata: Metadata,
        property_path: &str,
        _processed_value: &JsonValue,
        _storage: &mut ProcessorStorage,
        _source: &Value,
        _scope: &dyn ProcessorScope,
    ) -> Result<Metadata, ProcessorError> {
        Err(ProcessorError::failed(format!("cannot enrich {property_path}")))
    }
}

#[test]
fn processor_failure_is_attributed() {
    let settings = ProcessorSettings::new()
        .with_group(GROUP, ["boom"])
        .with_processor("boom", "^a$", "explode");
    let err = service(settings, catalog_with("explode", Arc::new(Explode)))
        .process(&Value::from_json(json!({"a": 1})), &resolver(), Some(GROUP))
        .unwrap_err();
    assert_eq!(err.to_string(), "processor 'boom' failed: cannot enrich a");
}

// ---------------------------------------------------------------------------
// 3. JsonView
// ---------------------------------------------------------------------------

#[test]
fn action_identifier_format() {
    assert_eq!(
        JsonView::action_identifier("Acme\\Controller\\ItemController", "show"),
        GROUP
    );
}

#[test]
fn single_variable_renders_directly() {
    let settings = ProcessorSettings::new()
        .with_group(GROUP, ["flag"])
        .with_configured_processor("flag", "^title$", "static", options(json!({"flag": true})));
    let service = service(settings, catalog());
    let mut view = JsonView::new(&service);
    view.assign("value", Value::from_json(json!({"title": "Chair"})));
    assert_eq!(
        view.render_value(&resolver(), GROUP).unwrap(),
        json!({"title": "Chair", "title#flag": true})
    );
    assert_eq!(
        view.render(&resolver(), GROUP).unwrap(),
        r#"{"title":"Chair","title#flag":true}"#
    );
}

#[test]
fn unassigned_single_variable_is_null() {
    let service = plain();
    let view = JsonView::new(&service);
    assert_eq!(view.render_value(&resolver(), GROUP).unwrap(), JsonValue::Null);
}

#[test]
fn several_variables_render_as_object() {
    let service = plain();
    let mut view = JsonView::new(&service);
    view.assign("item", show("1"))
        .assign("count", 2i64)
        .set_variables_to_render(["item", "count", "missing"]);
    assert_eq!(
        view.render_value(&resolver(), GROUP).unwrap(),
        json!({"item": "/items/1", "count": 2, "missing": null})
    );
}

#[test]
fn nothing_to_render_is_an_empty_array() {
    let service = plain();
    let mut view = JsonView::new(&service);
    view.assign("item", show("1"))
        .set_variables_to_render(Vec::<String>::new());
    assert_eq!(view.render_value(&resolver(), GROUP).unwrap(), json!([]));
    assert_eq!(view.render(&resolver(), GROUP).unwrap(), "[]");
}
