use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::binding::ProcessorBinding;
use crate::catalog::ProcessorCatalog;
use crate::error::{RegistryError, RegistryResult};
use crate::pattern::compile_pattern;
use crate::settings::{IndividualSettings, ProcessorSettings};
use crate::source::ConfigSource;

/// Registry behaviour.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Fail on the first invalid binding instead of skipping it.
    #[serde(default)]
    pub strict: bool,
}

/// A binding that could not be resolved, as reported by
/// [`ProcessorRegistry::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingIssue {
    pub group: String,
    /// Empty when the group value itself is malformed.
    pub binding: String,
    pub reason: String,
}

/// Resolves processor groups to ordered bindings.
pub struct ProcessorRegistry {
    source: Arc<dyn ConfigSource>,
    catalog: ProcessorCatalog,
    config: RegistryConfig,
}

impl ProcessorRegistry {
    pub fn new(source: Arc<dyn ConfigSource>, catalog: ProcessorCatalog) -> Self {
        Self::with_config(source, catalog, RegistryConfig::default())
    }

    pub fn with_config(
        source: Arc<dyn ConfigSource>,
        catalog: ProcessorCatalog,
        config: RegistryConfig,
    ) -> Self {
        Self {
            source,
            catalog,
            config,
        }
    }

    pub fn catalog(&self) -> &ProcessorCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Load the current settings from the configured source.
    pub fn settings(&self) -> RegistryResult<ProcessorSettings> {
        self.source.load()
    }

    /// Bindings of `group`, in configured order.
    ///
    /// No group, an empty group name, or a group missing from the settings
    /// all yield an empty list.
    pub fn resolve_group(&self, group: Option<&str>) -> RegistryResult<Vec<ProcessorBinding>> {
        let Some(group) = group.filter(|g| !g.is_empty()) else {
            return Ok(Vec::new());
        };
        let settings = self.source.load()?;
        let Some(members) = settings.groups.get(group) else {
            debug!(group, "processor group not configured");
            return Ok(Vec::new());
        };
        if let Some(reason) = members.malformed() {
            if self.config.strict {
                return Err(RegistryError::InvalidGroup {
                    group: group.to_string(),
                    reason: reason.to_string(),
                });
            }
            warn!(group, reason, "skipping malformed processor group");
            return Ok(Vec::new());
        }

        let mut bindings = Vec::new();
        for name in members.names() {
            match self.bind(&name, settings.processors.get(&name)) {
                Ok(binding) => bindings.push(binding),
                Err(err) if self.config.strict => return Err(err),
                Err(err) => {
                    warn!(group, binding = %name, error = %err, "skipping invalid processor binding");
                }
            }
        }
        debug!(group, bindings = bindings.len(), "resolved processor group");
        Ok(bindings)
    }

    /// Check every group in the settings and report bindings that would be
    /// skipped (or rejected in strict mode).
    pub fn validate(&self) -> RegistryResult<Vec<BindingIssue>> {
        let settings = self.source.load()?;
        let mut issues = Vec::new();
        for (group, members) in &settings.groups {
            if let Some(reason) = members.malformed() {
                issues.push(BindingIssue {
                    group: group.clone(),
                    binding: String::new(),
                    reason: reason.to_string(),
                });
            }
            for name in members.names() {
                if let Err(err) = self.bind(&name, settings.processors.get(&name)) {
                    issues.push(BindingIssue {
                        group: group.clone(),
                        binding: name,
                        reason: err.to_string(),
                    });
                }
            }
        }
        Ok(issues)
    }

    fn bind(
        &self,
        name: &str,
        individual: Option<&IndividualSettings>,
    ) -> RegistryResult<ProcessorBinding> {
        let individual =
            individual.ok_or_else(|| RegistryError::invalid_binding(name, "not configured"))?;
        if let Some(reason) = &individual.malformed {
            return Err(RegistryError::invalid_binding(
                name,
                format!("malformed entry: {reason}"),
            ));
        }
        let path = individual
            .path
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| RegistryError::invalid_binding(name, "missing path pattern"))?;
        let processor = individual
            .processor
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| RegistryError::invalid_binding(name, "missing processor reference"))?;
        let pattern = compile_pattern(path).map_err(|reason| {
            RegistryError::invalid_binding(name, format!("invalid path pattern: {reason}"))
        })?;
        let processor = self.catalog.instantiate(processor, &individual.options)?;
        Ok(ProcessorBinding::new(name, pattern, processor))
    }
}

impl std::fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("catalog", &self.catalog)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::{MetaDataProcessor, Metadata, ProcessorScope, ProcessorStorage};
    use crate::source::StaticConfig;
    use crate::ProcessorError;
    use nxcrud_types::Value;
    use serde_json::{json, Value as JsonValue};

    struct Marker(&'static str);

    impl MetaDataProcessor for Marker {
        fn name(&self) -> &str {
            self.0
        }

        fn process(
            &self,
            mut metadata: Metadata,
            _property_path: &str,
            _processed_value: &JsonValue,
            _storage: &mut ProcessorStorage,
            _source: &Value,
            _scope: &dyn ProcessorScope,
        ) -> Result<Metadata, ProcessorError> {
            metadata.insert(self.0.to_string(), json!(true));
            Ok(metadata)
        }
    }

    fn catalog() -> ProcessorCatalog {
        let mut catalog = ProcessorCatalog::new();
        catalog.register("marker", Arc::new(Marker("marker")));
        catalog.register_factory("picky", |options| {
            if options.contains_key("bad") {
                Err("option 'bad' not allowed".to_string())
            } else {
                Ok(Arc::new(Marker("picky")) as Arc<dyn MetaDataProcessor>)
            }
        });
        catalog
    }

    fn registry(settings: ProcessorSettings, strict: bool) -> ProcessorRegistry {
        ProcessorRegistry::with_config(
            Arc::new(StaticConfig::new(settings)),
            catalog(),
            RegistryConfig { strict },
        )
    }

    // -----------------------------------------------------------------------
    // Resolution
    // -----------------------------------------------------------------------

    #[test]
    fn resolves_in_configured_order() {
        let settings = ProcessorSettings::new()
            .with_group("g", ["second", "first"])
            .with_processor("first", "^a$", "marker")
            .with_processor("second", "/^B$/i", "picky");
        let bindings = registry(settings, false).resolve_group(Some("g")).unwrap();
        let names: Vec<&str> = bindings.iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["second", "first"]);
        assert!(bindings[0].matches("b"));
        assert_eq!(bindings[0].processor().name(), "picky");
    }

    #[test]
    fn no_group_and_unknown_group_are_empty() {
        let registry = registry(ProcessorSettings::new().with_group("g", ["x"]), false);
        assert!(registry.resolve_group(None).unwrap().is_empty());
        assert!(registry.resolve_group(Some("")).unwrap().is_empty());
        assert!(registry.resolve_group(Some("other")).unwrap().is_empty());
    }

    #[test]
    fn lenient_mode_skips_invalid_bindings() {
        let mut bad_options = crate::ProcessorOptions::new();
        bad_options.insert("bad".into(), json!(1));
        let settings = ProcessorSettings::new()
            .with_group("g", ["missing", "noPattern", "unknown", "broken", "rejected", "ok"])
            .with_processor("noPattern", "", "marker")
            .with_processor("unknown", "^a$", "nope")
            .with_processor("broken", "^a(", "marker")
            .with_configured_processor("rejected", "^a$", "picky", bad_options)
            .with_processor("ok", "^a$", "marker");
        let bindings = registry(settings, false).resolve_group(Some("g")).unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].name(), "ok");
    }

    #[test]
    fn strict_mode_fails_on_first_invalid_binding() {
        let settings = ProcessorSettings::new()
            .with_group("g", ["ok", "unknown"])
            .with_processor("ok", "^a$", "marker")
            .with_processor("unknown", "^a$", "nope");
        let err = registry(settings, true).resolve_group(Some("g")).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownProcessor(ref name) if name == "nope"));
    }

    #[test]
    fn settings_changes_apply_to_next_call() {
        let source = Arc::new(StaticConfig::new(ProcessorSettings::new()));
        let registry = ProcessorRegistry::new(source.clone(), catalog());
        assert!(registry.resolve_group(Some("g")).unwrap().is_empty());

        source.replace(
            ProcessorSettings::new()
                .with_group("g", ["ok"])
                .with_processor("ok", "^a$", "marker"),
        );
        assert_eq!(registry.resolve_group(Some("g")).unwrap().len(), 1);
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    #[test]
    fn validate_reports_every_issue() {
        let settings = ProcessorSettings::new()
            .with_group("a", ["ok", "missing"])
            .with_group("b", ["unknown"])
            .with_processor("ok", "^a$", "marker")
            .with_processor("unknown", "^a$", "nope");
        let issues = registry(settings, false).validate().unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].group, "a");
        assert_eq!(issues[0].binding, "missing");
        assert!(issues[0].reason.contains("not configured"));
        assert_eq!(issues[1].binding, "unknown");
    }

    // -----------------------------------------------------------------------
    // Malformed settings
    // -----------------------------------------------------------------------

    const MALFORMED: &str = r#"
        [groups]
        good = ["ok"]
        other = ["ok", "mistyped"]
        broken = 5

        [processors.ok]
        path = "^a$"
        processor = "marker"

        [processors.mistyped]
        path = "^a$"
        processor = "marker"
        options = 3
    "#;

    #[test]
    fn mistyped_entry_is_skipped_in_lenient_mode() {
        let settings = ProcessorSettings::from_toml_str(MALFORMED).unwrap();
        let registry = registry(settings, false);
        assert_eq!(registry.resolve_group(Some("good")).unwrap().len(), 1);
        let other = registry.resolve_group(Some("other")).unwrap();
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].name(), "ok");
        assert!(registry.resolve_group(Some("broken")).unwrap().is_empty());
    }

    #[test]
    fn mistyped_entry_fails_in_strict_mode() {
        let settings = ProcessorSettings::from_toml_str(MALFORMED).unwrap();
        let registry = registry(settings, true);
        assert_eq!(registry.resolve_group(Some("good")).unwrap().len(), 1);

        let err = registry.resolve_group(Some("other")).unwrap_err();
        assert!(
            matches!(err, RegistryError::InvalidBinding { ref binding, ref reason }
                if binding == "mistyped" && reason.starts_with("malformed entry"))
        );
        let err = registry.resolve_group(Some("broken")).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidGroup { ref group, .. } if group == "broken"));
    }

    #[test]
    fn validate_reports_malformed_entries() {
        let settings = ProcessorSettings::from_toml_str(MALFORMED).unwrap();
        let issues = registry(settings, false).validate().unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].group, "broken");
        assert_eq!(issues[0].binding, "");
        assert_eq!(issues[1].group, "other");
        assert_eq!(issues[1].binding, "mistyped");
    }
}
