//! Typed processor settings.
//!
//! ```toml
//! [groups]
//! "Acme\\Controller\\ItemController\\showAction" = ["itemContent", "readOnly"]
//! "Acme\\Controller\\ItemController\\listAction" = "itemContent, readOnly"
//!
//! [processors.itemContent]
//! path = "^items\\.\\d+$"
//! processor = "nested-object"
//!
//! [processors.readOnly]
//! path = "/^items\\.\\d+\\.title$/"
//! processor = "static"
//! options = { readOnly = true }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::ProcessorOptions;
use crate::error::RegistryResult;

/// Members of a processor group, as a list or a comma-separated string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupMembers {
    List(Vec<String>),
    Csv(String),
    /// A group value of any other shape, with the reason it was rejected.
    #[serde(skip)]
    Malformed(String),
}

impl GroupMembers {
    /// Member names in order, trimmed, empty entries dropped.
    ///
    /// A malformed group has no members.
    pub fn names(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            Self::List(items) => items.iter().map(String::as_str).collect(),
            Self::Csv(line) => line.split(',').collect(),
            Self::Malformed(_) => Vec::new(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Why the group value was rejected, if it was.
    pub fn malformed(&self) -> Option<&str> {
        match self {
            Self::Malformed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// One named binding: a path pattern and a processor reference.
///
/// Incomplete or mistyped entries still load: they are reported (or skipped)
/// at resolution time instead of failing the whole file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IndividualSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub options: ProcessorOptions,
    /// Set when the entry could not be read, with the reason.
    #[serde(skip)]
    pub malformed: Option<String>,
}

impl IndividualSettings {
    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            malformed: Some(reason.into()),
            ..Self::default()
        }
    }
}

/// All processor groups and the bindings they reference.
///
/// Groups and processor entries are read one by one, so a malformed entry
/// only affects the groups that use it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessorSettings {
    #[serde(default, deserialize_with = "lenient_groups")]
    pub groups: BTreeMap<String, GroupMembers>,
    #[serde(default, deserialize_with = "lenient_processors")]
    pub processors: BTreeMap<String, IndividualSettings>,
}

fn lenient_groups<'de, D>(deserializer: D) -> Result<BTreeMap<String, GroupMembers>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, toml::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(group, value)| {
            let kind = value.type_str();
            let members = value.try_into::<GroupMembers>().unwrap_or_else(|_| {
                GroupMembers::Malformed(format!(
                    "expected a list of processor names or a comma-separated string, found {kind}"
                ))
            });
            (group, members)
        })
        .collect())
}

fn lenient_processors<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, IndividualSettings>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, toml::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(name, value)| {
            let individual = value
                .try_into::<IndividualSettings>()
                .unwrap_or_else(|err| IndividualSettings::rejected(err.message()));
            (name, individual)
        })
        .collect())
}

impl ProcessorSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(source: &str) -> RegistryResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Add or replace a group.
    pub fn with_group<I, S>(mut self, group: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.insert(
            group.into(),
            GroupMembers::List(members.into_iter().map(Into::into).collect()),
        );
        self
    }

    /// Add or replace a binding.
    pub fn with_processor(
        mut self,
        name: impl Into<String>,
        path: impl Into<String>,
        processor: impl Into<String>,
    ) -> Self {
        self.processors.insert(
            name.into(),
            IndividualSettings {
                path: Some(path.into()),
                processor: Some(processor.into()),
                ..IndividualSettings::default()
            },
        );
        self
    }

    /// Add or replace a binding with processor options.
    pub fn with_configured_processor(
        mut self,
        name: impl Into<String>,
        path: impl Into<String>,
        processor: impl Into<String>,
        options: ProcessorOptions,
    ) -> Self {
        self.processors.insert(
            name.into(),
            IndividualSettings {
                path: Some(path.into()),
                processor: Some(processor.into()),
                options,
                malformed: None,
            },
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SETTINGS: &str = r#"
        [groups]
        "Acme\\ItemController\\showAction" = ["itemContent", "readOnly"]
        "Acme\\ItemController\\listAction" = " itemContent ,, readOnly "

        [processors.itemContent]
        path = "^items\\.\\d+$"
        processor = "nested-object"

        [processors.readOnly]
        path = "/title$/"
        processor = "static"
        options = { readOnly = true }
    "#;

    #[test]
    fn parses_both_group_forms() {
        let settings = ProcessorSettings::from_toml_str(SETTINGS).unwrap();
        let show = settings.groups["Acme\\ItemController\\showAction"].names();
        let list = settings.groups["Acme\\ItemController\\listAction"].names();
        assert_eq!(show, vec!["itemContent", "readOnly"]);
        assert_eq!(list, show);
    }

    #[test]
    fn parses_individuals_with_options() {
        let settings = ProcessorSettings::from_toml_str(SETTINGS).unwrap();
        let read_only = &settings.processors["readOnly"];
        assert_eq!(read_only.processor.as_deref(), Some("static"));
        assert_eq!(read_only.options["readOnly"], json!(true));
        assert!(settings.processors["itemContent"].options.is_empty());
    }

    #[test]
    fn incomplete_individual_still_parses() {
        let settings = ProcessorSettings::from_toml_str(
            r#"
            [processors.broken]
            processor = "static"
            "#,
        )
        .unwrap();
        assert_eq!(settings.processors["broken"].path, None);
    }

    #[test]
    fn mistyped_entries_load_as_malformed() {
        let settings = ProcessorSettings::from_toml_str(
            r#"
            [groups]
            good = ["flag"]
            other = ["bad", "worse"]
            broken = 5

            [processors.flag]
            path = "^title$"
            processor = "static"

            [processors.bad]
            path = 5
            processor = "static"

            [processors.worse]
            path = "^x$"
            processor = "static"
            options = 3
            "#,
        )
        .unwrap();
        assert_eq!(settings.groups["good"].names(), vec!["flag"]);
        assert_eq!(settings.processors["flag"].malformed, None);
        assert_eq!(settings.processors["flag"].path.as_deref(), Some("^title$"));

        let bad = settings.processors["bad"].malformed.as_deref().unwrap();
        assert!(bad.contains("invalid type"), "{bad}");
        assert!(settings.processors["worse"].malformed.is_some());

        assert!(settings.groups["broken"].names().is_empty());
        assert!(settings.groups["broken"]
            .malformed()
            .is_some_and(|reason| reason.contains("integer")));
    }

    #[test]
    fn builder_helpers() {
        let settings = ProcessorSettings::new()
            .with_group("g", ["a"])
            .with_processor("a", "^x$", "static");
        assert_eq!(settings.groups["g"].names(), vec!["a"]);
        assert_eq!(settings.processors["a"].path.as_deref(), Some("^x$"));
    }
}
