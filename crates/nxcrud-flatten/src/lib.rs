//! Dotted-path flattening of JSON trees.
//!
//! [`flatten`] turns a nested tree into a flat map of `path -> leaf`, in
//! depth-first pre-order. [`unflatten`] reverses it, with one deliberate
//! difference: keys come back sorted at every depth (see [`compare_keys`]).
//!
//! ```
//! use nxcrud_flatten::{flatten, unflatten};
//! use serde_json::json;
//!
//! let tree = json!({"first": {"second": 1}});
//! let flat = flatten(&tree);
//! assert_eq!(flat["first.second"], json!(1));
//! assert_eq!(unflatten(&flat), tree);
//! ```
//!
//! Keys containing the separator do not survive a round trip. The engine
//! reserves `#` for metadata keys (`items.0#flag`), which never collide with
//! data keys because `#` is not a separator.

use std::cmp::Ordering;

use serde_json::{Map, Value as JsonValue};

/// Default segment separator.
pub const SEGMENTATION_CHARACTER: char = '.';

/// Flat representation: insertion-ordered `path -> leaf`.
pub type FlatMap = Map<String, JsonValue>;

/// Options for [`flatten_with`].
#[derive(Clone, Debug)]
pub struct FlattenOptions<'a> {
    /// Prepended to every emitted key.
    pub prefix: &'a str,
    /// Emit empty containers as leaves instead of dropping them.
    pub keep_empty_containers: bool,
    pub separator: char,
}

impl Default for FlattenOptions<'_> {
    fn default() -> Self {
        Self {
            prefix: "",
            keep_empty_containers: true,
            separator: SEGMENTATION_CHARACTER,
        }
    }
}

/// Flatten with default options: no prefix, empty containers kept, `.`.
pub fn flatten(tree: &JsonValue) -> FlatMap {
    flatten_with(tree, &FlattenOptions::default())
}

/// Flatten `tree` into `path -> leaf` pairs.
///
/// Trailing separators are trimmed from every key, so `{"first.": {"second": 1}}`
/// flattens to `first.second`. A non-container `tree` has no children and
/// yields an empty map.
pub fn flatten_with(tree: &JsonValue, options: &FlattenOptions<'_>) -> FlatMap {
    let mut flat = FlatMap::new();
    flatten_into(tree, options.prefix, options, &mut flat);
    flat
}

fn flatten_into(tree: &JsonValue, prefix: &str, options: &FlattenOptions<'_>, out: &mut FlatMap) {
    let sep = options.separator;
    let mut visit = |key: &str, value: &JsonValue| {
        let key = key.trim_end_matches(sep);
        if !is_container(value) || (is_empty_container(value) && options.keep_empty_containers) {
            out.insert(format!("{prefix}{key}"), value.clone());
        } else {
            let nested = format!("{prefix}{key}{sep}");
            flatten_into(value, &nested, options, out);
        }
    };
    match tree {
        JsonValue::Object(map) => {
            for (key, value) in map {
                visit(key, value);
            }
        }
        JsonValue::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                visit(&index.to_string(), value);
            }
        }
        _ => {}
    }
}

/// Unflatten with the default `.` separator.
pub fn unflatten(flat: &FlatMap) -> JsonValue {
    unflatten_with(flat, SEGMENTATION_CHARACTER)
}

/// Rebuild a nested tree from `path -> leaf` pairs.
///
/// Keys are sorted with [`compare_keys`] before insertion and every container
/// stays sorted after each insertion, so the result is ordered at every depth
/// regardless of input order. A rebuilt container whose keys are exactly
/// `0..n` in order becomes an array; any other key (such as `0#flag`) makes
/// it an object.
///
/// When a path runs through a key that already holds a leaf, the leaf is
/// replaced by a container.
pub fn unflatten_with(flat: &FlatMap, separator: char) -> JsonValue {
    let mut keys: Vec<&String> = flat.keys().collect();
    keys.sort_by(|a, b| compare_keys(a, b));

    let mut root = Node::branch();
    for key in keys {
        let segments: Vec<&str> = key.split(separator).collect();
        root.insert(&segments, flat[key.as_str()].clone());
    }
    root.into_json()
}

/// Order used by [`unflatten`].
///
/// Keys starting with a canonical non-negative integer (`0`, `7`, `12#flag`)
/// sort first, by that number and then bytewise by the remainder. All other
/// keys follow in plain bytewise order. So `0 < 0#flag < 1 < 2 < 10 < a`,
/// which keeps rebuilt arrays in element order and places each metadata key
/// right after the element it describes.
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

fn sort_key(key: &str) -> (u8, u64, &str) {
    let digits = key.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 {
        let (number, rest) = key.split_at(digits);
        if number == "0" || !number.starts_with('0') {
            if let Ok(n) = number.parse::<u64>() {
                return (0, n, rest);
            }
        }
    }
    (1, 0, key)
}

fn as_index(key: &str) -> Option<u64> {
    match sort_key(key) {
        (0, n, "") => Some(n),
        _ => None,
    }
}

fn is_container(value: &JsonValue) -> bool {
    matches!(value, JsonValue::Object(_) | JsonValue::Array(_))
}

fn is_empty_container(value: &JsonValue) -> bool {
    match value {
        JsonValue::Object(map) => map.is_empty(),
        JsonValue::Array(items) => items.is_empty(),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Intermediate tree
// ---------------------------------------------------------------------------

enum Node {
    Leaf(JsonValue),
    /// Children kept sorted by [`compare_keys`].
    Branch(Vec<(String, Node)>),
}

impl Node {
    fn branch() -> Self {
        Self::Branch(Vec::new())
    }

    fn insert(&mut self, path: &[&str], value: JsonValue) {
        let Some((segment, rest)) = path.split_first() else {
            return;
        };
        if !matches!(self, Self::Branch(_)) {
            *self = Self::branch();
        }
        let Self::Branch(children) = self else {
            return;
        };
        let slot = match children.binary_search_by(|(k, _)| compare_keys(k, segment)) {
            Ok(found) => found,
            Err(position) => {
                let child = if rest.is_empty() {
                    Self::Leaf(JsonValue::Null)
                } else {
                    Self::branch()
                };
                children.insert(position, (segment.to_string(), child));
                position
            }
        };
        let child = &mut children[slot].1;
        if rest.is_empty() {
            *child = Self::Leaf(value);
        } else {
            child.insert(rest, value);
        }
    }

    fn into_json(self) -> JsonValue {
        match self {
            Self::Leaf(value) => value,
            Self::Branch(children) => {
                let is_list = !children.is_empty()
                    && children
                    .iter()
                    .enumerate()
                    .all(|(i, (k, _))| as_index(k) == Some(i as u64));
                if is_list {
                    JsonValue::Array(children.into_iter().map(|(_, n)| n.into_json()).collect())
                } else {
                    JsonValue::Object(
                        children
                            .into_iter()
                            .map(|(k, n)| (k, n.into_json()))
                            .collect(),
                    )
                }
            }
        }
    }
}
