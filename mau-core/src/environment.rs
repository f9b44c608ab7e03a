//! Nested key-value store threaded through every parse.
//!
//! Keys are dotted paths (`mau.parser.source_marker_delimiter`). Every
//! intermediate segment is a namespace.

use serde_yaml::Value as YamlValue;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvironmentError {
    #[error("Failed to read environment file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Environment root must be a mapping")]
    NotAMapping,
}

/// A value stored in the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Flag(bool),
    Namespace(BTreeMap<String, Value>),
}

impl Value {
    /// Render a scalar as text. Namespaces have no textual form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Text(text) => Some(text.clone()),
            Value::Flag(flag) => Some(flag.to_string()),
            Value::Namespace(_) => None,
        }
    }

    pub fn is_namespace(&self) -> bool {
        matches!(self, Value::Namespace(_))
    }

    fn from_yaml(value: YamlValue) -> Value {
        match value {
            YamlValue::Bool(flag) => Value::Flag(flag),
            YamlValue::String(text) => Value::Text(text),
            YamlValue::Number(number) => Value::Text(number.to_string()),
            YamlValue::Null => Value::Text(String::new()),
            YamlValue::Sequence(items) => Value::Text(
                items
                    .into_iter()
                    .filter_map(|item| Value::from_yaml(item).as_text())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            YamlValue::Mapping(mapping) => Value::Namespace(
                mapping
                    .into_iter()
                    .filter_map(|(key, value)| {
                        yaml_key(key).map(|key| (key, Value::from_yaml(value)))
                    })
                    .collect(),
            ),
            YamlValue::Tagged(tagged) => Value::from_yaml(tagged.value),
        }
    }
}

fn yaml_key(key: YamlValue) -> Option<String> {
    match key {
        YamlValue::String(key) => Some(key),
        YamlValue::Number(number) => Some(number.to_string()),
        YamlValue::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Flag(flag)
    }
}

/// Nested string-keyed namespace with dotted-path access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    root: BTreeMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an environment from a YAML mapping
    pub fn from_yaml_str(yaml: &str) -> Result<Self, EnvironmentError> {
        let value: YamlValue = serde_yaml::from_str(yaml)?;
        match Value::from_yaml(value) {
            Value::Namespace(root) => Ok(Self { root }),
            Value::Text(text) if text.is_empty() => Ok(Self::new()),
            _ => Err(EnvironmentError::NotAMapping),
        }
    }

    /// Load an environment from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, EnvironmentError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.root.get(segments.next()?)?;
        for segment in segments {
            match current {
                Value::Namespace(children) => current = children.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Scalar value at `path` rendered as text.
    pub fn get_text(&self, path: &str) -> Option<String> {
        self.get(path).and_then(Value::as_text)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Store `value` at `path`, creating (or replacing scalars with)
    /// namespaces along the way.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        let segments: Vec<&str> = path.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut current = &mut self.root;
        for segment in parents {
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Namespace(BTreeMap::new()));
            if !entry.is_namespace() {
                *entry = Value::Namespace(BTreeMap::new());
            }
            let Value::Namespace(children) = entry else {
                return;
            };
            current = children;
        }
        current.insert(last.to_string(), value.into());
    }

    /// Merge `other` into `self`. Namespaces merge recursively, scalars in
    /// `other` win.
    pub fn deep_merge(&mut self, other: &Environment) {
        merge_maps(&mut self.root, &other.root);
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Top-level entries, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.root.iter()
    }
}

fn merge_maps(target: &mut BTreeMap<String, Value>, source: &BTreeMap<String, Value>) {
    for (key, value) in source {
        match (target.get_mut(key), value) {
            (Some(Value::Namespace(existing)), Value::Namespace(incoming)) => {
                merge_maps(existing, incoming);
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}
