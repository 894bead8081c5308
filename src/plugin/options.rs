//! Plugin option parsing
//!
//! Plugins are configured with `key` or `key=value` strings, usually
//! collected from repeated `--opt` flags. Each plugin declares an
//! [`OptionSchema`]; anything outside it is rejected, except the reserved
//! `help` key which always short-circuits with the plugin's usage text.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use super::error::PluginError;
use super::usage::usage;

/// Reserved option that asks for usage text instead of running the plugin
pub const HELP_OPTION: &str = "help";

/// Options a plugin accepts, keyed by lowercased name
///
/// Iteration is alphabetical, which is the order used by both error
/// messages and usage text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OptionSchema {
    options: BTreeMap<String, String>,
}

impl OptionSchema {
    /// Creates an empty schema (the plugin accepts no options)
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an option with its description
    pub fn with(mut self, name: &str, description: &str) -> Self {
        self.options
            .insert(name.to_lowercase(), description.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Case-insensitive membership test
    pub fn contains(&self, name: &str) -> bool {
        self.options.contains_key(&name.to_lowercase())
    }

    /// Description of an option, if declared
    pub fn description(&self, name: &str) -> Option<&str> {
        self.options.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Option names in alphabetical order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }

    /// `(name, description)` pairs in alphabetical order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options
            .iter()
            .map(|(name, desc)| (name.as_str(), desc.as_str()))
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for OptionSchema {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |schema, (name, desc)| schema.with(name, desc))
    }
}

/// Value of a parsed option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Bare `key` with no `=`
    Flag,

    /// Text after the first `=` (may be empty)
    Value(String),
}

impl OptionValue {
    /// The text value, or `None` for a bare flag
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Flag => None,
            OptionValue::Value(v) => Some(v),
        }
    }
}

// Flags serialize as `true`, values as strings
impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OptionValue::Flag => serializer.serialize_bool(true),
            OptionValue::Value(v) => serializer.serialize_str(v),
        }
    }
}

/// Options accepted for one plugin instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParsedOptions {
    values: BTreeMap<String, OptionValue>,
}

impl ParsedOptions {
    /// Case-insensitive lookup
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(&key.to_lowercase())
    }

    /// Case-insensitive lookup of a text value
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(OptionValue::as_str)
    }

    /// True if the option was supplied in any form
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Splits a raw option on its first `=`
fn split_option(raw: &str) -> (&str, OptionValue) {
    match raw.split_once('=') {
        Some((key, value)) => (key, OptionValue::Value(value.to_string())),
        None => (raw, OptionValue::Flag),
    }
}

/// Parses raw `key[=value]` strings against a plugin's schema
///
/// `doc` is the plugin description, needed only to build the usage text
/// when `help` is requested. Options are processed in order; a repeated key
/// keeps its last value.
pub fn parse_options<S: AsRef<str>>(
    doc: &str,
    schema: &OptionSchema,
    raw: &[S],
) -> Result<ParsedOptions, PluginError> {
    let mut parsed = ParsedOptions::default();

    for opt in raw {
        let opt = opt.as_ref();
        let (key, value) = split_option(opt);
        let key = key.to_lowercase();

        if key == HELP_OPTION {
            return Err(PluginError::HelpRequested {
                usage: usage(doc, schema),
            });
        }

        if !schema.contains(&key) {
            if schema.is_empty() {
                return Err(PluginError::UnsupportedOption {
                    option: opt.to_string(),
                });
            }

            return Err(PluginError::UnknownOption {
                option: opt.to_string(),
                valid: schema.names().collect::<Vec<_>>().join(", "),
            });
        }

        parsed.values.insert(key, value);
    }

    Ok(parsed)
}
