//! Logical UI-element queries
//!
//! A query describes an element by type name, an optional container scope,
//! and a set of property predicates. Queries are immutable descriptors used
//! only for lookup; they travel unchanged from scenario files over the wire
//! to the application's automation agent.

mod tree;

pub use tree::ObjectNode;

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};

/// Predicate applied to a single property value
///
/// A bare string in YAML is an exact match; `{ prefix: ... }` and
/// `{ pattern: ... }` select the other predicates. Patterns are anchored
/// regular expressions matched against the whole property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyMatch {
    Exact(String),
    Prefix { prefix: String },
    Pattern { pattern: String },
}

impl PropertyMatch {
    /// Check a property value against this predicate
    pub fn matches(&self, value: &str) -> Result<bool> {
        match self {
            PropertyMatch::Exact(expected) => Ok(value == expected),
            PropertyMatch::Prefix { prefix } => Ok(value.starts_with(prefix.as_str())),
            PropertyMatch::Pattern { pattern } => {
                let re = compile_anchored(pattern)?;
                Ok(re.is_match(value))
            }
        }
    }

    /// Validate the predicate without applying it
    ///
    /// Catches bad regular expressions at scenario load time instead of
    /// mid-run.
    pub fn validate(&self) -> Result<()> {
        if let PropertyMatch::Pattern { pattern } = self {
            compile_anchored(pattern)?;
        }
        Ok(())
    }
}

fn compile_anchored(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| Error::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Logical descriptor of a UI element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiQuery {
    /// Element type name (e.g. "Button", "Text", "LinkedText")
    #[serde(rename = "type")]
    pub type_name: String,

    /// Dotted path of ancestor ids narrowing the search; whole tree when
    /// absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Property predicates; every predicate must hold
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyMatch>,
}

impl UiQuery {
    /// Validate the query structure
    pub fn validate(&self) -> Result<()> {
        if self.type_name.is_empty() {
            return Err(Error::Scenario("query has an empty type name".to_string()));
        }
        for predicate in self.properties.values() {
            predicate.validate()?;
        }
        Ok(())
    }
}

/// Snapshot of a located element, as returned by the automation agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementInfo {
    pub type_name: String,
    pub id: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl From<&ObjectNode> for ElementInfo {
    fn from(node: &ObjectNode) -> Self {
        Self {
            type_name: node.type_name.clone(),
            id: node.id.clone(),
            properties: node.properties.clone(),
        }
    }
}
