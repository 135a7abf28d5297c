//! In-memory UI object tree
//!
//! The live object tree belongs to the application under test; this model is
//! what its automation agent (and the mock application) evaluates queries
//! against. Lookup is a pure read: absence of a match is `Ok(None)`, while an
//! unresolvable container scope is an error so a broken scenario is not
//! mistaken for a missing element.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};

use super::UiQuery;

/// A node in the UI object tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectNode {
    pub type_name: String,
    pub id: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<ObjectNode>,
}

impl ObjectNode {
    pub fn new(type_name: &str, id: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            id: id.to_string(),
            properties: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        self.properties.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_child(mut self, child: ObjectNode) -> Self {
        self.children.push(child);
        self
    }

    /// Resolve a dotted scope path ("welcome.scroll_view") to a descendant
    pub fn resolve_scope(&self, scope: &str) -> Option<&ObjectNode> {
        let mut current = self;
        for segment in scope.split('.') {
            current = current.children.iter().find(|c| c.id == segment)?;
        }
        Some(current)
    }

    /// Mutable scope resolution, used by agents applying UI actions
    pub fn resolve_scope_mut(&mut self, scope: &str) -> Option<&mut ObjectNode> {
        let mut current = self;
        for segment in scope.split('.') {
            current = current.children.iter_mut().find(|c| c.id == segment)?;
        }
        Some(current)
    }

    /// Find the first descendant matching the query
    ///
    /// Returns `Ok(None)` when nothing matches; fails with
    /// [`Error::ScopeNotFound`] when the query's container scope does not
    /// resolve.
    pub fn find(&self, query: &UiQuery) -> Result<Option<&ObjectNode>> {
        let root = match &query.scope {
            Some(scope) => self
                .resolve_scope(scope)
                .ok_or_else(|| Error::ScopeNotFound(scope.clone()))?,
            None => self,
        };
        find_in(root, query)
    }

    /// Whether this node satisfies the query's type and property predicates
    pub fn matches(&self, query: &UiQuery) -> Result<bool> {
        if self.type_name != query.type_name {
            return Ok(false);
        }
        for (name, predicate) in &query.properties {
            match self.properties.get(name) {
                Some(value) if predicate.matches(value)? => {}
                _ => return Ok(false),
            }
        }
        Ok(true)
    }
}

/// Depth-first pre-order search below (not including) `root`
fn find_in<'a>(root: &'a ObjectNode, query: &UiQuery) -> Result<Option<&'a ObjectNode>> {
    for child in &root.children {
        if child.matches(query)? {
            return Ok(Some(child));
        }
        if let Some(found) = find_in(child, query)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}
