//! Filters and updates over stored documents

use serde::Serialize;
use serde_json::Value;

use super::{Document, ID_FIELD};

/// Conjunction of top-level field equalities
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    /// Matches every document
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and(field, value)
    }

    pub fn by_id(id: &str) -> Self {
        Self::eq(ID_FIELD, id)
    }

    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    /// The id this filter selects, when it selects by id alone
    pub fn id(&self) -> Option<&str> {
        match self.conditions.as_slice() {
            [(field, Value::String(id))] if field == ID_FIELD => Some(id),
            _ => None,
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, value)| document.get(field) == Some(value))
    }
}

/// Field assignments applied to a matched document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    set: Vec<(String, Value)>,
}

impl Update {
    pub fn set(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::default().and_set(field, value)
    }

    pub fn and_set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set.push((field.into(), value.into()));
        self
    }

    /// Apply to a document, returning whether anything changed.
    /// The `_id` field is never rewritten.
    pub fn apply(&self, document: &mut Document) -> bool {
        let mut modified = false;
        for (field, value) in &self.set {
            if field == ID_FIELD {
                continue;
            }
            if document.get(field) != Some(value) {
                document.insert(field.clone(), value.clone());
                modified = true;
            }
        }
        modified
    }
}

/// Outcome of an update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateResult {
    pub fn unmatched() -> Self {
        Self::default()
    }

    pub fn matched(modified: bool) -> Self {
        Self {
            matched_count: 1,
            modified_count: modified as u64,
        }
    }
}
