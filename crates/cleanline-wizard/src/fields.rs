/*
[INPUT]:  Raw form input from the owning view
[OUTPUT]: Key-value field map with an embedded task checklist
[POS]:    Data layer - form values validated by wizard steps
[UPDATE]: When field storage or checklist embedding changes
*/

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::checklist::TaskChecklist;

/// Field values of a wizard instance.
///
/// The checklist rides along with the string values so that a reset restores
/// both at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fields {
    #[serde(default)]
    values: BTreeMap<String, String>,
    #[serde(default)]
    checklist: TaskChecklist,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Builder-style checklist attachment
    pub fn with_checklist(mut self, checklist: TaskChecklist) -> Self {
        self.checklist = checklist;
        self
    }

    /// Merge a value; no validation happens here
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value for `key`, or the empty string when unset
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn checklist(&self) -> &TaskChecklist {
        &self.checklist
    }

    pub fn checklist_mut(&mut self) -> &mut TaskChecklist {
        &mut self.checklist
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
