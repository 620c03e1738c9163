use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::InventoryError;

/// Terraform state document (v3 layout, as produced by `terraform state pull`).
///
/// Only `modules` is mandatory. Everything below it defaults to empty so that
/// sparse or partially written state still parses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDocument {
    pub modules: Vec<Module>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceState>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    #[serde(rename = "type", default)]
    pub resource_type: String,
    #[serde(default)]
    pub primary: PrimaryState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimaryState {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl StateDocument {
    pub fn parse(bytes: &[u8]) -> Result<Self, InventoryError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn read<R: Read>(reader: R) -> Result<Self, InventoryError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, InventoryError> {
        let file = std::fs::File::open(path)?;
        Self::read(std::io::BufReader::new(file))
    }

    /// Appends the modules of `other`. Merging an empty document is a no-op.
    pub fn merge(&mut self, other: StateDocument) {
        self.modules.extend(other.modules);
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn resource_count(&self) -> usize {
        self.modules.iter().map(|m| m.resources.len()).sum()
    }
}
