use std::collections::BTreeMap;

use crate::resource::{Resource, Vars};

/// Group → hosts and host → vars, as handed to Ansible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    groups: BTreeMap<String, Vec<String>>,
    vars: BTreeMap<String, Vars>,
}

impl Inventory {
    /// Builds the inventory from resolved resources.
    ///
    /// Resources without an address never become hosts. Their vars are kept
    /// under the empty-string key only when `include_unaddressable` is set.
    /// When two resources resolve to the same address, the later one's vars win.
    pub fn gather(resources: &[Resource<'_>], include_unaddressable: bool) -> Self {
        let mut inventory = Self::default();

        for resource in resources {
            let address = resource.address();

            if address.is_empty() {
                tracing::debug!(key = resource.key_name(), "resource has no address");
                if include_unaddressable {
                    inventory.vars.insert(String::new(), resource.vars());
                }
                continue;
            }

            inventory.vars.insert(address.to_string(), resource.vars());
            for group in resource.groups() {
                inventory.add_host(&group, address);
            }
        }

        tracing::info!(
            groups = inventory.groups.len(),
            hosts = inventory.vars.len(),
            "inventory gathered"
        );
        inventory
    }

    /// Sorted insert; adding a host twice is a no-op.
    pub fn add_host(&mut self, group: &str, address: &str) {
        let hosts = self.groups.entry(group.to_string()).or_default();
        if let Err(pos) = hosts.binary_search_by(|h| h.as_str().cmp(address)) {
            hosts.insert(pos, address.to_string());
        }
    }

    pub fn groups(&self) -> &BTreeMap<String, Vec<String>> {
        &self.groups
    }

    pub fn vars(&self) -> &BTreeMap<String, Vars> {
        &self.vars
    }

    pub fn hosts(&self, group: &str) -> &[String] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn host_vars(&self, address: &str) -> Option<&Vars> {
        self.vars.get(address)
    }
}
