use std::collections::BTreeMap;

use regex::Regex;
use serde_json::Value;

use crate::config::ExtractionProfile;
use crate::error::InventoryError;
use crate::providers::{AdapterRegistry, Attributes, ProviderAdapter, Tags, scan_address};
use crate::terraform::{ResourceState, StateDocument};

pub const DEFAULT_GROUP: &str = "common";

// type.name[.index]
const KEY_PATTERN: &str = r"^(\w+)\.([\w\-]+)(?:\.(\d+))?$";

pub type Vars = BTreeMap<String, String>;

/// Immutable extraction context, built once per invocation.
#[derive(Debug)]
pub struct Extractor {
    key_pattern: Regex,
    profile: ExtractionProfile,
    adapters: AdapterRegistry,
}

impl Extractor {
    pub fn new(
        profile: ExtractionProfile,
        adapters: AdapterRegistry,
    ) -> Result<Self, InventoryError> {
        let key_pattern = Regex::new(KEY_PATTERN)
            .map_err(|e| InventoryError::Config(format!("invalid key pattern: {}", e)))?;
        Ok(Self {
            key_pattern,
            profile,
            adapters,
        })
    }

    pub fn resource<'a>(
        &'a self,
        key: &str,
        state: &'a ResourceState,
    ) -> Result<Resource<'a>, InventoryError> {
        let caps = self
            .key_pattern
            .captures(key)
            .ok_or_else(|| InventoryError::KeyFormat {
                key: key.to_string(),
            })?;

        let counter = match caps.get(3) {
            Some(index) => index
                .as_str()
                .parse::<u32>()
                .map_err(|_| InventoryError::KeyIndex {
                    key: key.to_string(),
                })?,
            None => 0,
        };

        let resource_type = caps[1].to_string();
        let adapter = self.adapters.for_type(&resource_type);

        Ok(Resource {
            key_name: key.to_string(),
            resource_type,
            base_name: caps[2].to_string(),
            counter,
            state,
            profile: &self.profile,
            adapter,
        })
    }

    /// Every resource across all modules. Entries with malformed keys are
    /// skipped with a warning.
    pub fn resources<'a>(&'a self, doc: &'a StateDocument) -> Vec<Resource<'a>> {
        doc.modules
            .iter()
            .flat_map(|module| module.resources.iter())
            .filter_map(|(key, state)| match self.resource(key, state) {
                Ok(resource) => Some(resource),
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "skipping resource");
                    None
                }
            })
            .collect()
    }
}

/// One entry of a state module, with the inventory facts derived from it.
#[derive(Debug, Clone)]
pub struct Resource<'a> {
    key_name: String,
    resource_type: String,
    base_name: String,
    counter: u32,
    state: &'a ResourceState,
    profile: &'a ExtractionProfile,
    adapter: Option<&'a dyn ProviderAdapter>,
}

impl<'a> Resource<'a> {
    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn id(&self) -> &'a str {
        &self.state.primary.id
    }

    /// Name and counter, e.g. `web.0`. Resources without `count` are always `.0`.
    pub fn name_with_counter(&self) -> String {
        format!("{}.{}", self.base_name, self.counter)
    }

    pub fn attributes(&self) -> &'a Attributes {
        &self.state.primary.attributes
    }

    pub fn adapter_name(&self) -> Option<&str> {
        self.adapter.map(|a| a.name())
    }

    pub fn is_supported(&self) -> bool {
        !self.address().is_empty()
    }

    /// Explicit hostname first, then provider address keys. Empty when the
    /// resource has no usable address.
    pub fn address(&self) -> &'a str {
        let profile = self.profile;
        let attributes = self.attributes();

        if let Some(sentinel) = &profile.sentinel
            && !self.key_name.contains(sentinel.as_str())
        {
            return "";
        }

        if let Some(host) = profile
            .host_key
            .as_ref()
            .and_then(|key| attributes.get(key))
            .filter(|host| !host.is_empty())
        {
            return host;
        }

        let found = match self.adapter {
            Some(adapter) => adapter.address(attributes, &profile.address_keys),
            None => scan_address(attributes, &profile.address_keys),
        };
        found.unwrap_or("")
    }

    pub fn groups(&self) -> Vec<String> {
        let raw = match self.attributes().get(&self.profile.groups_key) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return vec![DEFAULT_GROUP.to_string()],
        };

        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(groups) => groups,
            Err(err) => {
                tracing::warn!(key = %self.key_name, error = %err, "invalid groups, using default");
                vec![DEFAULT_GROUP.to_string()]
            }
        }
    }

    /// Primary vars merged with extra vars; extra vars win on collision.
    pub fn vars(&self) -> Vars {
        let mut vars = self.decode_vars(&self.profile.vars_key).unwrap_or_default();
        if let Some(extra_key) = &self.profile.extra_vars_key
            && let Some(extra) = self.decode_vars(extra_key)
        {
            vars.extend(extra);
        }
        vars
    }

    pub fn tags(&self) -> Tags {
        self.adapter
            .map(|adapter| adapter.tags(self.attributes()))
            .unwrap_or_default()
    }

    fn decode_vars(&self, attribute: &str) -> Option<Vars> {
        let Some(raw) = self.attributes().get(attribute) else {
            tracing::debug!(key = %self.key_name, attribute, "no vars attribute");
            return None;
        };

        let vars = parse_vars(raw);
        if vars.is_none() {
            tracing::warn!(key = %self.key_name, attribute, "could not decode vars");
        }
        vars
    }
}

// Accepts an object, or a JSON string holding an object (double-encoded).
fn parse_vars(raw: &str) -> Option<Vars> {
    match serde_json::from_str::<Value>(raw).ok()? {
        Value::Object(map) => Some(stringify_values(map)),
        Value::String(inner) => match serde_json::from_str::<Value>(&inner).ok()? {
            Value::Object(map) => Some(stringify_values(map)),
            _ => None,
        },
        _ => None,
    }
}

fn stringify_values(map: serde_json::Map<String, Value>) -> Vars {
    map.into_iter()
        .map(|(k, v)| match v {
            Value::String(s) => (k, s),
            other => (k, other.to_string()),
        })
        .collect()
}
