mod prefixed;

use std::collections::BTreeMap;

pub use prefixed::{PrefixedTagAdapter, TagStyle};

pub type Attributes = BTreeMap<String, String>;
pub type Tags = BTreeMap<String, String>;

/// Provider-specific knowledge of where a resource keeps its address and tags.
pub trait ProviderAdapter: std::fmt::Debug + Send + Sync {
    fn name(&self) -> &str;
    fn resource_types(&self) -> &[&str];
    fn tags(&self, attributes: &Attributes) -> Tags;

    fn address<'a>(&self, attributes: &'a Attributes, keys: &[String]) -> Option<&'a str> {
        scan_address(attributes, keys)
    }
}

/// First non-empty value among `keys`, in order.
pub fn scan_address<'a>(attributes: &'a Attributes, keys: &[String]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| attributes.get(key))
        .map(String::as_str)
        .find(|value| !value.is_empty())
}

/// Attribute paths ending in `#` or `%` hold list/map sizes, not data.
pub fn is_count_marker(path: &str) -> bool {
    matches!(path, "#" | "%") || path.ends_with(".#") || path.ends_with(".%")
}

#[derive(Debug)]
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn ProviderAdapter>>,
}

impl AdapterRegistry {
    pub fn empty() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for adapter in prefixed::BUILTIN {
            registry.register(Box::new(adapter.clone()));
        }
        registry
    }

    /// Later registrations win over earlier ones for the same resource type.
    pub fn register(&mut self, adapter: Box<dyn ProviderAdapter>) {
        self.adapters.insert(0, adapter);
    }

    pub fn for_type(&self, resource_type: &str) -> Option<&dyn ProviderAdapter> {
        self.adapters
            .iter()
            .find(|a| a.resource_types().contains(&resource_type))
            .map(|a| &**a)
    }

    pub fn names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
