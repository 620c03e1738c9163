use super::{Attributes, ProviderAdapter, Tags, is_count_marker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagStyle {
    /// `prefix.Key = Value` becomes `key → value`.
    Keyed,
    /// `prefix.N = Value` becomes `value → ""`.
    List,
}

/// Reads tags from every attribute under a fixed prefix.
#[derive(Debug, Clone)]
pub struct PrefixedTagAdapter {
    name: &'static str,
    resource_types: &'static [&'static str],
    prefix: &'static str,
    style: TagStyle,
}

impl PrefixedTagAdapter {
    pub const fn new(
        name: &'static str,
        resource_types: &'static [&'static str],
        prefix: &'static str,
        style: TagStyle,
    ) -> Self {
        Self {
            name,
            resource_types,
            prefix,
            style,
        }
    }
}

impl ProviderAdapter for PrefixedTagAdapter {
    fn name(&self) -> &str {
        self.name
    }

    fn resource_types(&self) -> &[&str] {
        self.resource_types
    }

    fn tags(&self, attributes: &Attributes) -> Tags {
        attributes
            .iter()
            .filter_map(|(key, value)| {
                let rest = key.strip_prefix(self.prefix)?;
                (!rest.is_empty() && !is_count_marker(rest)).then_some((rest, value))
            })
            .map(|(rest, value)| match self.style {
                TagStyle::Keyed => (rest.to_lowercase(), value.to_lowercase()),
                TagStyle::List => (value.to_lowercase(), String::new()),
            })
            .collect()
    }
}

pub(super) const BUILTIN: &[PrefixedTagAdapter] = &[
    PrefixedTagAdapter::new("aws", &["aws_instance"], "tags.", TagStyle::Keyed),
    PrefixedTagAdapter::new(
        "openstack",
        &["openstack_compute_instance_v2"],
        "metadata.",
        TagStyle::Keyed,
    ),
    PrefixedTagAdapter::new(
        "vsphere",
        &["vsphere_virtual_machine"],
        "custom_configuration_parameters.",
        TagStyle::Keyed,
    ),
    PrefixedTagAdapter::new("triton", &["triton_machine"], "tags.", TagStyle::Keyed),
    PrefixedTagAdapter::new(
        "tag_list",
        &[
            "digitalocean_droplet",
            "google_compute_instance",
            "scaleway_server",
        ],
        "tags.",
        TagStyle::List,
    ),
];
