use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::InventoryError;
use crate::terraform::DEFAULT_STATE_COMMAND;

const CONFIG_DIR_NAME: &str = "tfinv";
const CONFIG_FILE_NAME: &str = "config.json";

/// Provider attributes that commonly hold a reachable address, in priority order.
pub const PROVIDER_ADDRESS_KEYS: &[&str] = &[
    "ipv4_address",                                        // DigitalOcean, SoftLayer
    "public_ip",                                           // AWS
    "public_ipv6",                                         // Scaleway
    "ipaddress",                                           // CloudStack
    "ip_address",                                          // VMware, Docker, Linode
    "private_ip",                                          // AWS
    "network_interface.0.ipv4_address",                    // VMware
    "default_ip_address",                                  // vSphere
    "access_ip_v4",                                        // OpenStack
    "access_ip_v6",                                        // OpenStack
    "floating_ip",                                         // OpenStack
    "network_interface.0.access_config.0.nat_ip",          // GCE
    "network_interface.0.access_config.0.assigned_nat_ip", // GCE
    "network_interface.0.address",                         // GCE
    "ipv4_address_private",                                // SoftLayer
    "networks.0.ip4address",                               // Exoscale
    "primaryip",                                           // Triton
    "network_interface.0.ip_address",                      // Azure
    "public_ip_address",                                   // Azure
];

/// Where a state file keeps the inventory hints for a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Convention {
    /// A `null_resource.play_defs` sentinel carrying `triggers.*` keys.
    Triggers,
    /// `metadata.*` keys on any resource, falling back to provider IPs.
    #[default]
    Metadata,
}

/// The attribute keys consulted when extracting address, groups and vars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionProfile {
    /// Composite key fragment a resource must contain to be addressable.
    pub sentinel: Option<String>,
    pub host_key: Option<String>,
    pub address_keys: Vec<String>,
    pub groups_key: String,
    pub vars_key: String,
    pub extra_vars_key: Option<String>,
}

impl ExtractionProfile {
    pub fn triggers() -> Self {
        Self {
            sentinel: Some("null_resource.play_defs".to_string()),
            host_key: Some("triggers.fqdn".to_string()),
            address_keys: Vec::new(),
            groups_key: "triggers.groups".to_string(),
            vars_key: "triggers.vars".to_string(),
            extra_vars_key: Some("triggers.extra_vars".to_string()),
        }
    }

    pub fn metadata() -> Self {
        Self {
            sentinel: None,
            host_key: Some("metadata.fqdn".to_string()),
            address_keys: PROVIDER_ADDRESS_KEYS.iter().map(|k| k.to_string()).collect(),
            groups_key: "metadata.groups".to_string(),
            vars_key: "metadata.vars".to_string(),
            extra_vars_key: Some("metadata.extra_vars".to_string()),
        }
    }

    pub fn for_convention(convention: Convention) -> Self {
        match convention {
            Convention::Triggers => Self::triggers(),
            Convention::Metadata => Self::metadata(),
        }
    }

    fn apply(&mut self, overrides: ProfileOverrides) {
        if let Some(sentinel) = overrides.sentinel {
            self.sentinel = Some(sentinel).filter(|s| !s.is_empty());
        }
        if let Some(host_key) = overrides.host_key {
            self.host_key = Some(host_key).filter(|k| !k.is_empty());
        }
        if let Some(address_keys) = overrides.address_keys {
            self.address_keys = address_keys;
        }
        if let Some(groups_key) = overrides.groups_key {
            self.groups_key = groups_key;
        }
        if let Some(vars_key) = overrides.vars_key {
            self.vars_key = vars_key;
        }
        if let Some(extra_vars_key) = overrides.extra_vars_key {
            self.extra_vars_key = Some(extra_vars_key).filter(|k| !k.is_empty());
        }
    }
}

impl Default for ExtractionProfile {
    fn default() -> Self {
        Self::for_convention(Convention::default())
    }
}

/// Partial profile as written in a config file. An empty string clears an
/// optional key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileOverrides {
    pub sentinel: Option<String>,
    pub host_key: Option<String>,
    pub address_keys: Option<Vec<String>>,
    pub groups_key: Option<String>,
    pub vars_key: Option<String>,
    pub extra_vars_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub convention: Option<Convention>,
    pub profile: ProfileOverrides,
    pub include_unaddressable: Option<bool>,
    pub state_command: Option<String>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, InventoryError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            InventoryError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&contents)
            .map_err(|e| InventoryError::Config(format!("invalid {}: {}", path.display(), e)))
    }

    /// `<config dir>/tfinv/config.json`, if it exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .filter(|path| path.is_file())
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub convention: Option<Convention>,
    pub host_key: Option<String>,
    pub include_unaddressable: bool,
    pub state_command: Option<String>,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub profile: ExtractionProfile,
    /// Keep a vars entry keyed by `""` for resources without an address.
    pub include_unaddressable: bool,
    pub state_command: String,
}

impl Settings {
    pub fn resolve(file: Option<ConfigFile>, overrides: Overrides) -> Self {
        let file = file.unwrap_or_default();

        let convention = overrides
            .convention
            .or(file.convention)
            .unwrap_or_default();
        let mut profile = ExtractionProfile::for_convention(convention);
        profile.apply(file.profile);
        if let Some(host_key) = overrides.host_key.filter(|k| !k.is_empty()) {
            profile.host_key = Some(host_key);
        }

        Self {
            profile,
            include_unaddressable: overrides.include_unaddressable
                || file.include_unaddressable.unwrap_or(false),
            state_command: overrides
                .state_command
                .or(file.state_command)
                .unwrap_or_else(|| DEFAULT_STATE_COMMAND.to_string()),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(None, Overrides::default())
    }
}
