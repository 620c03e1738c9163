use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::config::{Convention, Overrides};

/// Ansible dynamic inventory from Terraform state.
#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(group(ArgGroup::new("mode").required(true).args(["list", "inventory", "host"])))]
pub struct Cli {
    /// Emit the full inventory as JSON
    #[arg(long)]
    pub list: bool,

    /// Emit the inventory as INI-style text
    #[arg(long)]
    pub inventory: bool,

    /// Emit the attributes of a single host as JSON
    #[arg(long, value_name = "ADDRESS")]
    pub host: Option<String>,

    /// State file, or a directory in which the state command is run
    #[arg(env = "TF_STATE", default_value = ".")]
    pub path: PathBuf,

    #[arg(long, value_enum, env = "TF_INVENTORY_CONVENTION")]
    pub convention: Option<Convention>,

    /// Attribute holding the host address, checked before provider keys
    #[arg(long = "key-name", env = "TF_KEY_NAME")]
    pub key_name: Option<String>,

    #[arg(long, env = "TF_INVENTORY_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "TF_STATE_COMMAND")]
    pub state_command: Option<String>,

    /// Keep vars of resources without an address under the "" host
    #[arg(long)]
    pub include_unaddressable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    List,
    Inventory,
    Host(String),
}

impl Cli {
    pub fn mode(&self) -> Mode {
        match &self.host {
            Some(host) => Mode::Host(host.clone()),
            None if self.inventory => Mode::Inventory,
            None => Mode::List,
        }
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            convention: self.convention,
            host_key: self.key_name.clone(),
            include_unaddressable: self.include_unaddressable,
            state_command: self.state_command.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use clap::error::ErrorKind;
    use serial_test::serial;

    #[test]
    fn test_list_mode_with_path() {
        let cli = Cli::parse_from(["tfinv", "--list", "terraform.tfstate"]);
        assert_eq!(cli.mode(), Mode::List);
        assert_eq!(cli.path, PathBuf::from("terraform.tfstate"));
    }

    #[test]
    fn test_host_mode() {
        let cli = Cli::parse_from(["tfinv", "--host", "10.0.0.1", "state.json"]);
        assert_eq!(cli.mode(), Mode::Host("10.0.0.1".to_string()));
    }

    #[test]
    fn test_inventory_mode_with_convention() {
        let cli = Cli::parse_from(["tfinv", "--inventory", "--convention", "triggers", "infra"]);
        assert_eq!(cli.mode(), Mode::Inventory);
        assert_eq!(cli.convention, Some(Convention::Triggers));
    }

    #[test]
    fn test_mode_is_required() {
        let err = Cli::try_parse_from(["tfinv", "state.json"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_modes_are_exclusive() {
        let err = Cli::try_parse_from(["tfinv", "--list", "--inventory"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_overrides_from_flags() {
        let cli = Cli::parse_from([
            "tfinv",
            "--list",
            "--key-name=private_ip",
            "--state-command",
            "terraform state pull",
            "--include-unaddressable",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.host_key.as_deref(), Some("private_ip"));
        assert_eq!(overrides.state_command.as_deref(), Some("terraform state pull"));
        assert!(overrides.include_unaddressable);
    }

    #[test]
    #[serial]
    fn test_path_defaults_to_current_dir() {
        let backup = std::env::var("TF_STATE").ok();
        unsafe {
            std::env::remove_var("TF_STATE");
        }

        let cli = Cli::parse_from(["tfinv", "--list"]);

        unsafe {
            if let Some(path) = backup {
                std::env::set_var("TF_STATE", path);
            }
        }

        assert_eq!(cli.path, PathBuf::from("."));
    }

    #[test]
    #[serial]
    fn test_key_name_from_env_var() {
        let backup = std::env::var("TF_KEY_NAME").ok();
        unsafe {
            std::env::set_var("TF_KEY_NAME", "access_ip_v4");
        }

        let cli = Cli::parse_from(["tfinv", "--list"]);

        unsafe {
            match backup {
                Some(key) => std::env::set_var("TF_KEY_NAME", key),
                None => std::env::remove_var("TF_KEY_NAME"),
            }
        }

        assert_eq!(cli.key_name.as_deref(), Some("access_ip_v4"));
    }

    #[test]
    #[serial]
    fn test_key_name_flag_takes_precedence_over_env() {
        let backup = std::env::var("TF_KEY_NAME").ok();
        unsafe {
            std::env::set_var("TF_KEY_NAME", "env_key");
        }

        let cli = Cli::parse_from(["tfinv", "--list", "--key-name=cli_key"]);

        unsafe {
            match backup {
                Some(key) => std::env::set_var("TF_KEY_NAME", key),
                None => std::env::remove_var("TF_KEY_NAME"),
            }
        }

        assert_eq!(cli.key_name.as_deref(), Some("cli_key"));
    }
}
