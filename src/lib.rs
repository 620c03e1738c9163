//! tfinv - Terraform state to Ansible inventory
//!
//! Reads Terraform state (a file, or `terragrunt state pull` across a directory tree)
//! and builds an Ansible dynamic inventory: groups of hosts, per-host vars and
//! per-host attributes.

pub mod cli;
pub mod config;
pub mod error;
pub mod inventory;
pub mod output;
pub mod providers;
pub mod resource;
pub mod terraform;

pub use config::{Convention, ExtractionProfile, Settings};
pub use error::InventoryError;
pub use inventory::Inventory;
pub use providers::{AdapterRegistry, ProviderAdapter};
pub use resource::{Extractor, Resource};
pub use terraform::{Aggregator, CommandStateSource, StateDocument, StateSource};
