mod args;

pub use args::{Cli, Mode};

use std::io::Write;
use std::path::Path;

use crate::config::{ConfigFile, Settings};
use crate::error::InventoryError;
use crate::inventory::Inventory;
use crate::output;
use crate::providers::AdapterRegistry;
use crate::resource::Extractor;
use crate::terraform::{Aggregator, CommandStateSource, StateDocument, StateSource};

pub fn settings(cli: &Cli) -> Result<Settings, InventoryError> {
    let file = match cli.config.clone().or_else(ConfigFile::default_path) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config file");
            Some(ConfigFile::load(&path)?)
        }
        None => None,
    };
    Ok(Settings::resolve(file, cli.overrides()))
}

/// Reads a state file directly, or resolves a directory through `source`.
pub fn load_state<S: StateSource>(path: &Path, source: S) -> Result<StateDocument, InventoryError> {
    let metadata = std::fs::metadata(path)?;

    if !metadata.is_dir() {
        return StateDocument::from_path(path);
    }

    let doc = Aggregator::new(source).resolve(path);
    if doc.is_empty() {
        return Err(InventoryError::NoState {
            path: path.to_path_buf(),
        });
    }
    Ok(doc)
}

/// Runs one invocation, writing the selected view to `out`.
///
/// Returns `false` when the run completed but should exit non-zero
/// (a `--host` lookup miss).
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<bool, InventoryError> {
    let settings = settings(cli)?;
    let source = CommandStateSource::from_command_line(&settings.state_command)?;
    let doc = load_state(&cli.path, source)?;
    render(cli.mode(), &doc, &settings, out)
}

pub fn render<W: Write>(
    mode: Mode,
    doc: &StateDocument,
    settings: &Settings,
    out: &mut W,
) -> Result<bool, InventoryError> {
    let extractor = Extractor::new(settings.profile.clone(), AdapterRegistry::builtin())?;
    let resources = extractor.resources(doc);

    match mode {
        Mode::List => {
            let inventory = Inventory::gather(&resources, settings.include_unaddressable);
            output::write_list(out, &inventory)?;
            Ok(true)
        }
        Mode::Inventory => {
            let inventory = Inventory::gather(&resources, settings.include_unaddressable);
            output::write_inventory(out, &inventory)?;
            Ok(true)
        }
        Mode::Host(host) => {
            let found = output::write_host(out, &resources, &host)?;
            if !found {
                tracing::warn!(host = %host, "no resource with this address");
            }
            Ok(found)
        }
    }
}
