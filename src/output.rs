use std::io::Write;

use serde_json::{Map, Value, json};

use crate::error::InventoryError;
use crate::inventory::Inventory;
use crate::resource::Resource;

pub const META_KEY: &str = "_meta";

/// `--list`: one key per group plus `_meta` with every host's vars.
pub fn write_list<W: Write>(writer: &mut W, inventory: &Inventory) -> Result<(), InventoryError> {
    let mut root = Map::new();
    for (group, hosts) in inventory.groups() {
        root.insert(group.clone(), json!(hosts));
    }
    root.insert(META_KEY.to_string(), json!(inventory.vars()));

    serde_json::to_writer(&mut *writer, &Value::Object(root)).map_err(std::io::Error::from)?;
    writer.flush()?;
    Ok(())
}

/// `--inventory`: INI-style text, groups in name order, vars in name order.
pub fn write_inventory<W: Write>(
    writer: &mut W,
    inventory: &Inventory,
) -> Result<(), InventoryError> {
    for (group, hosts) in inventory.groups() {
        writeln!(writer, "[{}]", group)?;
        for host in hosts {
            write!(writer, "{}", host)?;
            if let Some(vars) = inventory.host_vars(host) {
                for (name, value) in vars {
                    write!(writer, " {}={}", name, value)?;
                }
            }
            writeln!(writer)?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// `--host`: the raw attributes of the first resource at `hostname`.
///
/// Writes `{}` and returns `false` when no resource matches.
pub fn write_host<W: Write>(
    writer: &mut W,
    resources: &[Resource<'_>],
    hostname: &str,
) -> Result<bool, InventoryError> {
    let found = resources
        .iter()
        .find(|r| r.is_supported() && r.address() == hostname);

    match found {
        Some(resource) => serde_json::to_writer(&mut *writer, resource.attributes())
            .map_err(std::io::Error::from)?,
        None => writer.write_all(b"{}")?,
    }
    writer.flush()?;
    Ok(found.is_some())
}
