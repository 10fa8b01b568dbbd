//! Delete command handler

use anyhow::{anyhow, Result};

use gmachine::{gcloud, ConfigPath, Registry};

/// Delete the instance with the provider, then remove it from the registry.
/// With `force`, the registry entry is removed even when the provider call
/// fails (e.g. the instance is already gone).
pub fn cmd_delete(config: &ConfigPath, name: &str, force: bool) -> Result<()> {
    let registry = Registry::load(&config.path)?;
    let machine = registry.get(name)?;

    println!("Deleting {}...", machine.name);

    let result = gcloud::delete_instance(
        &machine.name,
        &machine.account,
        &machine.project,
        &machine.zone,
    );
    if let Err(err) = result {
        if !force {
            return Err(anyhow!(
                "delete failed: {err} (re-run with '-f' to remove '{}' from the registry anyway)",
                machine.name
            ));
        }
    }

    registry.delete(name)?;

    println!("Success");
    Ok(())
}
