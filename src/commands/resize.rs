//! Resize command handler

use anyhow::Result;

use gmachine::{gcloud, ConfigPath, Registry};

pub fn cmd_resize(config: &ConfigPath, name: &str, machine_type: &str) -> Result<()> {
    let registry = Registry::load(&config.path)?;
    let machine = registry.get(name)?;

    gcloud::resize_instance(
        name,
        &machine.account,
        &machine.project,
        &machine.zone,
        machine_type,
    )?;
    Ok(())
}
