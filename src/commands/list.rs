//! List command handler

use anyhow::Result;

use gmachine::{ConfigPath, Registry};

/// Print one line per registered machine, marking the default with `*`.
pub fn cmd_list(config: &ConfigPath) -> Result<()> {
    let registry = Registry::load(&config.path)?;
    let default = registry.get_default();

    for machine in registry.machines() {
        let marker = if machine.name == default { "*" } else { " " };
        println!(
            "{} {} ({}, {}, {}, encrypted: {})",
            marker,
            machine.name,
            machine.account,
            machine.project,
            machine.zone,
            machine.encrypted()
        );
    }
    Ok(())
}
