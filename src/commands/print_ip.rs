//! print-ip command handler

use anyhow::Result;

use gmachine::{gcloud, ConfigPath, Registry};

pub fn cmd_print_ip(config: &ConfigPath, name: Option<String>) -> Result<()> {
    let registry = Registry::load(&config.path)?;
    let name = super::target_machine(&registry, name)?;
    let machine = registry.get(&name)?;

    gcloud::print_ip(&name, &machine.account, &machine.project, &machine.zone)?;
    Ok(())
}
