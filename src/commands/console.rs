//! Console command handler

use anyhow::Result;

use gmachine::{gcloud, ConfigPath, Registry};

/// Open the provider's web console page for the target machine.
pub fn cmd_console(config: &ConfigPath, name: Option<String>, authuser: Option<String>) -> Result<()> {
    let registry = Registry::load(&config.path)?;
    let name = super::target_machine(&registry, name)?;
    let machine = registry.get(&name)?;

    let url = gcloud::console_url(
        &name,
        &machine.project,
        &machine.zone,
        authuser.as_deref().unwrap_or(""),
    );
    gcloud::open_url(&url)?;
    Ok(())
}
