//! start / stop / suspend / resume command handlers
//!
//! start and resume feed the machine's CSEK bundle to the provider on stdin
//! when the boot disk is encrypted.

use anyhow::Result;

use gmachine::{gcloud, ConfigPath, Registry};

pub fn cmd_start(config: &ConfigPath, name: Option<String>) -> Result<()> {
    let registry = Registry::load(&config.path)?;
    let name = super::target_machine(&registry, name)?;
    let machine = registry.get(&name)?;

    gcloud::start_instance(
        &name,
        &machine.account,
        &machine.project,
        &machine.zone,
        &machine.csek,
    )?;
    Ok(())
}

pub fn cmd_stop(config: &ConfigPath, name: Option<String>) -> Result<()> {
    let registry = Registry::load(&config.path)?;
    let name = super::target_machine(&registry, name)?;
    let machine = registry.get(&name)?;

    gcloud::stop_instance(&name, &machine.account, &machine.project, &machine.zone)?;
    Ok(())
}

pub fn cmd_suspend(config: &ConfigPath, name: Option<String>) -> Result<()> {
    let registry = Registry::load(&config.path)?;
    let name = super::target_machine(&registry, name)?;
    let machine = registry.get(&name)?;

    gcloud::suspend_instance(&name, &machine.account, &machine.project, &machine.zone)?;
    Ok(())
}

pub fn cmd_resume(config: &ConfigPath, name: Option<String>) -> Result<()> {
    let registry = Registry::load(&config.path)?;
    let name = super::target_machine(&registry, name)?;
    let machine = registry.get(&name)?;

    gcloud::resume_instance(
        &name,
        &machine.account,
        &machine.project,
        &machine.zone,
        &machine.csek,
    )?;
    Ok(())
}
