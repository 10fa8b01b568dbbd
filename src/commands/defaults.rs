//! set-default / get-default command handlers

use anyhow::Result;

use gmachine::{ConfigPath, Registry};

pub fn cmd_set_default(config: &ConfigPath, name: &str) -> Result<()> {
    let registry = Registry::load(&config.path)?;
    registry.set_default(name)?;
    println!("Success");
    Ok(())
}

pub fn cmd_get_default(config: &ConfigPath) -> Result<()> {
    let registry = Registry::load(&config.path)?;
    println!("{}", registry.get_default());
    Ok(())
}
