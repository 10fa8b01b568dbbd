//! SSH command handler

use anyhow::Result;

use gmachine::{gcloud, ConfigPath, Registry};

/// Replace this process with `gcloud compute ssh` for the target machine.
///
/// Extra ssh args come from the `--ssh-args` flag when given, otherwise the
/// record's `default_ssh_args`; `-A` appends agent forwarding either way.
pub fn cmd_ssh(
    config: &ConfigPath,
    name: Option<String>,
    ssh_args: Option<String>,
    agent_forward: bool,
) -> Result<()> {
    let registry = Registry::load(&config.path)?;
    let name = super::target_machine(&registry, name)?;
    let machine = registry.get(&name)?;

    let mut extra = ssh_args.unwrap_or(machine.default_ssh_args);
    if agent_forward {
        extra.push_str(" -A");
    }

    gcloud::ssh_instance(
        &name,
        &machine.account,
        &machine.project,
        &machine.zone,
        extra.trim(),
    )?;
    Ok(())
}
