//! Status command handler

use std::io;

use anyhow::Result;

use gmachine::{aggregate_status, ConfigPath, GcloudDescriber, Registry, TableWriter};

/// Print a status table for one machine, or every registered machine with
/// `--all`. Per-machine describe failures are printed as warnings and do not
/// fail the command; only registry or aggregation errors abort.
pub fn cmd_status(config: &ConfigPath, name: Option<String>, all: bool) -> Result<()> {
    let registry = Registry::load(&config.path)?;

    let names: Vec<String> = if all {
        registry.machines().into_iter().map(|m| m.name).collect()
    } else {
        vec![super::target_machine(&registry, name)?]
    };

    let stdout = io::stdout();
    let mut table = TableWriter::new(stdout.lock()).discard_empty_columns();

    aggregate_status(&registry, &names, &GcloudDescriber, &mut table, &mut |err| {
        eprintln!("warning: {err}");
    })?;

    Ok(())
}
