//! Command handlers for the gmachine binary.
//!
//! Each handler loads the registry from the resolved config path, performs
//! its work, and returns `anyhow::Result` so registry errors abort the
//! command with a one-line message and a non-zero exit.

pub mod console;
pub mod create;
pub mod defaults;
pub mod delete;
pub mod list;
pub mod power;
pub mod print_ip;
pub mod resize;
pub mod ssh;
pub mod status;

use gmachine::{GmachineError, Registry};

/// Resolve the machine to operate on: an explicit name wins, otherwise the
/// registry default. Errors when neither is available.
pub(crate) fn target_machine(
    registry: &Registry,
    name: Option<String>,
) -> Result<String, GmachineError> {
    let name = name.unwrap_or_else(|| registry.get_default());
    if name.is_empty() {
        return Err(GmachineError::NoMachineSelected);
    }
    Ok(name)
}
