//! gmachine - manage personal cloud compute machines
//!
//! gmachine keeps a local registry of named machine aliases (with a default
//! selection and optional customer-supplied disk encryption keys) and wraps
//! the `gcloud` CLI for the actual provider operations. Status reporting
//! fans describe calls out concurrently with a fixed worker ceiling.

pub mod config;
pub mod error;
pub mod gcloud;
pub mod models;
pub mod registry;
pub mod status;
pub mod table;

// Re-exports for convenience
pub use config::{ConfigPath, CONFIG_ENV};
pub use error::{GmachineError, GmachineResult};
pub use gcloud::{Describer, GcloudDescriber, Instance};
pub use models::{CsekBundle, CsekKey, MachineRecord};
pub use registry::Registry;
pub use status::{aggregate_status, MAX_CONCURRENT_DESCRIBES, STATUS_COLUMNS};
pub use table::{Presenter, TableWriter};
