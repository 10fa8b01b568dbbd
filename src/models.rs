//! Persisted data model: machine records and CSEK key bundles.
//!
//! These types define the semantic shape of the registry file. Optional
//! fields default to empty on load so older registry files keep working.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::GmachineResult;

/// One named machine alias stored in the registry.
///
/// `name` is the unique lookup key and is immutable once created. The
/// remaining fields are opaque provider-scoped identifiers plus optional
/// per-machine defaults consumed by the command layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineRecord {
    pub name: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub csek: CsekBundle,
    #[serde(default)]
    pub default_ssh_args: String,
    #[serde(default)]
    pub service_account: String,
}

impl MachineRecord {
    /// True when the machine was created with a customer-supplied
    /// encryption key for its boot disk.
    pub fn encrypted(&self) -> bool {
        !self.csek.is_empty()
    }
}

/// A customer-supplied encryption key bundle.
///
/// Only single-entry bundles with key-type 'raw' are generated locally, but
/// multi-entry bundles load and persist fine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CsekBundle(pub Vec<CsekKey>);

/// One entry in a CSEK bundle. The wire/file field name for the key type is
/// `key-type`, matching the format `gcloud --csek-key-file` expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsekKey {
    pub uri: String,
    pub key: String,
    #[serde(rename = "key-type")]
    pub key_type: String,
}

impl CsekBundle {
    /// Generate a single-key raw bundle for the resource at `uri`.
    ///
    /// The key is 32 bytes from the OS RNG, base64-encoded.
    pub fn generate(uri: &str) -> Self {
        let mut key = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut key);

        CsekBundle(vec![CsekKey {
            uri: uri.to_string(),
            key: BASE64.encode(key),
            key_type: "raw".to_string(),
        }])
    }

    /// Serialize to the JSON form accepted by `gcloud --csek-key-file=-`.
    pub fn to_json(&self) -> GmachineResult<Vec<u8>> {
        let bytes = serde_json::to_vec(&self.0)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
