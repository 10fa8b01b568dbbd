//! Durable registry of machine aliases.
//!
//! The registry is a small YAML file holding machine records and one
//! "default" pointer. All access goes through a registry-wide `RwLock`:
//! reads take the shared lock, mutations take the exclusive lock and persist
//! the full registry back to disk before returning, so the serialized
//! snapshot always matches the in-memory state at the instant of the call.
//!
//! A persistence failure after an in-memory mutation is surfaced to the
//! caller but the mutation is not rolled back; the in-memory registry then
//! diverges from disk until the next successful save.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::config::expand_home;
use crate::error::{GmachineError, GmachineResult};
use crate::models::MachineRecord;

const REGISTRY_VERSION: u32 = 1;

/// On-disk shape of the registry. Machine order is insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct RegistryData {
    version: u32,
    #[serde(default)]
    default: String,
    #[serde(default)]
    machines: Vec<MachineRecord>,
}

impl RegistryData {
    fn new() -> Self {
        RegistryData {
            version: REGISTRY_VERSION,
            default: String::new(),
            machines: Vec::new(),
        }
    }

    fn find(&self, name: &str) -> Option<&MachineRecord> {
        self.machines.iter().find(|m| m.name == name)
    }
}

/// Concurrency-safe, file-backed store of machine records.
pub struct Registry {
    inner: RwLock<RegistryData>,
    path: PathBuf,
}

impl Registry {
    /// Load the registry from `path`.
    ///
    /// A missing file yields an empty registry, not an error. A file that
    /// exists but cannot be read or parsed is an error, as is a file that
    /// exists but is not writable (checked here so that later mutations do
    /// not fail silently). `~` in the path is expanded.
    pub fn load(path: &Path) -> GmachineResult<Registry> {
        let path = expand_home(path);

        if !path.is_file() {
            return Ok(Registry {
                inner: RwLock::new(RegistryData::new()),
                path,
            });
        }

        if !writable(&path) {
            return Err(GmachineError::Permission { path });
        }

        let contents = std::fs::read_to_string(&path)?;
        // An empty file is a valid empty registry.
        let data = if contents.trim().is_empty() {
            RegistryData::new()
        } else {
            serde_yaml_ng::from_str(&contents)?
        };

        Ok(Registry {
            inner: RwLock::new(data),
            path,
        })
    }

    pub fn exists(&self, name: &str) -> bool {
        let data = self.inner.read().expect("registry lock poisoned");
        data.find(name).is_some()
    }

    pub fn get(&self, name: &str) -> GmachineResult<MachineRecord> {
        let data = self.inner.read().expect("registry lock poisoned");
        data.find(name)
            .cloned()
            .ok_or_else(|| GmachineError::NotFound {
                name: name.to_string(),
            })
    }

    /// Add a record. The first record added becomes the default.
    pub fn add(&self, record: MachineRecord) -> GmachineResult<()> {
        let mut data = self.inner.write().expect("registry lock poisoned");
        if data.find(&record.name).is_some() {
            return Err(GmachineError::AlreadyExists { name: record.name });
        }
        if data.machines.is_empty() {
            data.default = record.name.clone();
        }
        data.machines.push(record);
        self.persist(&data)
    }

    /// Remove a record. If it was the default, the default is cleared.
    pub fn delete(&self, name: &str) -> GmachineResult<()> {
        let mut data = self.inner.write().expect("registry lock poisoned");
        let Some(index) = data.machines.iter().position(|m| m.name == name) else {
            return Err(GmachineError::NotFound {
                name: name.to_string(),
            });
        };
        data.machines.remove(index);
        if data.default == name {
            data.default.clear();
        }
        self.persist(&data)
    }

    /// Set the default machine. The empty string clears the default and is
    /// always legal; any other name must exist.
    pub fn set_default(&self, name: &str) -> GmachineResult<()> {
        let mut data = self.inner.write().expect("registry lock poisoned");
        if !name.is_empty() && data.find(name).is_none() {
            return Err(GmachineError::NotFound {
                name: name.to_string(),
            });
        }
        data.default = name.to_string();
        self.persist(&data)
    }

    /// Name of the default machine, or empty if unset.
    pub fn get_default(&self) -> String {
        let data = self.inner.read().expect("registry lock poisoned");
        data.default.clone()
    }

    pub fn count(&self) -> usize {
        let data = self.inner.read().expect("registry lock poisoned");
        data.machines.len()
    }

    /// Snapshot copy of all records in insertion order.
    pub fn machines(&self) -> Vec<MachineRecord> {
        let data = self.inner.read().expect("registry lock poisoned");
        data.machines.clone()
    }

    /// Serialize `data` and write it to the registry file. Called with the
    /// exclusive lock held so two mutators cannot interleave their writes.
    fn persist(&self, data: &RegistryData) -> GmachineResult<()> {
        let yaml = serde_yaml_ng::to_string(data)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }
}

/// True if the current process can write to `path`.
fn writable(path: &Path) -> bool {
    OpenOptions::new().append(true).open(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CsekBundle, CsekKey};
    use proptest::prelude::*;
    use std::collections::HashSet;
    use tempfile::tempdir;

    fn record(name: &str) -> MachineRecord {
        MachineRecord {
            name: name.to_string(),
            account: "my-account".to_string(),
            project: "my-proj".to_string(),
            zone: "us-west1-a".to_string(),
            csek: CsekBundle::default(),
            default_ssh_args: String::new(),
            service_account: String::new(),
        }
    }

    fn temp_registry(dir: &tempfile::TempDir) -> Registry {
        Registry::load(&dir.path().join("gmachine.yaml")).unwrap()
    }

    #[test]
    fn test_load_missing_file_yields_empty_registry() {
        let registry = Registry::load(Path::new("/no/such/dir/gmachine.yaml")).unwrap();
        assert_eq!(registry.count(), 0);
        assert_eq!(registry.get_default(), "");
    }

    #[test]
    fn test_load_empty_file_yields_empty_registry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gmachine.yaml");
        std::fs::write(&path, "").unwrap();

        let registry = Registry::load(&path).unwrap();
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_load_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gmachine.yaml");
        std::fs::write(&path, "asdfasdfasdfkjaskdfjaslfdf").unwrap();

        let result = Registry::load(&path);
        assert!(matches!(result, Err(GmachineError::Yaml(_))));
    }

    #[test]
    fn test_load_valid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gmachine.yaml");
        std::fs::write(
            &path,
            r#"---
version: 1
default: foo
machines:
  - name: foo
    account: my-account
    project: my-proj
    zone: us-central1-a
    csek:
      - uri: "https://www.googleapis.com/compute/v1/projects/p/zones/us-central1-b/disks/foo"
        key: "acXTX3rxrKAFTF0tYVLvydU1riRZTvUNC4g5I11NY+c="
        key-type: "raw"
"#,
        )
        .unwrap();

        let registry = Registry::load(&path).unwrap();
        assert_eq!(registry.get_default(), "foo");

        let machine = registry.get("foo").unwrap();
        assert_eq!(machine.account, "my-account");
        assert_eq!(machine.project, "my-proj");
        assert_eq!(machine.zone, "us-central1-a");

        let csek: &CsekKey = &machine.csek.0[0];
        assert_eq!(
            csek.uri,
            "https://www.googleapis.com/compute/v1/projects/p/zones/us-central1-b/disks/foo"
        );
        assert_eq!(csek.key, "acXTX3rxrKAFTF0tYVLvydU1riRZTvUNC4g5I11NY+c=");
        assert_eq!(csek.key_type, "raw");
    }

    #[cfg(unix)]
    #[test]
    fn test_load_unwritable_file_is_a_permission_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("gmachine.yaml");
        std::fs::write(&path, "version: 1\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o400)).unwrap();
        if writable(&path) {
            // permission bits are not enforced for this user (e.g. root)
            return;
        }

        let result = Registry::load(&path);
        assert!(matches!(result, Err(GmachineError::Permission { .. })));
    }

    #[test]
    fn test_add_first_machine_becomes_default() {
        let dir = tempdir().unwrap();
        let registry = temp_registry(&dir);

        registry.add(record("foo")).unwrap();
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.get_default(), "foo");

        // second add does not steal the default
        registry.add(record("bar")).unwrap();
        assert_eq!(registry.count(), 2);
        assert_eq!(registry.get_default(), "foo");
    }

    #[test]
    fn test_add_duplicate_is_an_error() {
        let dir = tempdir().unwrap();
        let registry = temp_registry(&dir);

        registry.add(record("foo")).unwrap();
        let result = registry.add(record("foo"));
        assert!(matches!(result, Err(GmachineError::AlreadyExists { .. })));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_add_persists_and_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gmachine.yaml");

        let registry = Registry::load(&path).unwrap();
        registry.add(record("foo")).unwrap();
        registry.add(record("bar")).unwrap();

        let reloaded = Registry::load(&path).unwrap();
        assert_eq!(reloaded.count(), 2);
        assert_eq!(reloaded.get_default(), registry.get_default());
        assert_eq!(reloaded.machines(), registry.machines());
    }

    #[test]
    fn test_get_missing_machine_is_not_found() {
        let dir = tempdir().unwrap();
        let registry = temp_registry(&dir);

        let result = registry.get("no-such-machine");
        assert!(matches!(result, Err(GmachineError::NotFound { .. })));
    }

    #[test]
    fn test_delete_removes_machine_and_clears_default() {
        let dir = tempdir().unwrap();
        let registry = temp_registry(&dir);

        registry.add(record("foo")).unwrap();
        registry.add(record("bar")).unwrap();
        assert_eq!(registry.get_default(), "foo");

        registry.delete("foo").unwrap();
        assert!(!registry.exists("foo"));
        assert_eq!(registry.count(), 1);
        // deleted machine was the default, so the default is now unset
        assert_eq!(registry.get_default(), "");

        let result = registry.delete("no-such-machine");
        assert!(matches!(result, Err(GmachineError::NotFound { .. })));
    }

    #[test]
    fn test_delete_non_default_keeps_default() {
        let dir = tempdir().unwrap();
        let registry = temp_registry(&dir);

        registry.add(record("foo")).unwrap();
        registry.add(record("bar")).unwrap();

        registry.delete("bar").unwrap();
        assert_eq!(registry.get_default(), "foo");
    }

    #[test]
    fn test_set_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gmachine.yaml");
        let registry = Registry::load(&path).unwrap();

        registry.add(record("foo")).unwrap();
        registry.add(record("bar")).unwrap();

        registry.set_default("bar").unwrap();
        assert_eq!(registry.get_default(), "bar");

        // unknown machine fails and leaves the prior default unchanged
        let result = registry.set_default("no-such-machine");
        assert!(matches!(result, Err(GmachineError::NotFound { .. })));
        assert_eq!(registry.get_default(), "bar");

        // clearing the default is always legal
        registry.set_default("").unwrap();
        assert_eq!(registry.get_default(), "");

        registry.set_default("bar").unwrap();
        let reloaded = Registry::load(&path).unwrap();
        assert_eq!(reloaded.get_default(), "bar");
    }

    #[test]
    fn test_machines_snapshot_preserves_insertion_order() {
        let dir = tempdir().unwrap();
        let registry = temp_registry(&dir);

        for name in ["c", "a", "b"] {
            registry.add(record(name)).unwrap();
        }
        let names: Vec<String> = registry.machines().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    proptest! {
        #[test]
        fn prop_distinct_adds_count_and_first_default(
            names in proptest::collection::hash_set("[a-z][a-z0-9-]{0,12}", 1..8)
        ) {
            let dir = tempdir().unwrap();
            let registry = temp_registry(&dir);

            let names: Vec<String> = names.into_iter().collect();
            for name in &names {
                registry.add(record(name)).unwrap();
            }

            prop_assert_eq!(registry.count(), names.len());
            prop_assert_eq!(registry.get_default(), names[0].clone());

            let stored: HashSet<String> =
                registry.machines().into_iter().map(|m| m.name).collect();
            let expected: HashSet<String> = names.into_iter().collect();
            prop_assert_eq!(stored, expected);
        }
    }
}
