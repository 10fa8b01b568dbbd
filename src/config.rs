//! Registry file path resolution.
//!
//! Order of preference: `--config` flag > `GMACHINE_CONFIG` environment
//! variable > platform config dir (e.g. `~/.config/gmachine/gmachine.yaml`).
//! Resolution is explicit (a value passed into the registry loader), not
//! package-level state.

use std::path::{Path, PathBuf};

/// Environment variable overriding the registry file location.
pub const CONFIG_ENV: &str = "GMACHINE_CONFIG";

/// Resolved location of the registry file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPath {
    pub path: PathBuf,
}

impl ConfigPath {
    /// Resolve the registry path from an optional CLI flag.
    pub fn resolve(flag: Option<PathBuf>) -> Self {
        if let Some(path) = flag {
            return ConfigPath { path };
        }
        Self::from_env(std::env::var(CONFIG_ENV).ok())
    }

    /// Resolution from an explicit environment value; split out for tests.
    fn from_env(env: Option<String>) -> Self {
        if let Some(value) = env.filter(|v| !v.is_empty()) {
            return ConfigPath {
                path: PathBuf::from(value),
            };
        }
        ConfigPath {
            path: default_path(),
        }
    }
}

fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gmachine")
        .join("gmachine.yaml")
}

/// Expand a leading `~` or `~/` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    let Some(s) = path.to_str() else {
        return path.to_path_buf();
    };
    if s == "~" {
        return dirs::home_dir().unwrap_or_else(|| path.to_path_buf());
    }
    if let Some(rest) = s.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins_over_env() {
        let resolved = ConfigPath::resolve(Some(PathBuf::from("/tmp/custom.yaml")));
        assert_eq!(resolved.path, PathBuf::from("/tmp/custom.yaml"));
    }

    #[test]
    fn test_env_wins_over_default() {
        let resolved = ConfigPath::from_env(Some("/tmp/env.yaml".to_string()));
        assert_eq!(resolved.path, PathBuf::from("/tmp/env.yaml"));
    }

    #[test]
    fn test_empty_env_falls_back_to_default() {
        let resolved = ConfigPath::from_env(Some(String::new()));
        assert!(resolved.path.ends_with("gmachine/gmachine.yaml"));
    }

    #[test]
    fn test_default_path_shape() {
        let resolved = ConfigPath::from_env(None);
        assert!(resolved.path.ends_with("gmachine/gmachine.yaml"));
    }

    #[test]
    fn test_expand_home_tilde_prefix() {
        if let Some(home) = dirs::home_dir() {
            let expanded = expand_home(Path::new("~/gmachine.yaml"));
            assert_eq!(expanded, home.join("gmachine.yaml"));
        }
    }

    #[test]
    fn test_expand_home_plain_path_untouched() {
        let expanded = expand_home(Path::new("/etc/gmachine.yaml"));
        assert_eq!(expanded, PathBuf::from("/etc/gmachine.yaml"));
    }
}
