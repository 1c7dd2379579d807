//! Runtime configuration of the binary.

use std::path::PathBuf;

/// Environment variable overriding the store location.
pub const STORE_ENV: &str = "SSHCONFIG_STORE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store_path: PathBuf,
}

impl Config {
    /// Store path precedence: `--store`, `$SSHCONFIG_STORE`,
    /// `$HOME/.sshconfig/store.json`, then `./sshconfig-store.json`.
    pub fn resolve(cli_store: Option<PathBuf>) -> Self {
        Self::resolve_with(cli_store, |key| std::env::var(key).ok())
    }

    pub fn resolve_with(cli_store: Option<PathBuf>, env: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        let store_path = cli_store
            .or_else(|| non_empty(STORE_ENV).map(PathBuf::from))
            .or_else(|| {
                non_empty("HOME").map(|home| PathBuf::from(home).join(".sshconfig").join("store.json"))
            })
            .unwrap_or_else(|| PathBuf::from("sshconfig-store.json"));
        Self { store_path }
    }
}
