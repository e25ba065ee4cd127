//! Config discovery for lazyctx.
//!
//! Walks parent directories to find `lazyctx.yaml` and checks for a global
//! config at `~/.config/lazyctx/config.yaml`.

use std::path::{Path, PathBuf};

/// Project config filename to search for in parent directories.
pub const PROJECT_CONFIG_NAME: &str = "lazyctx.yaml";

/// Global config filename within the lazyctx config directory.
pub const GLOBAL_CONFIG_NAME: &str = "config.yaml";

/// Result of config discovery.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryResult {
    /// Nearest `lazyctx.yaml` in the working directory or one of its ancestors.
    pub project_config: Option<PathBuf>,
    /// `~/.config/lazyctx/config.yaml`, if it exists.
    pub global_config: Option<PathBuf>,
    /// Every candidate path that was checked, in order.
    pub searched: Vec<PathBuf>,
}

impl DiscoveryResult {
    /// The config that wins: project over global.
    pub fn effective(&self) -> Option<&Path> {
        self.project_config
            .as_deref()
            .or(self.global_config.as_deref())
    }
}

/// Path of the global config, whether or not it exists.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lazyctx").join(GLOBAL_CONFIG_NAME))
}

/// Discover config files starting from the current working directory.
pub fn discover() -> DiscoveryResult {
    match std::env::current_dir() {
        Ok(dir) => discover_from(&dir.canonicalize().unwrap_or(dir)),
        Err(_) => discover_global(DiscoveryResult::default()),
    }
}

/// Discover config files walking up from `start`.
pub fn discover_from(start: &Path) -> DiscoveryResult {
    let mut result = DiscoveryResult::default();

    for ancestor in start.ancestors() {
        let config_path = ancestor.join(PROJECT_CONFIG_NAME);
        result.searched.push(config_path.clone());
        if is_file(&config_path) {
            result.project_config = Some(config_path);
            break;
        }
    }

    discover_global(result)
}

fn discover_global(mut result: DiscoveryResult) -> DiscoveryResult {
    if let Some(global) = global_config_path() {
        result.searched.push(global.clone());
        if is_file(&global) {
            result.global_config = Some(global);
        }
    }
    result
}

fn is_file(path: &Path) -> bool {
    path.try_exists().unwrap_or(false) && path.is_file()
}
