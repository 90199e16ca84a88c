use std::path::{Path, PathBuf};

use launchgate_core::VersionComparison;
use launchgate_platform::AppPaths;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSettings {
    #[serde(default)]
    pub config_url: Option<String>,

    #[serde(default)]
    pub store_url: Option<String>,

    #[serde(default)]
    pub platform_key: Option<String>,

    #[serde(default)]
    pub version_comparison: VersionComparison,

    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    #[serde(default)]
    pub skip_superseded_cycles: bool,

    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: u64,

    #[serde(default)]
    pub memory_file: Option<PathBuf>,
}

fn default_http_timeout() -> u64 {
    10
}

fn default_max_log_size_bytes() -> u64 {
    5 * 1024 * 1024
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            config_url: None,
            store_url: None,
            platform_key: None,
            version_comparison: VersionComparison::default(),
            http_timeout_secs: default_http_timeout(),
            skip_superseded_cycles: false,
            debug_logging: false,
            max_log_size_bytes: default_max_log_size_bytes(),
            memory_file: None,
        }
    }
}

impl GateSettings {
    /// Load settings from the platform settings file, falling back to
    /// defaults when it is missing or unreadable.
    pub fn load(paths: &AppPaths) -> Self {
        Self::load_from_path(&paths.settings_file())
    }

    fn load_from_path(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Where dismissals are persisted: the explicit override, or the platform
    /// data directory.
    pub fn memory_path(&self, paths: &AppPaths) -> PathBuf {
        self.memory_file
            .clone()
            .unwrap_or_else(|| paths.dismissals_file())
    }
}
