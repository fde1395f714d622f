use std::path::Path;

use pgycheck_core::HostList;
use pgycheck_platform::AppPaths;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub api_key: Option<String>,

    /// Hosts tried in order; empty means the built-in list.
    #[serde(default)]
    pub hosts: Vec<String>,

    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: u64,
}

fn default_http_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_max_log_size_bytes() -> u64 {
    5 * 1024 * 1024
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            hosts: Vec::new(),
            http_timeout_secs: default_http_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            debug_logging: false,
            max_log_size_bytes: default_max_log_size_bytes(),
        }
    }
}

impl AppSettings {
    pub fn load(paths: &AppPaths) -> Result<Self, serde_json::Error> {
        Self::load_from(&paths.settings_file())
    }

    /// Read settings from `path`. A missing or unreadable file yields defaults;
    /// a file that is not valid settings JSON is an error.
    pub fn load_from(path: &Path) -> Result<Self, serde_json::Error> {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn save(&self, paths: &AppPaths) -> Result<(), std::io::Error> {
        paths.ensure_dirs()?;
        self.save_to(&paths.settings_file())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
    }

    pub fn host_list(&self) -> HostList {
        HostList::new(self.hosts.iter().map(String::as_str)).unwrap_or_default()
    }
}
