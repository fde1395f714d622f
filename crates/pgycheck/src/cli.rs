use clap::Parser;

use crate::settings::AppSettings;

#[derive(Debug, Parser)]
#[command(name = "pgycheck", version, about = "Check a Pgyer-distributed app for updates")]
pub struct Cli {
    /// Application key of the app to check.
    #[arg(long)]
    pub app_key: String,

    /// Account API key; falls back to the settings file.
    #[arg(long, env = "PGYCHECK_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Version string of the installed build.
    #[arg(long)]
    pub build_version: Option<String>,

    /// Service-assigned build number of the installed build.
    #[arg(long)]
    pub build_build_version: Option<i64>,

    #[arg(long)]
    pub channel_key: Option<String>,

    /// Host to try, in order. Repeat for fallbacks.
    #[arg(long = "host", value_name = "HOST")]
    pub hosts: Vec<String>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Print the update info as JSON.
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,

    /// Store the API key, hosts and timeout in the settings file.
    #[arg(long)]
    pub save_settings: bool,
}

impl Cli {
    /// Stored settings with the persistent flags (API key, hosts, timeout) overlaid.
    pub fn persisted(&self, stored: &AppSettings) -> AppSettings {
        let mut settings = stored.clone();
        if let Some(api_key) = &self.api_key {
            settings.api_key = Some(api_key.clone());
        }
        if !self.hosts.is_empty() {
            settings.hosts.clone_from(&self.hosts);
        }
        if let Some(timeout) = self.timeout_secs {
            settings.http_timeout_secs = timeout;
        }
        settings
    }

    /// Settings for this run only; `--debug` is never written back.
    pub fn effective(&self, stored: &AppSettings) -> AppSettings {
        let mut settings = self.persisted(stored);
        settings.debug_logging |= self.debug;
        settings
    }
}
