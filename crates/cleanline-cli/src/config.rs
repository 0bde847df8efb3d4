/*
[INPUT]:  YAML configuration file
[OUTPUT]: Parsed cleanline configuration
[POS]:    Configuration layer - backend, wizard and job setup
[UPDATE]: When adding new configuration options
*/

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use cleanline_adapter::ClientConfig;
use cleanline_adapter::http::client::DEFAULT_BASE_URL;
use cleanline_wizard::flows::ArrivalReference;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Top-level configuration for the cleanline CLI
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CleanlineConfig {
    /// Backend endpoints and HTTP timeouts
    #[serde(default)]
    pub api: ApiConfig,
    /// Wizard commit behaviour
    #[serde(default)]
    pub wizard: WizardConfig,
    /// Also write logs to this file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Jobs available to `complete-job`
    #[serde(default)]
    pub jobs: Vec<JobConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_realtime_url")]
    pub realtime_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            realtime_url: default_realtime_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WizardConfig {
    /// Upper bound on one commit attempt
    #[serde(default = "default_commit_timeout_secs")]
    pub commit_timeout_secs: u64,
    /// Latency of simulated backends
    #[serde(default = "default_simulated_delay_ms")]
    pub simulated_delay_ms: u64,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            commit_timeout_secs: default_commit_timeout_secs(),
            simulated_delay_ms: default_simulated_delay_ms(),
        }
    }
}

/// A job a cleaner can check in to
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobConfig {
    pub id: String,
    pub title: String,
    /// Pay per hour on site
    pub hourly_rate: Decimal,
    pub property_code: String,
    pub access_pin: String,
    #[serde(default)]
    pub tasks: Vec<String>,
}

impl JobConfig {
    pub fn reference(&self) -> ArrivalReference {
        ArrivalReference {
            property_code: self.property_code.clone(),
            access_pin: self.access_pin.clone(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_realtime_url() -> String {
    "ws://localhost:5000/ws".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_commit_timeout_secs() -> u64 {
    30
}

fn default_simulated_delay_ms() -> u64 {
    1500
}

impl CleanlineConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content).context("parse config")?;
        Ok(config)
    }

    /// Reject values the CLI cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api.timeout_secs == 0 || self.wizard.commit_timeout_secs == 0 {
            bail!("timeouts must be greater than zero");
        }
        if !(self.api.realtime_url.starts_with("ws://") || self.api.realtime_url.starts_with("wss://"))
        {
            bail!(
                "api.realtime_url must use ws:// or wss://, got {}",
                self.api.realtime_url
            );
        }

        let mut seen = HashSet::new();
        for job in &self.jobs {
            if !seen.insert(job.id.as_str()) {
                bail!("duplicate job id {}", job.id);
            }
            if job.hourly_rate.is_sign_negative() {
                bail!("job {} has a negative hourly_rate", job.id);
            }
            if job.property_code.trim().is_empty() || job.access_pin.trim().is_empty() {
                bail!("job {} needs a property_code and access_pin", job.id);
            }
        }
        Ok(())
    }

    pub fn job(&self, id: &str) -> Option<&JobConfig> {
        self.jobs.iter().find(|job| job.id == id)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.api.timeout_secs),
            connect_timeout: Duration::from_secs(self.api.connect_timeout_secs),
        }
    }

    pub fn commit_timeout(&self) -> Duration {
        Duration::from_secs(self.wizard.commit_timeout_secs)
    }

    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.wizard.simulated_delay_ms)
    }
}
