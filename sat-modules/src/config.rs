use crate::module::gpredict::{default_module_dir, DEFAULT_QTH};
use crate::module::sat::{
    AMSAT_CSV_URL, DEFAULT_EXPIRY_HOURS, DEFAULT_USER_AGENT, SATNOGS_CSV_URL,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "SAT_MODULES_CONFIG";
const CONFIG_FILE: &str = "sat-modules.toml";
const APP_DIR: &str = "sat-modules";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_amsat_url")]
    pub amsat_url: String,

    #[serde(default = "default_satnogs_url")]
    pub satnogs_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_cache_expiry_hours")]
    pub cache_expiry_hours: i64,

    /// HTTP response cache directory
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Gpredict module directory
    #[serde(default)]
    pub module_dir: Option<PathBuf>,

    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    #[serde(default = "default_qth_file")]
    pub qth_file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_amsat_url() -> String {
    AMSAT_CSV_URL.to_string()
}

fn default_satnogs_url() -> String {
    SATNOGS_CSV_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_cache_expiry_hours() -> i64 {
    DEFAULT_EXPIRY_HOURS
}

fn default_qth_file() -> String {
    DEFAULT_QTH.to_string()
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            amsat_url: default_amsat_url(),
            satnogs_url: default_satnogs_url(),
            user_agent: default_user_agent(),
            cache_expiry_hours: default_cache_expiry_hours(),
            cache_dir: None,
            module_dir: None,
            log_dir: None,
            qth_file: default_qth_file(),
        }
    }
}

impl ToolConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config: ToolConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        config
            .cache_expiry()
            .with_context(|| format!("Invalid config file '{}'", path.display()))?;
        Ok(config)
    }

    /// Load `$SAT_MODULES_CONFIG`, else `<config_dir>/sat-modules/sat-modules.toml`
    ///
    /// An explicit path must exist; the default location may be absent, in
    /// which case defaults apply.
    pub fn load() -> anyhow::Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(PathBuf::from(path));
        }

        match dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE)) {
            Some(path) if path.exists() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn cache_expiry(&self) -> anyhow::Result<chrono::Duration> {
        chrono::Duration::try_hours(self.cache_expiry_hours).with_context(|| {
            format!("cache_expiry_hours out of range: {}", self.cache_expiry_hours)
        })
    }

    pub fn resolved_cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| app_cache_dir().join("http"))
    }

    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| app_cache_dir().join("logs"))
    }

    pub fn resolved_module_dir(&self) -> anyhow::Result<PathBuf> {
        self.module_dir
            .clone()
            .or_else(default_module_dir)
            .context("Unable to determine the Gpredict configuration directory")
    }
}

fn app_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}
