//! Layered configuration.
//!
//! Settings are merged from, in increasing priority:
//!
//! 1. Built-in defaults ([`Config::default()`]).
//! 2. One config file: the path given on the command line, or else the first
//!    of `config.toml`, `config.yaml`, `config.yml` or `config.json` found in
//!    the platform config directory.
//! 3. `BEZGLUTENA_*` environment variables, with `__` separating nested keys
//!    (`BEZGLUTENA_DATASET__URL`, `BEZGLUTENA_SCANNER__SCAN_BOX__WIDTH`).

pub mod error;

use crate::error::{ErrorKind, Result};
use bezglutena_catalog::EanPolicy;
use bezglutena_scanner::Constraints;
use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "BEZGLUTENA_";
const CONFIG_FILE_NAMES: [&str; 4] = ["config.toml", "config.yaml", "config.yml", "config.json"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetConfig,
    /// Where preferences are kept. Defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,
    pub scanner: Constraints,
    pub scrape: ScrapeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub url: String,
    /// Local dataset file; takes precedence over `url` when set.
    pub path: Option<PathBuf>,
    pub ean_policy: EanPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Pause between product pages, in milliseconds.
    pub delay_ms: u64,
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            data_dir: None,
            scanner: Constraints::default(),
            scrape: ScrapeConfig::default(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            url: bezglutena_source::DEFAULT_DATASET_URL.to_string(),
            path: None,
            ean_policy: EanPolicy::default(),
        }
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: bezglutena_scrape::DEFAULT_BASE_URL.to_string(),
            user_agent: bezglutena_scrape::DEFAULT_USER_AGENT.to_string(),
            delay_ms: 250,
            output: PathBuf::from("gluten_free_products.jsonl"),
        }
    }
}

impl DatasetConfig {
    /// The dataset location to hand to a source: the local path if one is
    /// configured, the URL otherwise.
    pub fn location(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => self.url.clone(),
        }
    }
}

impl Config {
    /// Load configuration from all layers.
    ///
    /// An explicit `file` must exist. Without one, the platform config
    /// directory is searched and a missing file is fine.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let file = match file {
            Some(file) => Some(file.to_path_buf()),
            None => self::discover(),
        };
        Self::from_sources(file.as_deref())
    }

    /// Defaults, then `file` (if any), then the environment.
    pub fn from_sources(file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(file) = file {
            figment = figment.merge(self::file_provider(file)?);
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        let config: Config = figment.extract().map_err(|err| ErrorKind::Extract(err.to_string()))?;
        config.validate()?;
        tracing::debug!(file = ?file, dataset = %config.dataset.location(), "Loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dataset.path.is_none() && self.dataset.url.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("dataset.url must not be empty".to_string()));
        }
        if let Some(path) = &self.dataset.path
            && path.as_os_str().is_empty()
        {
            exn::bail!(ErrorKind::Invalid("dataset.path must not be empty".to_string()));
        }
        if self.scrape.base_url.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("scrape.base_url must not be empty".to_string()));
        }
        if let Err(err) = self.scanner.validate() {
            exn::bail!(ErrorKind::Invalid(format!("scanner: {}", &*err)));
        }
        Ok(())
    }
}

/// Platform config directory, e.g. `~/.config/bezglutena` on Linux.
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("hr", "bezglutena", "bezglutena").map(|dirs| dirs.config_dir().to_path_buf())
}

fn discover() -> Option<PathBuf> {
    let dir = self::config_dir()?;
    CONFIG_FILE_NAMES.iter().map(|name| dir.join(name)).find(|path| path.is_file())
}

fn file_provider(file: &Path) -> Result<Figment> {
    if !file.is_file() {
        exn::bail!(ErrorKind::NotFound(file.to_path_buf()));
    }
    let extension = file.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
    Ok(match extension.as_deref() {
        Some("toml") => Figment::from(Toml::file_exact(file)),
        Some("yaml" | "yml") => Figment::from(Yaml::file_exact(file)),
        Some("json") => Figment::from(Json::file_exact(file)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(file.to_path_buf())),
    })
}
