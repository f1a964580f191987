//! Configuration system for scribe.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ScribeError, ScribeResult};
use crate::fanout::BatchPolicy;
use crate::types::{EngineConfig, DEFAULT_ENGINE_CONFIG};

/// Main scribe configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScribeConfig {
    /// Language used when a call does not name one.
    pub default_language: String,
    /// Engine configuration used when a call does not give one.
    pub default_engine_config: String,
    /// Timeout for fetching image URLs, in seconds.
    pub image_fetch_timeout_secs: u64,
    /// Timeout for fetching PDF URLs, in seconds.
    pub pdf_fetch_timeout_secs: u64,
    /// Failure policy for batch OCR.
    pub batch_policy: BatchPolicy,
    /// Maximum units in flight per batch or document (unbounded if unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,
    /// Rendering resolution for PDF pages.
    pub pdf_dpi: u32,
    /// Directory containing the tesseract binary, if not on PATH.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tesseract_path: Option<PathBuf>,
}

impl Default for ScribeConfig {
    fn default() -> Self {
        Self {
            default_language: "eng".to_string(),
            default_engine_config: DEFAULT_ENGINE_CONFIG.to_string(),
            image_fetch_timeout_secs: 30,
            pdf_fetch_timeout_secs: 60,
            batch_policy: BatchPolicy::BestEffort,
            max_concurrency: None,
            pdf_dpi: 300,
            tesseract_path: None,
        }
    }
}

impl ScribeConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> ScribeResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| ScribeError::Configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| ScribeError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| ScribeError::Configuration(e.to_string())),
            _ => Err(ScribeError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Default configuration overlaid with environment variables.
    pub fn from_env() -> ScribeResult<Self> {
        Self::default().with_env_overrides()
    }

    /// Overlay `SCRIBE_*` environment variables onto this configuration.
    pub fn with_env_overrides(self) -> ScribeResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary lookup, keyed by environment variable name.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ScribeResult<Self> {
        if let Some(language) = lookup("SCRIBE_DEFAULT_LANGUAGE") {
            self.default_language = language;
        }
        if let Some(engine) = lookup("SCRIBE_ENGINE_CONFIG") {
            self.default_engine_config = engine;
        }
        if let Some(secs) = lookup("SCRIBE_IMAGE_FETCH_TIMEOUT") {
            self.image_fetch_timeout_secs = parse_number("SCRIBE_IMAGE_FETCH_TIMEOUT", &secs)?;
        }
        if let Some(secs) = lookup("SCRIBE_PDF_FETCH_TIMEOUT") {
            self.pdf_fetch_timeout_secs = parse_number("SCRIBE_PDF_FETCH_TIMEOUT", &secs)?;
        }
        if let Some(policy) = lookup("SCRIBE_BATCH_POLICY") {
            self.batch_policy = policy.to_lowercase().parse().map_err(|_| {
                ScribeError::Configuration(format!(
                    "SCRIBE_BATCH_POLICY must be 'best_effort' or 'fail_fast', got '{}'",
                    policy
                ))
            })?;
        }
        if let Some(limit) = lookup("SCRIBE_MAX_CONCURRENCY") {
            self.max_concurrency = Some(parse_number("SCRIBE_MAX_CONCURRENCY", &limit)?);
        }
        if let Some(dpi) = lookup("SCRIBE_PDF_DPI") {
            self.pdf_dpi = parse_number("SCRIBE_PDF_DPI", &dpi)?;
        }
        if let Some(path) = lookup("SCRIBE_TESSERACT_PATH") {
            self.tesseract_path = Some(PathBuf::from(path));
        }
        Ok(self)
    }

    /// Default location of the config file (`<config_dir>/scribe/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("scribe").join("config.toml"))
    }

    /// Load configuration the way the server does.
    ///
    /// Reads `.env`, then the file named by `SCRIBE_CONFIG` (or the default
    /// path if it exists), then applies environment overrides, then validates.
    pub fn load() -> ScribeResult<Self> {
        let _ = dotenvy::dotenv();

        let file = std::env::var("SCRIBE_CONFIG")
            .ok()
            .map(PathBuf::from)
            .or_else(|| Self::default_path().filter(|p| p.exists()));

        let base = match file {
            Some(path) => {
                tracing::info!("Loading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        let config = base.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that would otherwise fail at request time.
    pub fn validate(&self) -> ScribeResult<()> {
        if self.default_language.trim().is_empty() {
            return Err(ScribeError::Configuration(
                "default_language must not be empty".to_string(),
            ));
        }
        if self.image_fetch_timeout_secs == 0 || self.pdf_fetch_timeout_secs == 0 {
            return Err(ScribeError::Configuration(
                "fetch timeouts must be greater than zero".to_string(),
            ));
        }
        if self.max_concurrency == Some(0) {
            return Err(ScribeError::Configuration(
                "max_concurrency must be greater than zero".to_string(),
            ));
        }
        if self.pdf_dpi == 0 {
            return Err(ScribeError::Configuration(
                "pdf_dpi must be greater than zero".to_string(),
            ));
        }
        EngineConfig::parse(&self.default_engine_config)
            .map_err(|e| ScribeError::Configuration(e.to_string()))?;
        Ok(())
    }

    pub fn image_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.image_fetch_timeout_secs)
    }

    pub fn pdf_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.pdf_fetch_timeout_secs)
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> ScribeConfigBuilder {
        ScribeConfigBuilder::default()
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> ScribeResult<T> {
    value.trim().parse().map_err(|_| {
        ScribeError::Configuration(format!("{} must be a number, got '{}'", key, value))
    })
}

/// Builder for ScribeConfig.
#[derive(Default)]
pub struct ScribeConfigBuilder {
    config: ScribeConfig,
}

impl ScribeConfigBuilder {
    /// Set the default language.
    pub fn default_language(mut self, language: impl Into<String>) -> Self {
        self.config.default_language = language.into();
        self
    }

    /// Set the default engine configuration string.
    pub fn default_engine_config(mut self, config: impl Into<String>) -> Self {
        self.config.default_engine_config = config.into();
        self
    }

    /// Set the image URL fetch timeout.
    pub fn image_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config.image_fetch_timeout_secs = timeout.as_secs();
        self
    }

    /// Set the PDF URL fetch timeout.
    pub fn pdf_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config.pdf_fetch_timeout_secs = timeout.as_secs();
        self
    }

    /// Set the batch failure policy.
    pub fn batch_policy(mut self, policy: BatchPolicy) -> Self {
        self.config.batch_policy = policy;
        self
    }

    /// Cap concurrent units.
    pub fn max_concurrency(mut self, limit: usize) -> Self {
        self.config.max_concurrency = Some(limit);
        self
    }

    /// Set the PDF rendering resolution.
    pub fn pdf_dpi(mut self, dpi: u32) -> Self {
        self.config.pdf_dpi = dpi;
        self
    }

    /// Set the directory containing the tesseract binary.
    pub fn tesseract_path(mut self, path: PathBuf) -> Self {
        self.config.tesseract_path = Some(path);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ScribeConfig {
        self.config
    }
}
