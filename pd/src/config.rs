//! Plain Digital configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::llm::LlmError;
use crate::workflow::WorkflowVariant;

/// Main Plain Digital configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Workshop flow configuration
    pub workshop: WorkshopConfig,

    /// Click tracking configuration
    pub tracking: TrackingConfig,

    /// Local storage configuration
    pub storage: StorageConfig,

    /// Booking funnel configuration
    pub booking: BookingConfig,

    /// Directory with prompt template overrides
    #[serde(rename = "prompts-dir")]
    pub prompts_dir: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before any AI command runs
    ///
    /// Checks that the API key environment variable is set.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .plaindigital.yml
        let local_config = PathBuf::from(".plaindigital.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/plaindigital/plaindigital.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("plaindigital").join("plaindigital.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load_early(config_path).and_then(|c| c.log_level)
    }

    /// Name of the API key variable, before the CLI is parsed
    pub fn load_api_key_env(config_path: Option<&PathBuf>) -> String {
        Self::load_early(config_path).map_or_else(|| LlmConfig::default().api_key_env, |c| c.llm.api_key_env)
    }

    /// Best-effort load from the first existing candidate file
    ///
    /// Errors are swallowed: a broken config file is reported later by `load`.
    fn load_early(config_path: Option<&PathBuf>) -> Option<Self> {
        let candidates = [
            config_path.cloned(),
            Some(PathBuf::from(".plaindigital.yml")),
            dirs::config_dir().map(|d| d.join("plaindigital").join("plaindigital.yml")),
        ];

        candidates
            .into_iter()
            .flatten()
            .find(|p| p.exists())
            .and_then(|p| Self::load_from_file(p).ok())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "gemini" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum output tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Transport timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            max_tokens: 8192,
            timeout_ms: 60_000,
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Result<String, LlmError> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey(self.api_key_env.clone()))
    }
}

/// Workshop flow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkshopConfig {
    /// Which workshop flow `pd workshop` runs (guided or concept)
    pub variant: WorkflowVariant,

    /// Upper bound on clarifying questions
    #[serde(rename = "max-questions")]
    pub max_questions: usize,

    /// Upper bound on plan steps requested from the model
    #[serde(rename = "max-steps")]
    pub max_steps: usize,
}

impl Default for WorkshopConfig {
    fn default() -> Self {
        Self {
            variant: WorkflowVariant::Guided,
            max_questions: 4,
            max_steps: 5,
        }
    }
}

/// Click tracking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Record clicks at all
    pub enabled: bool,

    /// Number of entries kept in the click log
    #[serde(rename = "max-entries")]
    pub max_entries: usize,

    /// Maximum characters kept from a click label
    #[serde(rename = "label-max-chars")]
    pub label_max_chars: usize,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 100,
            label_max_chars: 50,
        }
    }
}

/// Local storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for the key-value store and logs
    #[serde(rename = "data-dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        // Use XDG data directory (~/.local/share/plaindigital on Linux)
        let data_dir = dirs::data_local_dir()
            .map(|d| d.join("plaindigital"))
            .unwrap_or_else(|| PathBuf::from(".plaindigital"));

        Self { data_dir }
    }
}

/// Booking funnel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Address that receives engagement requests
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            contact_email: "corigrigor@gmail.com".to_string(),
        }
    }
}
