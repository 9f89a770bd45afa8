//! PlannerDay configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::envfile::{DEFAULT_ENV_PATH, DEFAULT_TEMPLATE, EnvFileError, EnvTemplate};

/// Main PlannerDay configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Environment file scaffolding
    pub env: EnvConfig,

    /// Container tool delegation
    pub compose: ComposeConfig,

    /// Weather service
    pub weather: WeatherConfig,

    /// IP geolocation service
    pub geo: GeoConfig,

    /// Planner agent behaviour
    pub agent: AgentConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .plannerday.yml
        let local_config = PathBuf::from(".plannerday.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/plannerday/plannerday.yml
        if let Some(user_config) = user_config_path()
            && user_config.exists()
        {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log level, before logging is set up
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load_quiet(config_path).and_then(|c| c.log_level)
    }

    /// First config file in the load chain, without logging or errors
    ///
    /// Errors are swallowed here; the full `load` reports them once logging works.
    pub fn load_quiet(config_path: Option<&PathBuf>) -> Option<Self> {
        let candidates = match config_path {
            Some(path) => vec![path.clone()],
            None => std::iter::once(PathBuf::from(".plannerday.yml"))
                .chain(user_config_path())
                .collect(),
        };

        candidates
            .into_iter()
            .find(|p| p.exists())
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|content| serde_yaml::from_str(&content).ok())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("plannerday").join("plannerday.yml"))
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "openai" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com".to_string(),
            max_tokens: 1024,
            timeout_ms: 60_000,
        }
    }
}

/// Environment file scaffolding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Where the environment file lives
    pub path: PathBuf,

    /// `KEY=VALUE` lines written into a fresh file
    pub template: Vec<String>,
}

impl EnvConfig {
    /// Validated template for this configuration
    pub fn template(&self) -> Result<EnvTemplate, EnvFileError> {
        EnvTemplate::new(self.path.clone(), self.template.clone())
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_ENV_PATH),
            template: DEFAULT_TEMPLATE.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// Container tool delegation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    /// Container CLI (`docker compose ...`)
    pub program: String,

    /// Compose file passed with `-f`
    pub file: Option<PathBuf>,

    /// Project name passed with `-p`
    #[serde(rename = "project-name")]
    pub project_name: Option<String>,

    /// Application service name
    pub service: String,

    /// Shell started by `pd shell`
    pub shell: String,

    /// Command run inside the container by `pd test`
    #[serde(rename = "test-command")]
    pub test_command: Vec<String>,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            program: "docker".to_string(),
            file: None,
            project_name: None,
            service: "plannerday-agent".to_string(),
            shell: "/bin/bash".to_string(),
            test_command: vec!["cargo".to_string(), "test".to_string()],
        }
    }
}

/// Weather service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Environment variable (or `.env` key) holding the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Unit system requested from the API
    pub units: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key_env: "WEATHER_API_KEY".to_string(),
            base_url: "https://api.tomorrow.io".to_string(),
            units: "metric".to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// IP geolocation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    /// Environment variable (or `.env` key) holding the optional API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GEO_API_KEY".to_string(),
            base_url: "https://ipapi.co".to_string(),
        }
    }
}

/// Planner agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// System instructions (Handlebars template, `{{today}}` available)
    pub instructions: String,

    /// Default user prompt for `pd plan`
    pub prompt: String,

    /// How many failed calls each tool may have before the run is aborted
    pub retries: u32,

    /// Upper bound on LLM round-trips per run
    #[serde(rename = "max-iterations")]
    pub max_iterations: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            instructions: crate::planner::DEFAULT_INSTRUCTIONS.to_string(),
            prompt: crate::planner::DEFAULT_PROMPT.to_string(),
            retries: 2,
            max_iterations: 10,
        }
    }
}
