//! Configuration types for the store assistant

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{HyrumError, Result};
use crate::llm::providers::mistral::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::llm::{RetryConfig, SamplingParams};

/// Default configuration file, looked up in the working directory
pub const CONFIG_FILE: &str = "hyrum.toml";

/// Default knowledge file
pub const DEFAULT_KNOWLEDGE_PATH: &str = "database/termos_loja.json";

/// Provider credential variable
pub const API_KEY_ENV: &str = "MISTRALAI_API_KEY";

/// Provider model variable
pub const MODEL_ENV: &str = "MISTRALAI_MODEL";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HyrumConfig {
    /// Knowledge base location
    pub knowledge: KnowledgeConfig,

    /// Remote completion settings
    pub llm: LlmSettings,

    /// Session behaviour
    pub session: SessionConfig,
}

/// Knowledge base configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Path of the topic → record JSON file
    pub path: PathBuf,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_KNOWLEDGE_PATH),
        }
    }
}

/// Remote completion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model identifier (required)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// API key (required, prefer env vars)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// API root
    pub base_url: String,

    /// Bounded wait for a single completion call
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Fixed sampling parameters for the session
    pub sampling: SamplingParams,

    /// Retry policy for transient failures
    pub retry: RetryConfig,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: None,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            sampling: SamplingParams::default(),
            retry: RetryConfig::default(),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// System prompt added at startup; the binary supplies the store persona
    /// when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl HyrumConfig {
    /// Load configuration from file and environment variables.
    ///
    /// Loads in this order:
    /// 1. Default configuration
    /// 2. Configuration file (`hyrum.toml`, or `path` when given)
    /// 3. `HYRUM_`-prefixed environment variables (`__` separates levels)
    /// 4. `MISTRALAI_API_KEY` / `MISTRALAI_MODEL`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is invalid, if an explicit
    /// `path` does not exist, or if a value is out of range. Only the default
    /// `hyrum.toml` may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(missing) = path.filter(|p| !p.is_file()) {
            return Err(HyrumError::Configuration(format!(
                "configuration file {} not found",
                missing.display()
            )));
        }

        Self::from_figment(Self::figment(path))
    }

    /// The layered figment used by [`HyrumConfig::load`].
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        Figment::from(Serialized::defaults(HyrumConfig::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("HYRUM_").split("__"))
            .merge(Env::raw().only(&[API_KEY_ENV, MODEL_ENV]).map(|key| {
                if key.as_str().eq_ignore_ascii_case(API_KEY_ENV) {
                    "llm.api_key".into()
                } else {
                    "llm.model".into()
                }
            }))
    }

    /// Extract and validate a configuration from any figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: HyrumConfig = figment.extract().map_err(|e| {
            HyrumError::Configuration(format!("Failed to load configuration: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate value ranges.
    ///
    /// Credentials are checked when the provider is built, so a config without
    /// them is still valid here.
    pub fn validate(&self) -> Result<()> {
        let sampling = &self.llm.sampling;

        if sampling.max_tokens == 0 {
            return Err(HyrumError::Configuration(
                "llm.sampling.max_tokens must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&sampling.temperature) {
            return Err(HyrumError::Configuration(format!(
                "llm.sampling.temperature must be within [0, 2], got {}",
                sampling.temperature
            )));
        }
        if !(sampling.top_p > 0.0 && sampling.top_p <= 1.0) {
            return Err(HyrumError::Configuration(format!(
                "llm.sampling.top_p must be within (0, 1], got {}",
                sampling.top_p
            )));
        }
        if self.llm.request_timeout.is_zero() {
            return Err(HyrumError::Configuration(
                "llm.request_timeout must be greater than zero".to_string(),
            ));
        }
        if self.llm.retry.max_attempts == 0 {
            return Err(HyrumError::Configuration(
                "llm.retry.max_attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn with_toml(toml: &str) -> Figment {
        Figment::from(Serialized::defaults(HyrumConfig::default())).merge(Toml::string(toml))
    }

    #[test]
    fn test_defaults() {
        let config = HyrumConfig::from_figment(with_toml("")).unwrap();
        assert_eq!(config.knowledge.path, PathBuf::from(DEFAULT_KNOWLEDGE_PATH));
        assert_eq!(config.llm.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.llm.request_timeout, Duration::from_secs(60));
        assert_eq!(config.llm.sampling, SamplingParams::default());
        assert!(config.llm.model.is_none());
        assert!(config.session.system_prompt.is_none());
    }

    #[test]
    fn test_toml_overrides() {
        let config = HyrumConfig::from_figment(with_toml(
            r#"
            [knowledge]
            path = "kb.json"

            [llm]
            model = "mistral-small-latest"
            request_timeout = "15s"

            [llm.sampling]
            max_tokens = 400
            temperature = 0.2
            top_p = 1.0

            [llm.retry]
            max_attempts = 1
            initial_delay = "100ms"
            "#,
        ))
        .unwrap();

        assert_eq!(config.knowledge.path, PathBuf::from("kb.json"));
        assert_eq!(config.llm.model.as_deref(), Some("mistral-small-latest"));
        assert_eq!(config.llm.request_timeout, Duration::from_secs(15));
        assert_eq!(config.llm.sampling.max_tokens, 400);
        assert_eq!(config.llm.retry.max_attempts, 1);
        assert_eq!(config.llm.retry.initial_delay, Duration::from_millis(100));
        // untouched retry fields keep their defaults
        assert_eq!(
            config.llm.retry.retry_on_status,
            RetryConfig::default().retry_on_status
        );
    }

    #[test]
    fn test_invalid_sampling_rejected() {
        let err = HyrumConfig::from_figment(with_toml("[llm.sampling]\ntop_p = 0.0"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("top_p"));

        assert!(
            HyrumConfig::from_figment(with_toml("[llm.sampling]\ntemperature = 3.5")).is_err()
        );
        assert!(HyrumConfig::from_figment(with_toml("[llm.sampling]\nmax_tokens = 0")).is_err());
    }

    #[test]
    fn test_malformed_toml_is_configuration_error() {
        let err = HyrumConfig::from_figment(with_toml("[llm\nmodel = ")).err().unwrap();
        assert!(matches!(err, HyrumError::Configuration(_)));
    }

    #[test]
    fn test_layered_load_from_file_and_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "hyrum.toml",
                r#"
                [llm]
                model = "from-file"

                [llm.sampling]
                temperature = 0.3
                "#,
            )?;
            jail.set_env("MISTRALAI_API_KEY", "secret");
            jail.set_env("HYRUM_LLM__SAMPLING__MAX_TOKENS", "120");

            let config = HyrumConfig::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.llm.model.as_deref(), Some("from-file"));
            assert_eq!(config.llm.api_key.as_deref(), Some("secret"));
            assert_eq!(config.llm.sampling.temperature, 0.3);
            assert_eq!(config.llm.sampling.max_tokens, 120);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        Jail::expect_with(|_| {
            let err = HyrumConfig::load(Some(Path::new("absent.toml")))
                .err()
                .unwrap();
            assert!(matches!(err, HyrumError::Configuration(_)));
            assert!(err.to_string().contains("absent.toml"));

            // the default file is optional
            assert!(HyrumConfig::load(None).is_ok());
            Ok(())
        });
    }

    #[test]
    fn test_model_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[llm]\nmodel = \"from-file\"")?;
            jail.set_env("MISTRALAI_MODEL", "open-mistral-nemo");

            let config =
                HyrumConfig::load(Some(Path::new("custom.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.llm.model.as_deref(), Some("open-mistral-nemo"));
            Ok(())
        });
    }
}
