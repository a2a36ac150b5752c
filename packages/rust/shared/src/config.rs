//! Application configuration for SupportDesk.
//!
//! User config lives at `~/.supportdesk/supportdesk.toml`.
//! Every section is optional; missing keys fall back to defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SupportDeskError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "supportdesk.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".supportdesk";

// ---------------------------------------------------------------------------
// Config structs (matching supportdesk.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Language model provider settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Vector search service settings.
    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    /// Query pipeline settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Contact details surfaced by the static responders.
    #[serde(default)]
    pub support: SupportContacts,
}

/// `[llm]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_llm_api_key_env")]
    pub api_key_env: String,

    /// OpenAI-compatible API base URL.
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Model used for every pipeline stage.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default)]
    pub temperature: f32,

    /// HTTP timeout for a single completion request.
    #[serde(default = "default_llm_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_llm_api_key_env(),
            base_url: default_llm_base_url(),
            model: default_model(),
            temperature: 0.0,
            request_timeout_secs: default_llm_timeout(),
        }
    }
}

fn default_llm_api_key_env() -> String {
    "OPENROUTER_API_KEY".into()
}
fn default_llm_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}
fn default_model() -> String {
    "openai/gpt-4o-mini".into()
}
fn default_llm_timeout() -> u64 {
    60
}

/// `[vector_store]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// Base URL of the vector search service.
    #[serde(default = "default_vector_endpoint")]
    pub endpoint: String,

    /// Collection holding the support documentation.
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Optional env var holding a bearer token for the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// HTTP timeout for a single search request.
    #[serde(default = "default_vector_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: default_vector_endpoint(),
            collection: default_collection(),
            api_key_env: None,
            request_timeout_secs: default_vector_timeout(),
        }
    }
}

fn default_vector_endpoint() -> String {
    "http://localhost:6333".into()
}
fn default_collection() -> String {
    "support-docs".into()
}
fn default_vector_timeout() -> u64 {
    30
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Deadline applied to each remote call made by the pipeline.
    #[serde(default = "default_stage_timeout")]
    pub stage_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stage_timeout_secs: default_stage_timeout(),
        }
    }
}

impl PipelineConfig {
    /// The per-call deadline as a [`Duration`].
    pub fn stage_timeout(&self) -> Duration {
        Duration::from_secs(self.stage_timeout_secs)
    }
}

fn default_stage_timeout() -> u64 {
    45
}

/// `[support]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportContacts {
    #[serde(default = "default_support_email")]
    pub email: String,
    #[serde(default = "default_support_phone")]
    pub phone: String,
    #[serde(default = "default_support_hours")]
    pub support_hours: String,
    #[serde(default = "default_billing_email")]
    pub billing_email: String,
    #[serde(default = "default_billing_phone")]
    pub billing_phone: String,
    #[serde(default = "default_billing_hours")]
    pub billing_hours: String,
}

impl Default for SupportContacts {
    fn default() -> Self {
        Self {
            email: default_support_email(),
            phone: default_support_phone(),
            support_hours: default_support_hours(),
            billing_email: default_billing_email(),
            billing_phone: default_billing_phone(),
            billing_hours: default_billing_hours(),
        }
    }
}

fn default_support_email() -> String {
    "support@example.com".into()
}
fn default_support_phone() -> String {
    "+1-800-555-0100".into()
}
fn default_support_hours() -> String {
    "Monday-Friday, 9:00-18:00 UTC".into()
}
fn default_billing_email() -> String {
    "billing@example.com".into()
}
fn default_billing_phone() -> String {
    "+1-800-555-0199".into()
}
fn default_billing_hours() -> String {
    "Monday-Friday, 9:00-17:00 UTC".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.supportdesk/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SupportDeskError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.supportdesk/supportdesk.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SupportDeskError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        SupportDeskError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    validate_endpoints(&config)?;
    validate_timeouts(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SupportDeskError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SupportDeskError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SupportDeskError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check that both service URLs parse as absolute http(s) URLs.
pub fn validate_endpoints(config: &AppConfig) -> Result<()> {
    for (key, raw) in [
        ("llm.base_url", &config.llm.base_url),
        ("vector_store.endpoint", &config.vector_store.endpoint),
    ] {
        let url = Url::parse(raw)
            .map_err(|e| SupportDeskError::config(format!("{key} '{raw}' is not a URL: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SupportDeskError::config(format!(
                "{key} '{raw}' must use http or https"
            )));
        }
    }
    Ok(())
}

/// Reject zero timeouts, which would fail every remote call.
pub fn validate_timeouts(config: &AppConfig) -> Result<()> {
    for (key, secs) in [
        ("llm.request_timeout_secs", config.llm.request_timeout_secs),
        (
            "vector_store.request_timeout_secs",
            config.vector_store.request_timeout_secs,
        ),
        ("pipeline.stage_timeout_secs", config.pipeline.stage_timeout_secs),
    ] {
        if secs == 0 {
            return Err(SupportDeskError::validation(format!(
                "{key} must be at least 1 second"
            )));
        }
    }
    Ok(())
}

/// Resolve the LLM API key from the configured env var.
pub fn validate_api_key(config: &AppConfig) -> Result<String> {
    let var_name = &config.llm.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(SupportDeskError::config(format!(
            "LLM API key not found. Set the {var_name} environment variable."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("stage_timeout_secs"));
        assert!(toml_str.contains("OPENROUTER_API_KEY"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[llm]
model = "anthropic/claude-3.5-haiku"

[support]
email = "help@acme.test"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.llm.model, "anthropic/claude-3.5-haiku");
        assert_eq!(config.llm.api_key_env, "OPENROUTER_API_KEY");
        assert_eq!(config.support.email, "help@acme.test");
        assert_eq!(config.support.billing_email, "billing@example.com");
        assert_eq!(config.pipeline.stage_timeout(), Duration::from_secs(45));
        assert_eq!(config.vector_store.collection, "support-docs");
    }

    #[test]
    fn endpoints_must_be_http_urls() {
        let mut config = AppConfig::default();
        assert!(validate_endpoints(&config).is_ok());

        config.vector_store.endpoint = "not a url".into();
        let err = validate_endpoints(&config).unwrap_err();
        assert!(err.to_string().contains("vector_store.endpoint"));

        config.vector_store.endpoint = "ftp://files.example.com".into();
        assert!(validate_endpoints(&config).is_err());
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        let mut config = AppConfig::default();
        assert!(validate_timeouts(&config).is_ok());

        config.pipeline.stage_timeout_secs = 0;
        let err = validate_timeouts(&config).unwrap_err();
        assert!(matches!(err, SupportDeskError::Validation { .. }));
        assert!(err.to_string().contains("pipeline.stage_timeout_secs"));
    }

    #[test]
    fn load_rejects_zero_stage_timeout() {
        let path = std::env::temp_dir().join(format!(
            "sd_zero_timeout_{}.toml",
            uuid::Uuid::now_v7()
        ));
        std::fs::write(&path, "[pipeline]\nstage_timeout_secs = 0\n").unwrap();
        let result = load_config_from(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.unwrap_err().to_string().contains("stage_timeout_secs"));
    }

    #[test]
    fn api_key_validation() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.llm.api_key_env = "SD_TEST_NONEXISTENT_KEY_12345".into();
        let result = validate_api_key(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key not found"));
    }
}
