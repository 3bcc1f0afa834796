//! Configuration loader for the tutor.
//!
//! Reads `tutor.toml` from the data directory (`~/.smart-teacher/` by
//! default) and deserializes it into [`AppConfig`]. Falls back to defaults
//! when the file is missing or malformed.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use tutor_core::tutor::orchestrator::TutorTemplates;
use tutor_core::tutor::prompts::{HINT_PROMPT, OCR_ANALYSIS_PROMPT, SOCRATIC_TEACHER_PROMPT};
use tutor_types::config::{AppConfig, GatewaySettings, TutorSettings};
use tutor_types::error::TutorError;

/// Config file name inside the data directory.
pub const CONFIG_FILE: &str = "tutor.toml";

/// Resolve the data directory.
///
/// Uses `TUTOR_DATA_DIR` if set, otherwise `~/.smart-teacher`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TUTOR_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".smart-teacher");
    }

    PathBuf::from(".smart-teacher")
}

/// Load configuration from `{data_dir}/tutor.toml`.
///
/// - Missing file: [`AppConfig::default()`] (offline gateway).
/// - Unreadable or unparsable file: warning, then defaults.
/// - Out-of-range `[tutor]` values: warning, then `[tutor]` defaults.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No {CONFIG_FILE} found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(mut config) => {
            if let Err(err) = config.tutor.validate() {
                tracing::warn!(
                    "Invalid [tutor] section in {}: {err}, using [tutor] defaults",
                    config_path.display()
                );
                config.tutor = TutorSettings::default();
            }
            config
        }
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Read the gateway API key from the environment variable named in config.
///
/// Blank values count as unset.
pub fn resolve_api_key(settings: &GatewaySettings) -> Option<SecretString> {
    std::env::var(&settings.api_key_env)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .map(SecretString::from)
}

/// Load the prompt templates, honoring file overrides from `[tutor]`.
///
/// Relative override paths resolve against `data_dir`. Unlike the config
/// file itself, a named template that cannot be read or parsed is an error.
pub async fn load_templates(
    settings: &TutorSettings,
    data_dir: &Path,
) -> Result<TutorTemplates, TutorError> {
    let chat = read_template(settings.chat_template_path.as_deref(), data_dir).await?;
    let hint = read_template(settings.hint_template_path.as_deref(), data_dir).await?;

    TutorTemplates::from_sources(
        chat.as_deref().unwrap_or(SOCRATIC_TEACHER_PROMPT),
        hint.as_deref().unwrap_or(HINT_PROMPT),
        OCR_ANALYSIS_PROMPT,
    )
}

async fn read_template(path: Option<&str>, data_dir: &Path) -> Result<Option<String>, TutorError> {
    let Some(path) = path else {
        return Ok(None);
    };

    let path = Path::new(path);
    let full = if path.is_absolute() {
        path.to_path_buf()
    } else {
        data_dir.join(path)
    };

    let content = tokio::fs::read_to_string(&full).await.map_err(|e| {
        TutorError::Configuration(format!("failed to read template {}: {e}", full.display()))
    })?;
    tracing::debug!("Loaded prompt template override from {}", full.display());
    Ok(Some(content))
}
