//! Model configuration loading and validation.
//!
//! Reads `config/models.yaml` and resolves environment variables. When no
//! file is found the built-in DeepSeek preset is used.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::errors::InferenceError;

/// Relative location of the models file under the project root.
const CONFIG_RELATIVE_PATH: &str = "config/models.yaml";

/// Env var pointing at the project root, checked before walking upward.
const PROJECT_ROOT_ENV: &str = "COURSE_RAG_PROJECT_ROOT";

const DEFAULT_MODEL_KEY: &str = "deepseek-chat";

// ─── Public Types ────────────────────────────────────────────────────────────

/// A single model endpoint's configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelConfig {
    pub display_name: String,
    /// Model id sent in the request body. Defaults to the config key.
    #[serde(default)]
    pub model_name: Option<String>,
    pub base_url: String,
    /// Bearer token. Empty or absent means no `Authorization` header.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Total request timeout. Falls back to the client default.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_temperature() -> f32 {
    0.0
}
fn default_max_tokens() -> u32 {
    800
}

impl ModelConfig {
    /// The DeepSeek chat endpoint, keyed by `DEEPSEEK_API_KEY`.
    pub fn deepseek() -> Self {
        Self {
            display_name: "DeepSeek Chat".to_string(),
            model_name: Some(DEFAULT_MODEL_KEY.to_string()),
            base_url: "https://api.deepseek.com".to_string(),
            api_key: std::env::var("DEEPSEEK_API_KEY").ok(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: None,
        }
    }
}

/// Top-level model registry (mirrors `config/models.yaml`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelsConfig {
    pub active_model: String,
    pub models: HashMap<String, ModelConfig>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        let mut models = HashMap::new();
        models.insert(DEFAULT_MODEL_KEY.to_string(), ModelConfig::deepseek());
        Self {
            active_model: DEFAULT_MODEL_KEY.to_string(),
            models,
        }
    }
}

// ─── Loading ─────────────────────────────────────────────────────────────────

/// Resolve the config path relative to the project root.
///
/// Checks `COURSE_RAG_PROJECT_ROOT` first, then searches upward from `start`
/// for `config/models.yaml`.
pub fn find_config_path(start: &Path) -> Result<PathBuf, InferenceError> {
    if let Ok(root) = std::env::var(PROJECT_ROOT_ENV) {
        let candidate = PathBuf::from(&root).join(CONFIG_RELATIVE_PATH);
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_RELATIVE_PATH);
        if candidate.exists() {
            return Ok(candidate);
        }
        if !dir.pop() {
            break;
        }
    }

    Err(InferenceError::ConfigError {
        reason: format!("could not find {CONFIG_RELATIVE_PATH}"),
    })
}

/// Load and parse the models configuration file.
///
/// Performs environment-variable interpolation on string values matching
/// `${VAR_NAME}` or `${VAR_NAME:-default}`.
pub fn load_models_config(path: &Path) -> Result<ModelsConfig, InferenceError> {
    let raw = std::fs::read_to_string(path).map_err(|e| InferenceError::ConfigError {
        reason: format!("failed to read {}: {e}", path.display()),
    })?;

    parse_models_config(&raw)
}

/// Parse a models configuration from YAML text.
pub fn parse_models_config(raw: &str) -> Result<ModelsConfig, InferenceError> {
    let interpolated = interpolate_env_vars(raw);

    serde_yaml::from_str(&interpolated).map_err(|e| InferenceError::ConfigError {
        reason: format!("failed to parse config: {e}"),
    })
}

/// Load the config found from `start`, or the built-in preset if none exists.
///
/// A file that exists but fails to parse is still an error.
pub fn load_or_default(start: &Path) -> Result<ModelsConfig, InferenceError> {
    match find_config_path(start) {
        Ok(path) => {
            tracing::info!(path = %path.display(), "loading model config");
            load_models_config(&path)
        }
        Err(_) => {
            tracing::info!("no model config file found, using DeepSeek defaults");
            Ok(ModelsConfig::default())
        }
    }
}

/// Resolve the active model configuration.
///
/// Returns `(model_key, ModelConfig)`.
pub fn resolve_active_model(
    config: &ModelsConfig,
) -> Result<(String, ModelConfig), InferenceError> {
    config
        .models
        .get(&config.active_model)
        .map(|model| (config.active_model.clone(), model.clone()))
        .ok_or_else(|| InferenceError::ConfigError {
            reason: format!("active model '{}' not found in config", config.active_model),
        })
}

// ─── Env-var interpolation ───────────────────────────────────────────────────

/// Replace `${VAR}` and `${VAR:-default}` in a string.
fn interpolate_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            let mut var_expr = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                var_expr.push(c);
            }
            result.push_str(&resolve_var_expr(&var_expr));
        } else {
            result.push(ch);
        }
    }

    result
}

/// Resolve a variable expression like `VAR` or `VAR:-default`.
fn resolve_var_expr(expr: &str) -> String {
    match expr.split_once(":-") {
        Some((var_name, default)) => {
            std::env::var(var_name).unwrap_or_else(|_| expand_tilde(default))
        }
        None => std::env::var(expr).unwrap_or_default(),
    }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return format!("{}{rest}", home.display());
        }
    }
    path.to_string()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_env_vars_with_default() {
        std::env::remove_var("__COURSE_RAG_UNSET_VAR__");
        let result = interpolate_env_vars("${__COURSE_RAG_UNSET_VAR__:-https://api.deepseek.com}");
        assert_eq!(result, "https://api.deepseek.com");
    }

    #[test]
    fn test_interpolate_env_vars_with_value() {
        std::env::set_var("__COURSE_RAG_TEST_KEY__", "sk-test");
        let result = interpolate_env_vars("api_key: ${__COURSE_RAG_TEST_KEY__}");
        assert_eq!(result, "api_key: sk-test");
        std::env::remove_var("__COURSE_RAG_TEST_KEY__");
    }

    #[test]
    fn test_interpolate_no_vars() {
        let input = "plain text with no variables";
        assert_eq!(interpolate_env_vars(input), input);
    }

    #[test]
    fn test_expand_tilde() {
        let result = expand_tilde("~/courses");
        assert!(!result.starts_with('~'), "tilde should be expanded");
        assert!(result.ends_with("/courses"));
    }

    #[test]
    fn test_parse_applies_defaults() {
        let yaml = r#"
            active_model: local
            models:
              local:
                display_name: "Local"
                base_url: "http://localhost:11434/v1"
        "#;
        let config = parse_models_config(yaml).unwrap();
        let (key, model) = resolve_active_model(&config).unwrap();
        assert_eq!(key, "local");
        assert_eq!(model.temperature, 0.0);
        assert_eq!(model.max_tokens, 800);
        assert!(model.api_key.is_none());
        assert!(model.model_name.is_none());
    }

    #[test]
    fn test_resolve_active_model_not_found() {
        let config = ModelsConfig {
            active_model: "nonexistent".into(),
            models: HashMap::new(),
        };
        assert!(resolve_active_model(&config).is_err());
    }

    #[test]
    fn test_default_is_deepseek() {
        let config = ModelsConfig::default();
        let (key, model) = resolve_active_model(&config).unwrap();
        assert_eq!(key, "deepseek-chat");
        assert_eq!(model.base_url, "https://api.deepseek.com");
        assert_eq!(model.max_tokens, 800);
    }

    #[test]
    fn test_find_and_load_from_nested_dir() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("config")).unwrap();
        std::fs::write(
            root.path().join(CONFIG_RELATIVE_PATH),
            concat!(
                "active_model: m\nmodels:\n  m:\n",
                "    display_name: M\n    base_url: http://x\n    max_tokens: 256\n",
            ),
        )
        .unwrap();
        let nested = root.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let path = find_config_path(&nested).unwrap();
        let config = load_models_config(&path).unwrap();
        assert_eq!(config.models["m"].max_tokens, 256);
    }

    #[test]
    fn test_load_models_config_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.yaml");
        std::fs::write(&path, "active_model: [unclosed").unwrap();
        let err = load_models_config(&path).unwrap_err();
        assert!(matches!(err, InferenceError::ConfigError { .. }));
    }

    #[test]
    fn test_load_or_default_without_file_uses_preset() {
        std::env::remove_var(PROJECT_ROOT_ENV);
        let dir = tempfile::tempdir().unwrap();

        let config = load_or_default(dir.path()).unwrap();

        assert_eq!(config, ModelsConfig::default());
    }

    #[test]
    fn test_load_or_default_broken_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("config")).unwrap();
        std::fs::write(dir.path().join(CONFIG_RELATIVE_PATH), "models: [unclosed").unwrap();

        let err = load_or_default(dir.path()).unwrap_err();
        assert!(matches!(err, InferenceError::ConfigError { .. }));
    }
}
