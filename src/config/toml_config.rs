use crate::utils::error::{BotError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENV_PLACEHOLDER: &str = r"\$\{([^}]+)\}";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub post: PostConfig,
    #[serde(default)]
    pub bluesky: BlueskyConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarConfig {
    pub path: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostConfig {
    pub hashtag: Option<String>,
    pub max_graphemes: Option<usize>,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct BlueskyConfig {
    pub service: Option<String>,
    pub handle: Option<String>,
    pub app_password: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl std::fmt::Debug for BlueskyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlueskyConfig")
            .field("service", &self.service)
            .field("handle", &self.handle)
            .field("app_password", &self.app_password.as_ref().map(|_| "***"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl TomlConfig {
    /// Load the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BotError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value. Unset variables are left
    /// as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(ENV_PLACEHOLDER).map_err(|e| BotError::ConfigError {
            message: format!("placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

/// True for a value that is still an unexpanded `${VAR}` placeholder.
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("${") && value.ends_with('}')
}
