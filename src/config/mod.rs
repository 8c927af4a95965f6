#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::bluesky::{DEFAULT_SERVICE, DEFAULT_TIMEOUT_SECONDS};
use crate::core::post::{DEFAULT_HASHTAG, DEFAULT_MAX_GRAPHEMES};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use chrono::{DateTime, Utc};
use std::time::Duration;
use toml_config::{is_placeholder, TomlConfig};
use unicode_segmentation::UnicodeSegmentation;

pub const DEFAULT_CALENDAR_PATH: &str = "data/events.csv";
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const HANDLE_ENV: &str = "BLUESKY_HANDLE";
pub const APP_PASSWORD_ENV: &str = "BLUESKY_APP_PASSWORD";

/// Longest date prefix ("Sep 30, 99999: ") plus the ellipsis and one
/// grapheme of description.
const MIN_BODY_GRAPHEMES: usize = 17;

/// Effective settings for one run. Precedence: CLI flag, TOML file,
/// environment, built-in default.
#[derive(Clone)]
pub struct Settings {
    pub calendar_path: String,
    pub timezone: String,
    pub hashtag: String,
    pub max_graphemes: usize,
    pub reference_instant: Option<DateTime<Utc>>,
    pub service: String,
    pub handle: Option<String>,
    pub app_password: Option<String>,
    pub timeout_seconds: u64,
    pub dry_run: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            calendar_path: DEFAULT_CALENDAR_PATH.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            hashtag: DEFAULT_HASHTAG.to_string(),
            max_graphemes: DEFAULT_MAX_GRAPHEMES,
            reference_instant: None,
            service: DEFAULT_SERVICE.to_string(),
            handle: None,
            app_password: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            dry_run: false,
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("calendar_path", &self.calendar_path)
            .field("timezone", &self.timezone)
            .field("hashtag", &self.hashtag)
            .field("max_graphemes", &self.max_graphemes)
            .field("reference_instant", &self.reference_instant)
            .field("service", &self.service)
            .field("handle", &self.handle)
            .field("app_password", &self.app_password.as_ref().map(|_| "***"))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

fn usable(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty() && !is_placeholder(v))
}

impl Settings {
    /// Merge an optional TOML file over defaults, then fill credentials from
    /// `env` where the file has none.
    pub fn resolve<F>(toml: Option<TomlConfig>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let toml = toml.unwrap_or_default();
        let defaults = Self::default();

        Self {
            calendar_path: usable(toml.calendar.path).unwrap_or(defaults.calendar_path),
            timezone: usable(toml.calendar.timezone).unwrap_or(defaults.timezone),
            hashtag: toml.post.hashtag.unwrap_or(defaults.hashtag),
            max_graphemes: toml.post.max_graphemes.unwrap_or(defaults.max_graphemes),
            reference_instant: None,
            service: usable(toml.bluesky.service).unwrap_or(defaults.service),
            handle: usable(toml.bluesky.handle).or_else(|| usable(env(HANDLE_ENV))),
            app_password: usable(toml.bluesky.app_password)
                .or_else(|| usable(env(APP_PASSWORD_ENV))),
            timeout_seconds: toml
                .bluesky
                .timeout_seconds
                .unwrap_or(defaults.timeout_seconds),
            dry_run: false,
        }
    }

    /// `resolve` against the process environment.
    pub fn from_env(toml: Option<TomlConfig>) -> Self {
        Self::resolve(toml, |name| std::env::var(name).ok())
    }

    #[cfg(feature = "cli")]
    pub fn apply_cli(mut self, cli: &cli::CliConfig) -> Self {
        if let Some(calendar) = &cli.calendar {
            self.calendar_path = calendar.clone();
        }
        if let Some(timezone) = &cli.timezone {
            self.timezone = timezone.clone();
        }
        if let Some(service) = &cli.service {
            self.service = service.clone();
        }
        if cli.at.is_some() {
            self.reference_instant = cli.at;
        }
        self.dry_run = cli.dry_run;
        self
    }

    /// Per-request limit for calls to the Bluesky service.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Force dry-run mode and validate. Used by tools that only print posts,
    /// so the post budget is still checked without requiring credentials.
    pub fn for_preview(mut self) -> Result<Self> {
        self.dry_run = true;
        self.validate()?;
        Ok(self)
    }

    /// Handle and app password, required when actually publishing.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let handle = validation::validate_required_field("bluesky.handle", &self.handle)?;
        let password =
            validation::validate_required_field("bluesky.app_password", &self.app_password)?;
        Ok((handle, password))
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("calendar.path", &self.calendar_path)?;
        validation::validate_timezone("calendar.timezone", &self.timezone)?;
        validation::validate_non_empty_string("post.hashtag", &self.hashtag)?;
        validation::validate_positive_number(
            "post.max_graphemes",
            self.max_graphemes,
            self.hashtag.graphemes(true).count() + MIN_BODY_GRAPHEMES,
        )?;

        if !self.dry_run {
            validation::validate_url("bluesky.service", &self.service)?;
            validation::validate_positive_number(
                "bluesky.timeout_seconds",
                self.timeout_seconds as usize,
                1,
            )?;
            self.credentials()?;
        }
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn calendar_path(&self) -> &str {
        &self.calendar_path
    }

    fn timezone(&self) -> &str {
        &self.timezone
    }

    fn hashtag(&self) -> &str {
        &self.hashtag
    }

    fn max_graphemes(&self) -> usize {
        self.max_graphemes
    }

    fn reference_instant(&self) -> Option<DateTime<Utc>> {
        self.reference_instant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::BotError;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(None, env(&[]));
        assert_eq!(settings.calendar_path, "data/events.csv");
        assert_eq!(settings.timezone, "UTC");
        assert_eq!(settings.hashtag, " #OnThisDay");
        assert_eq!(settings.max_graphemes, 300);
        assert_eq!(settings.service, "https://bsky.social");
        assert!(settings.handle.is_none());
    }

    #[test]
    fn test_toml_over_env() {
        let toml = TomlConfig::from_toml_str(
            "[calendar]\ntimezone = \"Asia/Tokyo\"\n[bluesky]\nhandle = \"file.bsky.social\"\n",
        )
        .unwrap();
        let settings = Settings::resolve(
            Some(toml),
            env(&[
                ("BLUESKY_HANDLE", "env.bsky.social"),
                ("BLUESKY_APP_PASSWORD", "env-pass"),
            ]),
        );

        assert_eq!(settings.timezone, "Asia/Tokyo");
        assert_eq!(settings.handle.as_deref(), Some("file.bsky.social"));
        assert_eq!(settings.app_password.as_deref(), Some("env-pass"));
    }

    #[test]
    fn test_unexpanded_placeholder_falls_back_to_env() {
        let toml = TomlConfig::from_toml_str(
            "[bluesky]\napp_password = \"${ONTHISDAY_NEVER_SET_VARIABLE}\"\n",
        )
        .unwrap();
        let settings = Settings::resolve(Some(toml), env(&[("BLUESKY_APP_PASSWORD", "fallback")]));
        assert_eq!(settings.app_password.as_deref(), Some("fallback"));
    }

    #[test]
    fn test_validation_requires_credentials_unless_dry_run() {
        let mut settings = Settings::resolve(None, env(&[]));
        assert!(matches!(
            settings.validate(),
            Err(BotError::MissingConfigError { .. })
        ));

        settings.dry_run = true;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let base = Settings::resolve(
            None,
            env(&[("BLUESKY_HANDLE", "h"), ("BLUESKY_APP_PASSWORD", "p")]),
        );
        assert!(base.validate().is_ok());

        let bad_tz = Settings {
            timezone: "Atlantis/Capital".to_string(),
            ..base.clone()
        };
        assert!(bad_tz.validate().is_err());

        let tiny = Settings {
            max_graphemes: 20,
            ..base.clone()
        };
        assert!(tiny.validate().is_err());

        let bad_service = Settings {
            service: "bsky.social".to_string(),
            ..base
        };
        assert!(bad_service.validate().is_err());
    }

    #[test]
    fn test_timeout_from_toml() {
        let toml = TomlConfig::from_toml_str("[bluesky]\ntimeout_seconds = 5\n").unwrap();
        let settings = Settings::resolve(Some(toml), env(&[]));
        assert_eq!(settings.request_timeout(), Duration::from_secs(5));

        let defaults = Settings::resolve(None, env(&[]));
        assert_eq!(defaults.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let settings = Settings {
            timeout_seconds: 0,
            ..Settings::resolve(None, env(&[("BLUESKY_HANDLE", "h"), ("BLUESKY_APP_PASSWORD", "p")]))
        };
        assert!(matches!(
            settings.validate(),
            Err(BotError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_preview_settings_skip_credentials_but_check_budget() {
        let settings = Settings::resolve(None, env(&[])).for_preview().unwrap();
        assert!(settings.dry_run);

        let tiny = Settings {
            max_graphemes: 12,
            ..Settings::default()
        };
        assert!(matches!(
            tiny.for_preview(),
            Err(BotError::InvalidConfigValueError { .. })
        ));

        let bad_tz = Settings {
            timezone: "Mars/Olympus".to_string(),
            ..Settings::default()
        };
        assert!(bad_tz.for_preview().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_overrides() {
        use clap::Parser;

        let cli = cli::CliConfig::parse_from([
            "onthisday",
            "--calendar",
            "other.csv",
            "--timezone",
            "Europe/Madrid",
            "--dry-run",
        ]);
        let settings = Settings::resolve(None, env(&[])).apply_cli(&cli);

        assert_eq!(settings.calendar_path, "other.csv");
        assert_eq!(settings.timezone, "Europe/Madrid");
        assert!(settings.dry_run);
        assert!(settings.reference_instant.is_none());
    }
}
