use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Formspree form the widget posts to unless configured otherwise
pub const DEFAULT_ENDPOINT: &str = "https://formspree.io/f/xzdavppl";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
    pub paths: PathsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where and how submissions are sent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub url: String,
    /// Overrides the default `inquiry/<version>` user agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Event poll interval in milliseconds (default: 250)
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// How long a notification banner stays up (default: 4000)
    #[serde(default = "default_notification_ttl")]
    pub notification_ttl_ms: u64,
}

fn default_tick_rate() -> u64 {
    250
}

fn default_notification_ttl() -> u64 {
    4000 // 4 seconds
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            notification_ttl_ms: default_notification_ttl(),
        }
    }
}

/// Text shown to the user after a submission attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagesConfig {
    #[serde(default = "default_success_message")]
    pub success: String,
    #[serde(default = "default_failure_message")]
    pub failure: String,
}

fn default_success_message() -> String {
    "Your inquiry has been sent.".to_string()
}

fn default_failure_message() -> String {
    "Something went wrong while sending your inquiry. Please try again later.".to_string()
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            success: default_success_message(),
            failure: default_failure_message(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for preferences and logs
    pub state: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to file in TUI mode (false = stderr for debugging)
    #[serde(default = "default_log_to_file")]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_log_to_file(),
        }
    }
}

impl Config {
    /// Project-local config file, checked relative to the working directory
    pub fn local_config_path() -> PathBuf {
        PathBuf::from("inquiry.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so inquiry works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        // User config in ~/.config/inquiry/ (global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("inquiry").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // inquiry.toml next to where we were launched
        let local_config = Self::local_config_path();
        if local_config.exists() {
            builder = builder.add_source(config::File::from(local_config));
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables with INQUIRY prefix, e.g. INQUIRY__ENDPOINT__URL
        builder = builder.add_source(
            config::Environment::with_prefix("INQUIRY")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save config to ./inquiry.toml
    pub fn save(&self) -> Result<()> {
        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        std::fs::write(Self::local_config_path(), toml_str)
            .context("Failed to write config file")?;
        Ok(())
    }

    /// Get absolute path to state directory
    pub fn state_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.paths.state);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }

    /// Get absolute path to logs directory
    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }

    /// File holding the persisted display preferences
    pub fn preferences_path(&self) -> PathBuf {
        self.state_path().join("preferences.json")
    }
}

impl Default for Config {
    fn default() -> Self {
        let state = dirs::data_dir()
            .map(|dir| dir.join("inquiry").to_string_lossy().to_string())
            .unwrap_or_else(|| ".inquiry".to_string());

        Self {
            endpoint: EndpointConfig {
                url: DEFAULT_ENDPOINT.to_string(),
                user_agent: None,
            },
            ui: UiConfig::default(),
            messages: MessagesConfig::default(),
            paths: PathsConfig { state },
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_endpoint_is_formspree() {
        let config = Config::default();
        assert_eq!(config.endpoint.url, DEFAULT_ENDPOINT);
        assert!(config.endpoint.user_agent.is_none());
    }

    #[test]
    fn test_load_with_explicit_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
[endpoint]
url = "http://127.0.0.1:9/forms/test"

[messages]
success = "Thanks!"
"#,
        )
        .unwrap();

        let config = Config::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.endpoint.url, "http://127.0.0.1:9/forms/test");
        assert_eq!(config.messages.success, "Thanks!");
        // Untouched keys keep their defaults
        assert_eq!(config.messages.failure, default_failure_message());
        assert_eq!(config.ui.tick_rate_ms, 250);
    }

    #[test]
    fn test_paths_relative_to_state() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths.state = temp_dir.path().to_string_lossy().to_string();

        assert_eq!(config.state_path(), temp_dir.path());
        assert!(config.logs_path().ends_with("logs"));
        assert!(config.preferences_path().ends_with("preferences.json"));
    }

    #[test]
    fn test_relative_state_path_is_absolutized() {
        let mut config = Config::default();
        config.paths.state = ".inquiry".to_string();
        assert!(config.state_path().is_absolute());
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.endpoint.url, config.endpoint.url);
        assert_eq!(parsed.messages, config.messages);
    }
}
