use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "SHELF_ENV";
const CONFIG_DIR_ENV: &str = "SHELF_CONFIG_DIR";
/// Listen address override, e.g. `:8080` or `127.0.0.1:3000`.
pub const LISTEN_ADDR_ENV: &str = "API_ADDR";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay,
    /// `SHELF__*` variables, and finally `API_ADDR`.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            // Default to the `config` directory under the working directory.
            Err(_) => std::env::current_dir()
                .with_context(|| "unable to resolve current directory")?
                .join("config"),
        };

        let mut settings = Self::from_dir(&config_dir, &environment)?;

        if let Ok(addr) = std::env::var(LISTEN_ADDR_ENV) {
            settings.server.apply_listen_addr(&addr);
        }

        Ok(settings)
    }

    /// Build settings from `{dir}/base.toml`, `{dir}/{environment}.toml` and
    /// `SHELF__*` environment variables.
    pub fn from_dir(config_dir: &Path, environment: &str) -> anyhow::Result<Self> {
        let environment: Environment = environment.parse()?;

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment_name(&environment)));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(config::Environment::with_prefix("SHELF").separator("__"));

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        settings.environment = environment;

        Ok(settings)
    }
}

fn environment_name(environment: &Environment) -> &'static str {
    match environment {
        Environment::Local => "local",
        Environment::Staging => "staging",
        Environment::Production => "production",
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_addr")]
    pub addr: String,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_addr() -> String {
        "0.0.0.0:8080".to_string()
    }

    fn default_request_timeout_ms() -> u64 {
        10_000
    }

    /// Replace the listen address unless `addr` is blank.
    pub fn apply_listen_addr(&mut self, addr: &str) {
        let addr = addr.trim();
        if !addr.is_empty() {
            self.addr = addr.to_string();
        }
    }

    /// Socket address to bind. A bare `:port` binds every interface.
    pub fn bind_addr(&self) -> String {
        match self.addr.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{}", port),
            None => self.addr.clone(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: Self::default_addr(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    #[serde(default = "TelemetrySettings::default_log_level")]
    pub log_level: String,
}

impl TelemetrySettings {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            log_level: Self::default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_server_listens_on_8080() {
        let settings = Settings::default();
        assert_eq!(settings.server.addr, "0.0.0.0:8080");
        assert_eq!(settings.server.bind_addr(), "0.0.0.0:8080");
        assert_eq!(settings.server.request_timeout_ms, 10_000);
    }

    #[test]
    fn bare_port_binds_all_interfaces() {
        let mut server = ServerSettings::default();
        server.apply_listen_addr(":9090");
        assert_eq!(server.addr, ":9090");
        assert_eq!(server.bind_addr(), "0.0.0.0:9090");
    }

    #[test]
    fn blank_listen_addr_keeps_default() {
        let mut server = ServerSettings::default();
        server.apply_listen_addr("   ");
        assert_eq!(server.bind_addr(), "0.0.0.0:8080");

        server.apply_listen_addr("127.0.0.1:3000");
        assert_eq!(server.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let err = "qa".parse::<Environment>().unwrap_err();
        assert!(err.to_string().contains("unsupported environment 'qa'"));
    }

    #[test]
    fn missing_config_dir_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join("shelf-settings-does-not-exist");
        let settings = Settings::from_dir(&dir, "staging").unwrap();
        assert_eq!(settings.environment, Environment::Staging);
        assert_eq!(settings.telemetry.log_format, LogFormat::Pretty);
        assert_eq!(settings.telemetry.log_level, "info");
    }
}
