use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub environment: String,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub limiter: LimiterConfig,
    pub shutdown: ShutdownConfig,
    pub mailer: MailerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub max_idle_time_secs: u64,
}

impl DatabaseConfig {
    pub fn max_idle_time(&self) -> Duration {
        Duration::from_secs(self.max_idle_time_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Per-client token bucket settings
#[derive(Debug, Deserialize, Clone)]
pub struct LimiterConfig {
    pub rps: f64,
    pub burst: u32,
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShutdownConfig {
    pub drain_timeout_secs: u64,
}

impl ShutdownConfig {
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_secs(self.drain_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailerConfig {
    pub sender: String,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, LIMITER__RPS, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .set_default("environment", run_mode.as_str())?
            .set_default("database.max_connections", 25)?
            .set_default("database.max_idle_time_secs", 15 * 60)?
            .set_default("limiter.rps", 2.0)?
            .set_default("limiter.burst", 4)?
            .set_default("limiter.enabled", true)?
            .set_default("shutdown.drain_timeout_secs", 5)?
            .set_default("mailer.sender", "Greenlight <no-reply@greenlight.local>")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: LIMITER__ENABLED=false overrides limiter.enabled
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}
