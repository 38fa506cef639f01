/*
 * Responsibility
 * - Load settings from the environment (PORT, APP_ENV, default roles, timeouts)
 * - Validate them (startup fails when something is off)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(std::env::var("APP_ENV").ok().as_deref())
    }

    fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or("development").to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    // Roles granted to every authenticated principal
    pub default_roles: Vec<String>,
    pub request_timeout: Duration,
    pub session_idle_timeout: Duration,
    pub session_max: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            Err(_) => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let default_roles = parse_list(
            &std::env::var("SECURITY_DEFAULT_ROLES").unwrap_or_else(|_| "user".to_string()),
        );

        let request_timeout_seconds = positive_or("REQUEST_TIMEOUT_SECONDS", 30)?;
        let session_idle_timeout_seconds = positive_or("SESSION_IDLE_TIMEOUT_SECONDS", 1800)?;
        let session_max = positive_or("SESSION_MAX", 10_000)?;

        Ok(Self {
            addr,
            app_env,
            default_roles,
            request_timeout: Duration::from_secs(request_timeout_seconds),
            session_idle_timeout: Duration::from_secs(session_idle_timeout_seconds),
            session_max: session_max as usize,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            app_env: AppEnv::Development,
            default_roles: vec!["user".to_string()],
            request_timeout: Duration::from_secs(30),
            session_idle_timeout: Duration::from_secs(1800),
            session_max: 10_000,
        }
    }
}

// Unset → `default`; set but not a positive integer → Invalid(key)
fn positive_or(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => parse_positive(&raw).ok_or(ConfigError::Invalid(key)),
        Err(_) => Ok(default),
    }
}

fn parse_positive(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|v| *v > 0)
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
