/*
 * Responsibility
 * - Read environment variables once at startup (PORT, DATABASE_URL, CORS, Auth0 settings)
 * - Validate values; anything missing or malformed fails startup
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use url::Url;

use crate::services::auth::AuthConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // None => drinks are kept in memory (local development, tests)
    pub database_url: Option<String>,
    pub cors_allowed_origins: Vec<String>,
    pub request_timeout: Duration,

    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so parsing can be exercised without
    /// touching the process environment.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match var("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 5000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV"));

        let database_url = var("DATABASE_URL").filter(|s| !s.trim().is_empty());

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let request_timeout = Duration::from_secs(seconds(&var, "REQUEST_TIMEOUT_SECONDS", 30)?);

        let domain = var("AUTH0_DOMAIN")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("AUTH0_DOMAIN"))?;
        let audience = var("API_AUDIENCE")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("API_AUDIENCE"))?;

        let mut auth =
            AuthConfig::new(&domain, audience).map_err(|_| ConfigError::Invalid("AUTH0_DOMAIN"))?;

        if let Some(raw) = var("AUTH_ALGORITHMS") {
            auth.algorithms = parse_algorithms(&raw)?;
        }
        if let Some(raw) = var("JWKS_URL") {
            auth.jwks_url = Url::parse(raw.trim()).map_err(|_| ConfigError::Invalid("JWKS_URL"))?;
        }
        auth.jwks_fetch_timeout =
            Duration::from_secs(seconds(&var, "JWKS_FETCH_TIMEOUT_SECONDS", 5)?);
        auth.jwks_refresh_interval =
            Duration::from_secs(seconds(&var, "JWKS_REFRESH_INTERVAL_SECONDS", 60 * 60)?);
        auth.jwks_min_refetch = Duration::from_secs(seconds(&var, "JWKS_MIN_REFETCH_SECONDS", 30)?);
        auth.leeway_seconds = seconds(&var, "ACCESS_TOKEN_LEEWAY_SECONDS", 0)?;

        if auth.jwks_fetch_timeout.is_zero() {
            return Err(ConfigError::Invalid("JWKS_FETCH_TIMEOUT_SECONDS"));
        }
        if auth.jwks_refresh_interval.is_zero() {
            return Err(ConfigError::Invalid("JWKS_REFRESH_INTERVAL_SECONDS"));
        }

        Ok(Self {
            addr,
            app_env,
            database_url,
            cors_allowed_origins,
            request_timeout,
            auth,
        })
    }
}

fn seconds<F>(var: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn parse_algorithms(raw: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let algorithms = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Algorithm::from_str(s).map_err(|_| ConfigError::Invalid("AUTH_ALGORITHMS")))
        .collect::<Result<Vec<_>, _>>()?;

    if algorithms.is_empty() {
        return Err(ConfigError::Invalid("AUTH_ALGORITHMS"));
    }

    Ok(algorithms)
}
