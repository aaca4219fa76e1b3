/*
 * Responsibility
 * - load settings from the environment (DATABASE_URL, CORS allowlist, auth secret, ...)
 * - validate settings (startup fails when something required is missing)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
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

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // None in development means "use the in-memory store"
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    pub cors_allowed_origins: Vec<String>,

    pub auth_secret: String,
    pub auth_issuer: String,
    pub access_token_ttl_seconds: u64,
    pub access_token_leeway_seconds: u64,

    pub media_base_url: String,

    // (username, password) pairs seeded into the in-memory store
    pub bootstrap_users: Vec<(String, String)>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        if database_url.is_none() && app_env.is_production() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let database_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let cors_allowed_origins =
            parse_origins(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let auth_secret = std::env::var("AUTH_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("AUTH_SECRET"))?;

        let auth_issuer =
            std::env::var("AUTH_ISSUER").unwrap_or_else(|_| "yatube-api".to_string());

        let access_token_ttl_seconds =
            parse_token_ttl(std::env::var("ACCESS_TOKEN_TTL_SECONDS").ok().as_deref())?;

        let access_token_leeway_seconds = std::env::var("ACCESS_TOKEN_LEEWAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        let media_base_url = std::env::var("MEDIA_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}/media/", port));

        let bootstrap_users = parse_bootstrap_users(
            &std::env::var("BOOTSTRAP_USERS").unwrap_or_default(),
        )?;

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            cors_allowed_origins,
            auth_secret,
            auth_issuer,
            access_token_ttl_seconds,
            access_token_leeway_seconds,
            media_base_url,
            bootstrap_users,
        })
    }
}

const DEFAULT_TOKEN_TTL_SECONDS: u64 = 86_400; // 1 day
const MAX_TOKEN_TTL_SECONDS: u64 = 10 * 365 * 86_400; // ~10 years

// Bounded so `now + ttl` always fits in a JWT `exp`.
fn parse_token_ttl(raw: Option<&str>) -> Result<u64, ConfigError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(DEFAULT_TOKEN_TTL_SECONDS);
    };
    raw.parse::<u64>()
        .ok()
        .filter(|ttl| (1..=MAX_TOKEN_TTL_SECONDS).contains(ttl))
        .ok_or(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
}

// "alice:secret,bob:hunter2"
fn parse_bootstrap_users(raw: &str) -> Result<Vec<(String, String)>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| {
            let (username, password) = entry
                .split_once(':')
                .ok_or(ConfigError::Invalid("BOOTSTRAP_USERS"))?;
            let username = username.trim();
            if username.is_empty() || password.is_empty() {
                return Err(ConfigError::Invalid("BOOTSTRAP_USERS"));
            }
            Ok((username.to_string(), password.to_string()))
        })
        .collect()
}
