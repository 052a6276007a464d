use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    Supabase,
    Memory,
}

impl std::str::FromStr for BackendMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supabase" => Ok(BackendMode::Supabase),
            "memory" => Ok(BackendMode::Memory),
            other => Err(format!("unknown backend mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub jwt_secret: String,
    pub backend_mode: BackendMode,
    pub backend_url: String,
    pub backend_api_key: String,
    pub backend_timeout_secs: u64,
    pub storage_bucket: String,
    pub cache_ttl_secs: i64,
    pub admin_rps: u32,
    pub cors_origin: Option<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let backend_mode: BackendMode = get_env_parse_or("BACKEND_MODE", BackendMode::Supabase)?;
        let (backend_url, backend_api_key) = match backend_mode {
            BackendMode::Supabase => (get_env("BACKEND_URL")?, get_env("BACKEND_API_KEY")?),
            BackendMode::Memory => (
                env::var("BACKEND_URL").unwrap_or_default(),
                env::var("BACKEND_API_KEY").unwrap_or_default(),
            ),
        };

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            jwt_secret: get_env("JWT_SECRET")?,
            backend_mode,
            backend_url: backend_url.trim_end_matches('/').to_string(),
            backend_api_key,
            backend_timeout_secs: get_env_parse_or("BACKEND_TIMEOUT_SECS", 30)?,
            storage_bucket: env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| "applicant-files".to_string()),
            cache_ttl_secs: get_env_parse_or("CACHE_TTL_SECS", 60)?,
            admin_rps: get_env_parse_or("ADMIN_RPS", 50)?,
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|v| !v.trim().is_empty()),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_mode_parses_case_insensitively() {
        assert_eq!("Memory".parse::<BackendMode>(), Ok(BackendMode::Memory));
        assert_eq!(" supabase ".parse::<BackendMode>(), Ok(BackendMode::Supabase));
        assert!("sqlite".parse::<BackendMode>().is_err());
    }
}
