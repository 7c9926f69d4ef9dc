use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use dotenvy::dotenv;

use crate::service::locks::MIN_IDLE;

/// An account created at startup when running on the in-memory store.
#[derive(Clone, Debug, PartialEq)]
pub struct DevUser {
    pub username: String,
    pub password: String,
    pub is_manager: bool,
}

#[derive(Clone)]
pub struct Config {
    /// Absent means "run on the in-memory store".
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_refresh_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
    pub log_dir: String,
    pub day_lock_idle_secs: u64,
    pub dev_users: Vec<DevUser>,
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => Ok(default),
    }
}

/// `name:password[:manager],...`
pub fn parse_dev_users(raw: &str) -> Result<Vec<DevUser>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|spec| {
            let mut parts = spec.splitn(3, ':');
            let username = parts.next().unwrap_or_default().trim();
            let password = parts.next().unwrap_or_default();
            let is_manager = match parts.next() {
                None => false,
                Some("manager") => true,
                Some(other) => return Err(anyhow!("unknown DEV_USERS flag '{other}'")),
            };
            if username.is_empty() || password.is_empty() {
                return Err(anyhow!("DEV_USERS entry '{spec}' needs a name and a password"));
            }
            Ok(DevUser {
                username: username.to_string(),
                password: password.to_string(),
                is_manager,
            })
        })
        .collect()
}

/// Day locks must outlive any request that holds one.
pub fn check_day_lock_idle(secs: u64) -> Result<u64> {
    if secs < MIN_IDLE.as_secs() {
        return Err(anyhow!(
            "DAY_LOCK_IDLE_SECS must be at least {}, got {secs}",
            MIN_IDLE.as_secs()
        ));
    }
    Ok(secs)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            database_url: env::var("DATABASE_URL").ok().filter(|u| !u.trim().is_empty()),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            access_token_ttl: parse_or("ACCESS_TOKEN_TTL", 900)?, // 15 min
            refresh_token_ttl: parse_or("REFRESH_TOKEN_TTL", 604_800)?, // 7 days

            rate_login_per_min: parse_or("RATE_LOGIN_PER_MIN", 60)?,
            rate_refresh_per_min: parse_or("RATE_REFRESH_PER_MIN", 30)?,
            rate_protected_per_min: parse_or("RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            day_lock_idle_secs: check_day_lock_idle(parse_or("DAY_LOCK_IDLE_SECS", 3600)?)?,
            dev_users: parse_dev_users(&env::var("DEV_USERS").unwrap_or_default())?,
        })
    }
}
