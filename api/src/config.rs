use std::env;

use anyhow::Context;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Credentials for the first admin, used only while no admin exists
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    /// Inventory rows at or below this availability count as low stock
    pub low_stock_threshold: i32,
    pub run_migrations: bool,
    /// Allowed CORS origin; any origin when unset
    pub cors_allow_origin: Option<String>,
    /// Rate limiting of login and public tracking
    pub rate_limit_enabled: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: parse_var("PORT", 8080)?,
            admin_username: env::var("ADMIN_USERNAME").ok().filter(|v| !v.is_empty()),
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
            low_stock_threshold: parse_var("LOW_STOCK_THRESHOLD", 5)?,
            run_migrations: parse_var("RUN_MIGRATIONS", true)?,
            cors_allow_origin: env::var("CORS_ALLOW_ORIGIN")
                .ok()
                .filter(|v| !v.is_empty() && v != "*"),
            rate_limit_enabled: parse_var("RATE_LIMIT_ENABLED", true)?,
        })
    }

    /// Both bootstrap credentials, when configured
    pub fn bootstrap_admin(&self) -> Option<(&str, &str)> {
        match (&self.admin_username, &self.admin_password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.as_str())),
            _ => None,
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {}={}: {}", name, raw, e)),
        _ => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for router tests; nothing is read from the environment
    pub fn for_tests() -> Self {
        Self {
            database_url: "postgres://localhost/freightdesk_test".to_string(),
            port: 0,
            admin_username: None,
            admin_password: None,
            low_stock_threshold: 5,
            run_migrations: false,
            cors_allow_origin: None,
            rate_limit_enabled: false,
        }
    }
}
