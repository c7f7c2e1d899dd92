use std::net::SocketAddr;

use anyhow::Context;
use serde::Deserialize;

/// Upper bound on token lifetime: one year.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;
const DEFAULT_TTL_MINUTES: i64 = 60;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Credentials for the admin account created at startup, if configured.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt: JwtConfig,
    pub bcrypt_cost: u32,
    pub admin_seed: Option<AdminSeed>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = match std::env::var("APP_PORT") {
            Ok(v) => v.parse::<u16>().context("APP_PORT must be a port number")?,
            Err(_) => 3000,
        };
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "usergate".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "usergate-users".into()),
            ttl_minutes: ttl_minutes(std::env::var("JWT_TTL_MINUTES").ok().as_deref()),
        };
        let bcrypt_cost = std::env::var("BCRYPT_COST")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(crate::auth::password::DEFAULT_COST);

        let admin_seed = match (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(AdminSeed {
                username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            host,
            port,
            database_url,
            jwt,
            bcrypt_cost,
            admin_seed,
        })
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

/// Unparseable values fall back to the default; the rest are clamped to `0..=MAX_TTL_MINUTES`.
fn ttl_minutes(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_TTL_MINUTES)
        .clamp(0, MAX_TTL_MINUTES)
}
