use std::net::SocketAddr;

use anyhow::Context;
use jsonwebtoken::Algorithm;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub auth: AuthConfig,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub algorithm: Algorithm,
    pub audience: String,
    pub issuer: Option<String>,
    pub secret: Option<String>,
    pub public_key_pem: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://casting_agency.db?mode=rwc".to_string());

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            auth: AuthConfig::from_env()?,
        })
    }
}

impl AuthConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let algorithm: Algorithm = std::env::var("AUTH_ALGORITHM")
            .unwrap_or_else(|_| "RS256".to_string())
            .parse()
            .context("AUTH_ALGORITHM")?;

        let audience =
            std::env::var("AUTH_AUDIENCE").unwrap_or_else(|_| "casting-agency".to_string());
        let issuer = std::env::var("AUTH_ISSUER").ok().filter(|s| !s.trim().is_empty());
        let secret = std::env::var("AUTH_SECRET").ok().filter(|s| !s.is_empty());

        let public_key_pem = match std::env::var("AUTH_PUBLIC_KEY_PATH") {
            Ok(path) => Some(
                std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?,
            ),
            Err(_) => None,
        };

        Ok(Self { algorithm, audience, issuer, secret, public_key_pem })
    }

    /// HMAC configuration for local development and tests.
    pub fn shared_secret(secret: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            algorithm: Algorithm::HS256,
            audience: audience.into(),
            issuer: None,
            secret: Some(secret.into()),
            public_key_pem: None,
        }
    }
}
