//! Bearer token verification.
//!
//! The rest of the crate never sees token bytes: a [`TokenVerifier`] turns a
//! bearer token into a [`PermissionSet`] or an [`AuthError`].

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::{AppState, config::AuthConfig, error::AppError, permissions::PermissionSet};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("authorization header is expected")]
    MissingToken,

    #[error("authorization header must be a bearer token")]
    MalformedHeader,

    #[error("token expired")]
    Expired,

    #[error("incorrect claims, check the audience and issuer")]
    InvalidClaims,

    #[error("unable to parse authentication token: {0}")]
    InvalidToken(String),

    #[error("permissions not included in token")]
    MissingPermissions,
}

/// Claims read from a verified token. `iss`, `aud` and `exp` are checked by
/// the verifier itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

impl Claims {
    pub fn into_permissions(self) -> Result<PermissionSet, AuthError> {
        self.permissions.map(PermissionSet::from_iter).ok_or(AuthError::MissingPermissions)
    }
}

pub trait TokenVerifier: Send + Sync + 'static {
    fn verify(&self, token: &str) -> Result<PermissionSet, AuthError>;
}

pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(key: DecodingKey, algorithm: Algorithm, audience: &str, issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.set_audience(&[audience]);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        Self { key, validation }
    }

    pub fn from_config(config: &AuthConfig) -> anyhow::Result<Self> {
        let key = match config.algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                let secret = config
                    .secret
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("AUTH_SECRET is required for HMAC tokens"))?;
                DecodingKey::from_secret(secret.as_bytes())
            },
            _ => {
                let pem = config.public_key_pem.as_deref().ok_or_else(|| {
                    anyhow::anyhow!("AUTH_PUBLIC_KEY_PATH is required for RSA tokens")
                })?;
                DecodingKey::from_rsa_pem(pem.as_bytes())?
            },
        };
        Ok(Self::new(key, config.algorithm, &config.audience, config.issuer.as_deref()))
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<PermissionSet, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.key, &self.validation).map_err(
            |err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::InvalidClaims,
                _ => AuthError::InvalidToken(err.to_string()),
            },
        )?;
        tracing::debug!(sub = ?data.claims.sub, "token verified");
        data.claims.into_permissions()
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let text = value.to_str().map_err(|_| AuthError::MalformedHeader)?;
    let mut parts = text.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// Permissions of the authenticated caller. Rejects with 401 before any
/// handler logic runs.
#[derive(Clone, Debug)]
pub struct Caller(pub PermissionSet);

impl FromRequestParts<Arc<AppState>> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let permissions = state.verifier.verify(token)?;
        Ok(Caller(permissions))
    }
}
