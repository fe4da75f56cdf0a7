//! Bearer-token verification.
//!
//! The identity provider lives outside this crate; the server only needs to
//! map a presented token to a principal. Tokens are kept as SHA-256 digests and
//! compared in constant time.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::types::AuthorRole;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing token")]
    Missing,
    #[error("invalid token")]
    Invalid,
    #[error("expired token")]
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: AuthorRole,
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Principal, AuthError>;
}

/// One configured token and the identity it grants.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub token: String,
    pub principal: Principal,
    pub expires_at: Option<OffsetDateTime>,
}

struct HashedGrant {
    digest: Vec<u8>,
    principal: Principal,
    expires_at: Option<OffsetDateTime>,
}

/// Token table loaded from configuration.
pub struct StaticTokenVerifier {
    grants: Vec<HashedGrant>,
}

impl StaticTokenVerifier {
    pub fn new(grants: impl IntoIterator<Item = TokenGrant>) -> Self {
        let grants = grants
            .into_iter()
            .map(|grant| HashedGrant {
                digest: hash_token(&grant.token),
                principal: grant.principal,
                expires_at: grant.expires_at,
            })
            .collect();
        Self { grants }
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    fn verify_at(&self, token: &str, now: OffsetDateTime) -> Result<Principal, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::Missing);
        }

        let digest = hash_token(token);
        let grant = self
            .grants
            .iter()
            .find(|grant| grant.digest.ct_eq(&digest).unwrap_u8() == 1)
            .ok_or(AuthError::Invalid)?;

        if let Some(expires_at) = grant.expires_at
            && expires_at <= now
        {
            return Err(AuthError::Expired);
        }

        Ok(grant.principal.clone())
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        self.verify_at(token, OffsetDateTime::now_utc())
    }
}

fn hash_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}
