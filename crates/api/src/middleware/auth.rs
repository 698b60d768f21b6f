//! # Authentication Module
//!
//! Resolves the caller's identity from an `Authorization: Bearer <jwt>`
//! header. Tokens are HS256-signed by the identity provider with a secret
//! shared with this service; the `sub` claim is the caller's UUID, which is
//! also the id of their profile.
//!
//! Token issuance happens elsewhere. This module only verifies.

use std::sync::Arc;

use agenda_core::errors::AgendaError;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Claims this service reads from an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Caller id
    pub sub: String,
    /// Expiration (Unix epoch seconds)
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Verifies bearer tokens against the shared secret
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Creates a verifier; `aud` is only checked when `audience` is set
    pub fn new(secret: &str, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                validation.set_required_spec_claims(&["exp", "aud"]);
            }
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Validates `token` and returns the caller id from its `sub` claim
    ///
    /// # Errors
    ///
    /// * `AgendaError::Unauthenticated` - bad signature, expired, wrong
    ///   audience, malformed token or a `sub` that is not a UUID
    pub fn verify(&self, token: &str) -> Result<Uuid, AgendaError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            let reason = match e.kind() {
                ErrorKind::ExpiredSignature => "token expired",
                ErrorKind::InvalidSignature => "invalid signature",
                ErrorKind::InvalidAudience => "invalid audience",
                ErrorKind::MissingRequiredClaim(_) => "missing required claim",
                _ => "malformed token",
            };
            debug!("Rejected bearer token: {} ({})", reason, e);
            AgendaError::Unauthenticated(reason.to_string())
        })?;

        Uuid::parse_str(&data.claims.sub).map_err(|_| {
            debug!("Rejected bearer token: subject is not a UUID");
            AgendaError::Unauthenticated("invalid subject".to_string())
        })
    }
}

/// Extracts the raw token from an `Authorization` header value
///
/// The scheme is matched case-insensitively; anything but `Bearer` is refused.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// The authenticated caller
///
/// Used as the first extractor of every `/api` handler, so a request without
/// a valid identity is rejected before its body is read or the store is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<ApiState>) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| AgendaError::Unauthenticated("missing authorization header".to_string()))?;

        let token = header
            .to_str()
            .ok()
            .and_then(bearer_token)
            .ok_or_else(|| AgendaError::Unauthenticated("expected a bearer token".to_string()))?;

        let user_id = state.auth.verify(token)?;
        Ok(AuthUser { user_id })
    }
}
