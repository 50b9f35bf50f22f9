//! Signed bearer token utilities for authentication and authorization.
//!
//! Provides token issuance, verification and claim extraction. Verification
//! is deliberately coarse: any failure (malformed token, bad signature,
//! expiry) collapses to "invalid", and claim extraction to absence, so
//! callers never have to distinguish failure modes.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::{ServiceError, ServiceResult};

/// Claims carried by every token issued by this service.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Username of the authenticated user
    pub sub: String,
    /// Owning tenant (UUID string; empty on refresh tokens)
    pub tenant_id: String,
    /// Role name
    pub role: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
}

/// Token issuance and verification around a single HS512 signing key.
///
/// Constructed once at startup; the key is never rotated at runtime.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expires_in_seconds: u64,
}

impl TokenService {
    pub fn new(secret: &str, expires_in_seconds: u64) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        // Zero leeway: a token is rejected the moment its expiry passes.
        let mut validation = Validation::new(Algorithm::HS512);
        validation.validate_exp = true;
        validation.leeway = 0;

        TokenService {
            encoding_key,
            decoding_key,
            validation,
            expires_in_seconds,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, config.jwt_expires_in_seconds)
    }

    pub fn expires_in_seconds(&self) -> u64 {
        self.expires_in_seconds
    }

    /// Issues a signed access token for the given user.
    ///
    /// # Errors
    /// Rejects a blank username; signing failures surface as internal errors.
    pub fn issue(&self, username: &str, tenant_id: Uuid, role: &str) -> ServiceResult<String> {
        if username.trim().is_empty() {
            return Err(ServiceError::validation("Username must not be empty"));
        }

        let now = Utc::now();
        let exp = now + Duration::seconds(self.expires_in_seconds as i64);

        let claims = Claims {
            sub: username.to_string(),
            tenant_id: tenant_id.to_string(),
            role: role.to_string(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }

    /// Generates a refresh token (longer expiration, subject only).
    pub fn issue_refresh(&self, username: &str) -> ServiceResult<String> {
        if username.trim().is_empty() {
            return Err(ServiceError::validation("Username must not be empty"));
        }

        let now = Utc::now();
        let exp = now + Duration::days(30); // Refresh token expires in 30 days

        let claims = Claims {
            sub: username.to_string(),
            tenant_id: String::new(), // Refresh tokens carry no tenant
            role: String::new(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key).map_err(|e| {
            ServiceError::internal_error(format!("Refresh token generation failed: {}", e))
        })
    }

    /// True iff the token was signed with this service's key and has not
    /// expired. Never errors or panics on hostile input.
    pub fn verify(&self, token: &str) -> bool {
        self.decode_claims(token).is_some()
    }

    /// Username the token was issued for, if the token verifies.
    pub fn subject(&self, token: &str) -> Option<String> {
        self.decode_claims(token).map(|claims| claims.sub)
    }

    /// Owning tenant, if the token verifies and the claim is a well-formed UUID.
    pub fn tenant(&self, token: &str) -> Option<Uuid> {
        self.decode_claims(token)
            .and_then(|claims| Uuid::parse_str(&claims.tenant_id).ok())
    }

    /// Role claim, if the token verifies.
    pub fn role(&self, token: &str) -> Option<String> {
        self.decode_claims(token).map(|claims| claims.role)
    }

    fn decode_claims(&self, token: &str) -> Option<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .ok()
    }
}
