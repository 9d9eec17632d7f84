//! JWT token generation and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{Claims, TokenKind, TokenPair};

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in minutes.
    pub access_token_expires_minutes: i64,
    /// Refresh token expiration in days.
    pub refresh_token_expires_days: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_token_expires_minutes: 30,
            refresh_token_expires_days: 7,
        }
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    Encoding(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    Decoding(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// A token of the wrong kind was presented.
    #[error("expected a {expected:?} token")]
    WrongKind {
        /// The kind the caller required.
        expected: TokenKind,
    },
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("config", &self.config)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issues an access/refresh token pair for a user.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Encoding` if token generation fails.
    pub fn issue_pair(&self, user_id: Uuid, role: &str, branch: &str) -> Result<TokenPair, JwtError> {
        let access = self.generate(user_id, role, branch, TokenKind::Access)?;
        let refresh = self.generate(user_id, role, branch, TokenKind::Refresh)?;
        Ok(TokenPair {
            access_token: access,
            refresh_token: refresh,
            expires_in: self.access_token_expires_in(),
        })
    }

    fn generate(
        &self,
        user_id: Uuid,
        role: &str,
        branch: &str,
        kind: TokenKind,
    ) -> Result<String, JwtError> {
        let expires_at = match kind {
            TokenKind::Access => {
                Utc::now() + Duration::minutes(self.config.access_token_expires_minutes)
            }
            TokenKind::Refresh => {
                Utc::now() + Duration::days(self.config.refresh_token_expires_days)
            }
        };
        let claims = Claims::new(user_id, role, branch, kind, expires_at);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Encoding(e.to_string()))
    }

    /// Validates and decodes a token of the expected kind.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired,
    /// `JwtError::WrongKind` if the token kind does not match, and
    /// `JwtError::Decoding` if the token is malformed.
    pub fn validate_token(&self, token: &str, expected: TokenKind) -> Result<Claims, JwtError> {
        let validation = Validation::default();

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Decoding(e.to_string()),
            })?;

        if claims.typ != expected {
            return Err(JwtError::WrongKind { expected });
        }

        Ok(claims)
    }

    /// Returns the access token expiration in seconds.
    #[must_use]
    pub const fn access_token_expires_in(&self) -> i64 {
        self.config.access_token_expires_minutes * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expires_minutes: 30,
            refresh_token_expires_days: 7,
        })
    }

    #[test]
    fn test_issue_and_validate_pair() {
        let svc = service();
        let user_id = Uuid::new_v4();
        let pair = svc.issue_pair(user_id, "manager", "Tema").unwrap();

        let access = svc
            .validate_token(&pair.access_token, TokenKind::Access)
            .unwrap();
        assert_eq!(access.sub, user_id);
        assert_eq!(access.role, "manager");
        assert_eq!(access.branch, "Tema");

        let refresh = svc
            .validate_token(&pair.refresh_token, TokenKind::Refresh)
            .unwrap();
        assert_eq!(refresh.typ, TokenKind::Refresh);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let svc = service();
        let pair = svc
            .issue_pair(Uuid::new_v4(), "admin", "Obuasi")
            .unwrap();

        let result = svc.validate_token(&pair.refresh_token, TokenKind::Access);
        assert!(matches!(
            result,
            Err(JwtError::WrongKind {
                expected: TokenKind::Access
            })
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let svc = service();
        let result = svc.validate_token("not-a-token", TokenKind::Access);
        assert!(matches!(result, Err(JwtError::Decoding(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let svc = service();
        let pair = svc.issue_pair(Uuid::new_v4(), "admin", "Wa").unwrap();

        let other = JwtService::new(JwtConfig {
            secret: "different-secret".to_string(),
            ..JwtConfig::default()
        });
        assert!(other
            .validate_token(&pair.access_token, TokenKind::Access)
            .is_err());
    }
}
