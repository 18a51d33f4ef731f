//! Access token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use sam_core::config::AuthConfig;
use sam_core::error::AppError;

use super::claims::Claims;

/// Validates HS256 access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Check signature and expiry, and return the claims.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::authentication("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::authentication("Invalid token signature")
                }
                _ => AppError::authentication("Could not validate credentials"),
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sam_core::error::ErrorKind;
    use sam_core::types::UserId;
    use sam_entity::user::{AccountStatus, Permission, User};

    use super::*;
    use crate::jwt::encoder::JwtEncoder;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            ..AuthConfig::default()
        }
    }

    fn user() -> User {
        User {
            user_id: UserId::new(3),
            employee_id: "E3".to_string(),
            permissions: Permission::Admin,
            status: AccountStatus::Active,
            hashed_password: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_then_decode() {
        let cfg = config("secret-one");
        let issued = JwtEncoder::new(&cfg).issue_access_token(&user()).unwrap();
        let claims = JwtDecoder::new(&cfg).decode_access_token(&issued.token).unwrap();

        assert_eq!(claims.user_id().unwrap(), UserId::new(3));
        assert_eq!(claims.permissions, Permission::Admin);
        assert_eq!(claims.expires_at().timestamp(), issued.expires_at.timestamp());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issued = JwtEncoder::new(&config("secret-one"))
            .issue_access_token(&user())
            .unwrap();
        let err = JwtDecoder::new(&config("secret-two"))
            .decode_access_token(&issued.token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = JwtDecoder::new(&config("s"))
            .decode_access_token("not.a.jwt")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }
}
