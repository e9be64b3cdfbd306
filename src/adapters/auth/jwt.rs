//! HS256 JWT session validator.
//!
//! Tokens carry `sub`, `role`, optional `email`/`name`, and `exp`. When an
//! issuer is configured the `iss` claim must match it.

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, Role, UserId};
use crate::ports::SessionValidator;

/// Claims carried by access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    pub exp: u64,
}

pub struct JwtSessionValidator {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    validation: Validation,
    issuer: Option<String>,
}

impl JwtSessionValidator {
    pub fn new(secret: &SecretString, issuer: Option<String>, leeway_secs: u64) -> Self {
        let secret = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_secs;
        validation.validate_aud = false;
        if let Some(iss) = &issuer {
            validation.set_issuer(&[iss.as_str()]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            encoding_key: EncodingKey::from_secret(secret),
            validation,
            issuer,
        }
    }

    /// Signs a token for the given claims. The configured issuer is applied
    /// when the claims carry none.
    pub fn issue(&self, mut claims: Claims) -> Result<String, AuthError> {
        if claims.iss.is_none() {
            claims.iss = self.issuer.clone();
        }
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::ServiceUnavailable(format!("Failed to sign token: {}", e)))
    }

    fn to_user(claims: Claims) -> Result<AuthenticatedUser, AuthError> {
        let id = UserId::new(claims.sub).map_err(|_| AuthError::InvalidToken)?;
        let mut user = AuthenticatedUser::new(id, claims.role);
        user.email = claims.email;
        user.display_name = claims.name;
        Ok(user)
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => {
                    tracing::debug!(error = %e, "Rejected access token");
                    AuthError::InvalidToken
                }
            }
        })?;
        Self::to_user(data.claims)
    }
}
