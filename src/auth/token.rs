// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

//! Session token issuance and verification.
//!
//! Tokens are stateless HS256 JWTs valid for 24 hours. Verification is
//! signature + time-window only, with zero clock leeway; the allowed
//! algorithm list contains exactly HS256, so unsigned (`alg: none`) and
//! foreign-algorithm tokens are rejected outright.

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use uuid::Uuid;

use super::claims::{AuthenticatedUser, Claims};
use super::error::AuthError;

/// Token validity window in seconds (24 hours).
const TOKEN_VALIDITY_SECS: i64 = 24 * 60 * 60;

/// The signing secret was empty. The process must refuse to start
/// rather than sign tokens with a guessable key.
#[derive(Debug, Error)]
#[error("token signing secret must not be empty")]
pub struct EmptySecret;

/// Issues and verifies vault session tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material stays out of debug output.
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str) -> Result<Self, EmptySecret> {
        if secret.is_empty() {
            return Err(EmptySecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_nbf = true;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Sign a fresh 24-hour token for the given account.
    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now,
            nbf: now,
            exp: now + TOKEN_VALIDITY_SECS,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| AuthError::TokenCreation)
    }

    /// Verify a token and return the identity it carries.
    ///
    /// Expiry is the only failure reported distinctly; everything else
    /// (malformed, bad signature, wrong algorithm) collapses to
    /// `InvalidToken` so callers leak nothing about why.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            }
        })?;
        Ok(data.claims.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-which-is-long-enough";

    fn service() -> TokenService {
        TokenService::new(SECRET).unwrap()
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(TokenService::new("").is_err());
        assert!(TokenService::new("s").is_ok());
    }

    #[test]
    fn issue_then_verify_roundtrips_identity() {
        let tokens = service();
        let user_id = Uuid::new_v4();

        let token = tokens.issue(user_id, "alice@example.com").unwrap();
        let user = tokens.verify(&token).unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.email, "alice@example.com");
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let tokens = service();
        let past = Utc::now().timestamp() - 2 * TOKEN_VALIDITY_SECS;
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            iat: past,
            nbf: past,
            exp: past + TOKEN_VALIDITY_SECS,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(tokens.verify(&token), Err(AuthError::ExpiredToken));
    }

    #[test]
    fn wrong_secret_is_invalid_token() {
        let tokens = service();
        let other = TokenService::new("a-different-secret").unwrap();

        let token = other.issue(Uuid::new_v4(), "alice@example.com").unwrap();
        assert_eq!(tokens.verify(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn garbage_tokens_are_invalid() {
        let tokens = service();
        assert_eq!(tokens.verify(""), Err(AuthError::InvalidToken));
        assert_eq!(tokens.verify("not.a.jwt"), Err(AuthError::InvalidToken));
        assert_eq!(tokens.verify("onlyonesegment"), Err(AuthError::InvalidToken));
    }

    #[test]
    fn unsigned_none_algorithm_token_is_rejected() {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

        let tokens = service();
        let future = Utc::now().timestamp() + 3600;
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(
            format!(
                r#"{{"sub":"{}","email":"a@example.com","iat":0,"nbf":0,"exp":{future}}}"#,
                Uuid::new_v4()
            )
            .as_bytes(),
        );
        let forged = format!("{header}.{claims}.");

        assert_eq!(tokens.verify(&forged), Err(AuthError::InvalidToken));
    }
}
