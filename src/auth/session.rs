//! HS256 session tokens for the admin login.
//!
//! A session is valid while its token verifies, has not expired and its
//! session ID has not been revoked by a logout.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use parking_lot::RwLock;
use std::collections::HashMap;
use subtle::ConstantTimeEq;
use thiserror::Error;
use uuid::Uuid;

use super::Claims;

const ISSUER: &str = "siteadmin-backend";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid or expired token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Session has been logged out")]
    Revoked,

    #[error("Failed to sign session token: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

/// A freshly issued session token
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

pub struct SessionManager {
    username: String,
    password: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_seconds: u64,
    /// Revoked session IDs with their expiry; entries are dropped once the
    /// token would have expired anyway
    revoked: RwLock<HashMap<Uuid, i64>>,
}

impl SessionManager {
    pub fn new(username: &str, password: &str, secret: &str, ttl_seconds: u64) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
            revoked: RwLock::new(HashMap::new()),
        }
    }

    /// Compare credentials against the configured admin account in constant time
    pub fn check_credentials(&self, username: &str, password: &str) -> bool {
        let user_ok = username.as_bytes().ct_eq(self.username.as_bytes());
        let pass_ok = password.as_bytes().ct_eq(self.password.as_bytes());
        bool::from(user_ok & pass_ok)
    }

    pub fn issue(&self, username: &str) -> Result<IssuedSession, SessionError> {
        let now = Utc::now();
        let exp = now.timestamp() + self.ttl_seconds as i64;
        let claims = Claims {
            sub: username.to_string(),
            sid: Uuid::new_v4(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(SessionError::Signing)?;

        Ok(IssuedSession {
            token,
            session_id: claims.sid,
            expires_at: Utc.timestamp_opt(exp, 0).single().unwrap_or(now),
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)?.claims;

        if self.revoked.read().contains_key(&claims.sid) {
            return Err(SessionError::Revoked);
        }

        Ok(claims)
    }

    /// Log a session out
    pub fn revoke(&self, claims: &Claims) {
        let now = Utc::now().timestamp();
        let mut revoked = self.revoked.write();
        revoked.retain(|_, exp| *exp > now);
        revoked.insert(claims.sid, claims.exp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new("admin", "s3cret", "0123456789abcdef0123456789abcdef", 3600)
    }

    #[test]
    fn credentials_must_both_match() {
        let sessions = manager();
        assert!(sessions.check_credentials("admin", "s3cret"));
        assert!(!sessions.check_credentials("admin", "wrong"));
        assert!(!sessions.check_credentials("root", "s3cret"));
        assert!(!sessions.check_credentials("", ""));
    }

    #[test]
    fn issued_token_verifies_until_revoked() {
        let sessions = manager();
        let issued = sessions.issue("admin").unwrap();
        let claims = sessions.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.sid, issued.session_id);

        sessions.revoke(&claims);
        assert!(matches!(sessions.verify(&issued.token), Err(SessionError::Revoked)));
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let other = SessionManager::new("admin", "s3cret", "another-secret-another-secret-xx", 3600);
        let issued = other.issue("admin").unwrap();
        assert!(matches!(
            manager().verify(&issued.token),
            Err(SessionError::InvalidToken(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let sessions = SessionManager::new("admin", "s3cret", "0123456789abcdef0123456789abcdef", 0);
        let claims = Claims {
            sub: "admin".into(),
            sid: Uuid::new_v4(),
            iss: ISSUER.into(),
            iat: Utc::now().timestamp() - 120,
            exp: Utc::now().timestamp() - 60,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &sessions.encoding_key).unwrap();
        assert!(sessions.verify(&token).is_err());
    }
}
