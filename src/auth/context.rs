use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use super::Claims;

/// Authenticated admin session extracted from the bearer token
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Admin username (from the `sub` claim)
    pub username: String,

    /// Session ID (from the `sid` claim)
    pub session_id: Uuid,

    pub expires_at: DateTime<Utc>,

    claims: Claims,
}

impl AuthContext {
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            username: claims.sub.clone(),
            session_id: claims.sid,
            expires_at: Utc
                .timestamp_opt(claims.exp, 0)
                .single()
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            claims,
        }
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}
