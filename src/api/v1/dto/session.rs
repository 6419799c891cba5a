/*
 * Responsibility
 * - GET /session の response DTO (verify stage のみ)
 */
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::identity::VerifiedIdentity;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub subject_id: String,
    pub session_id: Option<String>,
    pub authorized_party: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<VerifiedIdentity> for SessionResponse {
    fn from(identity: VerifiedIdentity) -> Self {
        Self {
            subject_id: identity.subject_id().to_string(),
            session_id: identity.session_id,
            authorized_party: identity.authorized_party,
            expires_at: identity.expires_at,
        }
    }
}
