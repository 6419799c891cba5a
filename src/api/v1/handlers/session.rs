/*
 * Responsibility
 * - GET /session (verify stage のみ、アカウント解決なし)
 */
use axum::Json;

use crate::{api::v1::dto::session::SessionResponse, services::identity::VerifiedIdentity};

pub async fn current_session(identity: VerifiedIdentity) -> Json<SessionResponse> {
    Json(identity.into())
}
