/*
 * Responsibility
 * - GET /me (verify → resolve の後)
 * - CurrentAccount からプロフィールと連携状態を返す
 */
use axum::Json;

use crate::api::v1::{dto::account::MeResponse, extractors::CurrentAccount};

pub async fn me(CurrentAccount(account): CurrentAccount) -> Json<MeResponse> {
    Json(MeResponse::from(account.as_ref()))
}
