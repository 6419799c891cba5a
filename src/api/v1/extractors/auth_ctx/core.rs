use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::identity::VerifiedIdentity;

use super::CurrentAccount;

// middleware が extensions に insert 済みである前提。
// 見つからない場合は 401 (認証がかかっていない・ミドルウェア未設定)。

impl<S> FromRequestParts<S> for VerifiedIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VerifiedIdentity>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

impl<S> FromRequestParts<S> for CurrentAccount
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentAccount>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
