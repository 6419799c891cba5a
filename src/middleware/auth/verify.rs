//! Stage 1: session credential → `VerifiedIdentity` in extensions.
//!
//! Verification itself belongs to the identity provider (`SessionVerifier`);
//! this stage only finds the credential, hands it over, and records the result.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::error::AppError;
use crate::middleware::auth::AuthRejection;
use crate::services::identity::{SessionVerifier, VerifiedIdentity, VerifyError};
use crate::state::AppState;

/// Cookie the provider's browser SDK stores the session token in.
pub const SESSION_COOKIE: &str = "__session";

/// Apply the verifier alone (identity check, no account lookup).
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, verify_middleware))
}

/// `Authorization: Bearer <token>` wins; otherwise the `__session` cookie.
pub fn extract_credential(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().trim().to_string())
        .filter(|token| !token.is_empty())
}

pub async fn verify_stage(
    verifier: &dyn SessionVerifier,
    headers: &HeaderMap,
) -> Result<VerifiedIdentity, AuthRejection> {
    let Some(token) = extract_credential(headers) else {
        tracing::warn!(error = %VerifyError::MissingCredential, "session verification failed");
        return Err(VerifyError::MissingCredential.into());
    };

    match verifier.verify(&token).await {
        Ok(identity) => Ok(identity),
        Err(err) => {
            tracing::warn!(error = %err, "session verification failed");
            Err(err.into())
        }
    }
}

async fn verify_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let identity = verify_stage(state.verifier.as_ref(), req.headers()).await?;

    // middleware → extractor / 次の stage への受け渡し
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
