//! Stage 2: `VerifiedIdentity` → `CurrentAccount` in extensions.
//!
//! The only place allowed to ask the store for secret integration fields.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::CurrentAccount;
use crate::error::AppError;
use crate::middleware::auth::AuthRejection;
use crate::repos::account::{AccountRecord, AccountStore, FieldSelection};
use crate::repos::error::RepoError;
use crate::services::identity::VerifiedIdentity;
use crate::state::AppState;

/// Apply the resolver alone. Something upstream must already have inserted a
/// `VerifiedIdentity`; otherwise every request gets 401.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, resolve_middleware))
}

/// One store read, no writes. A read that outlives `lookup_timeout` counts as
/// a store failure.
pub async fn resolve_stage(
    store: &dyn AccountStore,
    fields: &FieldSelection,
    lookup_timeout: Duration,
    identity: Option<&VerifiedIdentity>,
) -> Result<AccountRecord, AuthRejection> {
    let Some(identity) = identity.filter(|id| !id.subject_id().is_empty()) else {
        tracing::error!("account resolution reached without a verified identity; check middleware order");
        return Err(AuthRejection::PipelineInvariant);
    };
    let subject_id = identity.subject_id();

    let lookup = tokio::time::timeout(lookup_timeout, store.find_by_subject(subject_id, fields))
        .await
        .unwrap_or_else(|_| Err(RepoError::Timeout(lookup_timeout)));

    match lookup {
        Ok(Some(record)) => Ok(record),
        Ok(None) => {
            tracing::warn!(
                subject_id = %subject_id,
                "verified subject has no account record; setup may be incomplete"
            );
            Err(AuthRejection::ProfileNotFound {
                subject_id: subject_id.to_string(),
            })
        }
        Err(err) => {
            tracing::error!(error = %err, subject_id = %subject_id, "failed to load account");
            Err(err.into())
        }
    }
}

async fn resolve_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let identity = req.extensions().get::<VerifiedIdentity>().cloned();
    let record = resolve_stage(
        state.accounts.as_ref(),
        &state.resolver_fields,
        state.lookup_timeout,
        identity.as_ref(),
    )
    .await?;

    req.extensions_mut().insert(CurrentAccount(Arc::new(record)));

    Ok(next.run(req).await)
}
