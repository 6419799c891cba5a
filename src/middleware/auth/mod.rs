/*!
 * Request authentication pipeline
 *
 * Responsibility:
 * - verify: session credential を IdP で検証し VerifiedIdentity を extensions に入れる
 * - resolve: VerifiedIdentity から AccountRecord (secret field 付き) を引き CurrentAccount を入れる
 * - apply: verify → resolve の固定順 (どちらかが失敗したら handler に到達しない)
 *
 * Each stage is a plain async fn returning `Result` (continue / stop) with a
 * thin axum adapter on top.
 */

mod rejection;
pub mod resolve;
pub mod verify;

use axum::Router;

use crate::state::AppState;

pub use rejection::AuthRejection;

/// Apply verifier then resolver to every route already on `router`.
///
/// 例：
/// ```ignore
/// let me = Router::new().route("/me", get(me));
/// let me = middleware::auth::apply(me, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // The last layer added runs first, so resolve goes on before verify.
    let router = resolve::apply(router, state.clone());
    verify::apply(router, state)
}
