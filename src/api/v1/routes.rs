/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 認証 pipeline の掛け方をここで決める
 *   - /health: なし
 *   - /session: verify のみ
 *   - /me: verify → resolve
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, me::me, session::current_session};
use crate::middleware::auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/health", get(health));

    let verified = auth::verify::apply(
        Router::new().route("/session", get(current_session)),
        state.clone(),
    );

    let resolved = auth::apply(Router::new().route("/me", get(me)), state);

    public.merge(verified).merge(resolved)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::repos::account::memory::MemoryAccountStore;
    use crate::test_support::{TokenSpec, mint, sample_account, test_state};

    fn app(store: &MemoryAccountStore) -> Router {
        let state = test_state(store.clone());
        routes(state.clone()).with_state(state)
    }

    async fn get_json(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut req = Request::builder().uri(uri);
        if let Some(token) = token {
            req = req.header("authorization", format!("Bearer {token}"));
        }
        let res = app
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn health_is_public() {
        let store = MemoryAccountStore::default();
        let (status, json) = get_json(app(&store), "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn session_needs_only_verification() {
        let store = MemoryAccountStore::default();
        let token = mint(TokenSpec::valid("user_999").sid("sess_42"));

        let (status, json) = get_json(app(&store), "/session", Some(&token)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["subject_id"], "user_999");
        assert_eq!(json["session_id"], "sess_42");
        assert_eq!(store.query_count(), 0);
    }

    #[tokio::test]
    async fn session_rejects_missing_credential() {
        let store = MemoryAccountStore::default();
        let (status, _) = get_json(app(&store), "/session", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn me_reports_linkage_without_token_values() {
        let store = MemoryAccountStore::with_records([sample_account("user_123")]);
        let token = mint(TokenSpec::valid("user_123"));

        let (status, json) = get_json(app(&store), "/me", Some(&token)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["email"], "ada@example.com");

        let integrations = json["integrations"].as_array().unwrap();
        assert_eq!(integrations.len(), 3);
        let linkedin = integrations
            .iter()
            .find(|i| i["provider"] == "linkedin")
            .unwrap();
        assert_eq!(linkedin["linked"], true);
        assert_eq!(linkedin["has_credentials"], true);
        assert!(linkedin.get("token_expires_at").is_some());

        let google = integrations.iter().find(|i| i["provider"] == "google").unwrap();
        // google.token_expiry is stored but not selected by the resolver.
        assert!(google.get("token_expires_at").is_none());

        let raw = json.to_string();
        for secret in ["google-access", "google-refresh", "notion-access", "linkedin-access"] {
            assert!(!raw.contains(secret), "leaked {secret}");
        }
    }

    #[tokio::test]
    async fn me_for_unprovisioned_subject_is_404() {
        let store = MemoryAccountStore::default();
        let token = mint(TokenSpec::valid("user_999"));

        let (status, json) = get_json(app(&store), "/me", Some(&token)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "PROFILE_NOT_FOUND");
        assert_eq!(store.query_count(), 1);
    }
}
