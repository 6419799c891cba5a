/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - verifier: IdP のセッション検証, accounts: AccountStore, resolver_fields: 取得する secret field
 *   - lookup_timeout: AccountStore 1 回の読み取り上限 (超えたら 500)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)、リクエスト間で可変状態は持たない
 */
use std::sync::Arc;
use std::time::Duration;

use crate::repos::account::{AccountStore, FieldSelection};
use crate::services::identity::SessionVerifier;

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn SessionVerifier>,
    pub accounts: Arc<dyn AccountStore>,
    pub resolver_fields: Arc<FieldSelection>,
    pub lookup_timeout: Duration,
}

impl AppState {
    pub fn new(
        verifier: Arc<dyn SessionVerifier>,
        accounts: Arc<dyn AccountStore>,
        resolver_fields: FieldSelection,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            verifier,
            accounts,
            resolver_fields: Arc::new(resolver_fields),
            lookup_timeout,
        }
    }
}
