//! In-memory `AccountStore` for tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::repos::account::{AccountRecord, AccountStore, FieldSelection};
use crate::repos::error::{RepoError, RepoResult};

#[derive(Clone, Copy, Default)]
enum Mode {
    #[default]
    Serve,
    Fail,
    Stall,
}

#[derive(Clone, Default)]
pub struct MemoryAccountStore {
    records: Arc<HashMap<String, AccountRecord>>,
    queries: Arc<AtomicUsize>,
    mode: Mode,
}

impl MemoryAccountStore {
    pub fn with_records(records: impl IntoIterator<Item = AccountRecord>) -> Self {
        Self {
            records: Arc::new(
                records
                    .into_iter()
                    .map(|r| (r.subject_id.clone(), r))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    /// Every query fails as if the database were unreachable.
    pub fn unreachable() -> Self {
        Self {
            mode: Mode::Fail,
            ..Default::default()
        }
    }

    /// Every query hangs forever.
    pub fn stalled() -> Self {
        Self {
            mode: Mode::Stall,
            ..Default::default()
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_subject(
        &self,
        subject_id: &str,
        fields: &FieldSelection,
    ) -> RepoResult<Option<AccountRecord>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        // Yield so concurrent callers interleave.
        tokio::task::yield_now().await;

        match self.mode {
            Mode::Serve => {}
            Mode::Fail => return Err(RepoError::Db(sqlx::Error::PoolTimedOut)),
            Mode::Stall => std::future::pending::<()>().await,
        }

        // Same masking as the Postgres mapping, so entries left empty are dropped.
        Ok(self
            .records
            .get(subject_id)
            .cloned()
            .map(|record| fields.mask(record)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::repos::account::{Integration, IntegrationProvider, SecretToken};
    use crate::test_support::sample_account;

    #[tokio::test]
    async fn unlinked_integration_with_unselected_secrets_is_absent() {
        let mut record = sample_account("user_123");
        // Secrets left over from a past link, no current linkage.
        record.integrations.insert(
            IntegrationProvider::Notion,
            Integration {
                linked_at: None,
                access_token: None,
                refresh_token: Some(SecretToken::new("stale-refresh")),
                token_expiry: Some(Utc::now()),
            },
        );
        let store = MemoryAccountStore::with_records([record]);

        let found = store
            .find_by_subject("user_123", &FieldSelection::integration_credentials())
            .await
            .unwrap()
            .unwrap();

        assert!(found.integration(IntegrationProvider::Notion).is_none());
        assert!(found.integration(IntegrationProvider::Google).is_some());
    }
}
