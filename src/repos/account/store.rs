use async_trait::async_trait;

use crate::repos::account::{AccountRecord, FieldSelection};
use crate::repos::error::RepoResult;

/// Read contract for account records.
///
/// - `Ok(Some(_))`: found; secrets outside `fields` are `None`
/// - `Ok(None)`: no account for this subject (e.g. provisioning not done yet)
/// - `Err(_)`: backend failure
///
/// Implementations must be cheap to share (`Arc<dyn AccountStore>`) and are
/// read concurrently without locking.
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    async fn find_by_subject(
        &self,
        subject_id: &str,
        fields: &FieldSelection,
    ) -> RepoResult<Option<AccountRecord>>;
}
