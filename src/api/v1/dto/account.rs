/*
 * Responsibility
 * - GET /me の response DTO
 * - token の値は絶対に含めない (連携状態のみ返す)
 */
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::repos::account::{AccountRecord, IntegrationProvider};

#[derive(Debug, Serialize)]
pub struct IntegrationStatus {
    pub provider: IntegrationProvider,
    pub linked: bool,
    pub linked_at: Option<DateTime<Utc>>,
    pub has_credentials: bool,
    // Only present when the resolver selected the expiry field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub integrations: Vec<IntegrationStatus>,
}

impl From<&AccountRecord> for MeResponse {
    fn from(account: &AccountRecord) -> Self {
        let integrations = IntegrationProvider::ALL
            .into_iter()
            .map(|provider| match account.integration(provider) {
                Some(i) => IntegrationStatus {
                    provider,
                    linked: true,
                    linked_at: i.linked_at,
                    has_credentials: i.has_credentials(),
                    token_expires_at: i.token_expiry,
                },
                None => IntegrationStatus {
                    provider,
                    linked: false,
                    linked_at: None,
                    has_credentials: false,
                    token_expires_at: None,
                },
            })
            .collect();

        Self {
            id: account.account_id,
            email: account.email.clone(),
            display_name: account.display_name.clone(),
            image_url: account.image_url.clone(),
            created_at: account.created_at,
            integrations,
        }
    }
}
