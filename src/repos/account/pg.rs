/*
 * Responsibility
 * - accounts テーブル向け SQLx 操作 (read-only)
 * - 未選択の secret カラムは SQL 側で NULL にして返す (CASE WHEN $n THEN col END)
 * - 行 → AccountRecord 変換時にも FieldSelection で再度マスクする
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::account::{
    AccountRecord, AccountStore, FieldSelection, Integration, IntegrationProvider, SecretKind,
    SecretToken,
};
use crate::repos::error::RepoResult;

#[derive(FromRow)]
struct AccountRow {
    #[sqlx(rename = "accountId")]
    account_id: Uuid,
    #[sqlx(rename = "subjectId")]
    subject_id: String,
    email: Option<String>,
    #[sqlx(rename = "displayName")]
    display_name: Option<String>,
    #[sqlx(rename = "imageUrl")]
    image_url: Option<String>,
    #[sqlx(rename = "createdAt")]
    created_at: DateTime<Utc>,

    #[sqlx(rename = "googleLinkedAt")]
    google_linked_at: Option<DateTime<Utc>>,
    #[sqlx(rename = "googleAccessToken")]
    google_access_token: Option<String>,
    #[sqlx(rename = "googleRefreshToken")]
    google_refresh_token: Option<String>,
    #[sqlx(rename = "googleTokenExpiry")]
    google_token_expiry: Option<DateTime<Utc>>,

    #[sqlx(rename = "notionLinkedAt")]
    notion_linked_at: Option<DateTime<Utc>>,
    #[sqlx(rename = "notionAccessToken")]
    notion_access_token: Option<String>,
    #[sqlx(rename = "notionRefreshToken")]
    notion_refresh_token: Option<String>,
    #[sqlx(rename = "notionTokenExpiry")]
    notion_token_expiry: Option<DateTime<Utc>>,

    #[sqlx(rename = "linkedinLinkedAt")]
    linkedin_linked_at: Option<DateTime<Utc>>,
    #[sqlx(rename = "linkedinAccessToken")]
    linkedin_access_token: Option<String>,
    #[sqlx(rename = "linkedinRefreshToken")]
    linkedin_refresh_token: Option<String>,
    #[sqlx(rename = "linkedinTokenExpiry")]
    linkedin_token_expiry: Option<DateTime<Utc>>,
}

fn integration(
    linked_at: Option<DateTime<Utc>>,
    access_token: Option<String>,
    refresh_token: Option<String>,
    token_expiry: Option<DateTime<Utc>>,
) -> Integration {
    Integration {
        linked_at,
        access_token: access_token.map(SecretToken::new),
        refresh_token: refresh_token.map(SecretToken::new),
        token_expiry,
    }
}

impl AccountRow {
    fn into_record(self, fields: &FieldSelection) -> AccountRecord {
        let mut record = AccountRecord {
            account_id: self.account_id,
            subject_id: self.subject_id,
            email: self.email,
            display_name: self.display_name,
            image_url: self.image_url,
            created_at: self.created_at,
            integrations: Default::default(),
        };

        record.put_integration(
            IntegrationProvider::Google,
            integration(
                self.google_linked_at,
                self.google_access_token,
                self.google_refresh_token,
                self.google_token_expiry,
            ),
        );
        record.put_integration(
            IntegrationProvider::Notion,
            integration(
                self.notion_linked_at,
                self.notion_access_token,
                self.notion_refresh_token,
                self.notion_token_expiry,
            ),
        );
        record.put_integration(
            IntegrationProvider::Linkedin,
            integration(
                self.linkedin_linked_at,
                self.linkedin_access_token,
                self.linkedin_refresh_token,
                self.linkedin_token_expiry,
            ),
        );

        fields.mask(record)
    }
}

// $2..$10 gate the secret columns, in this order.
const SECRET_BINDS: [(IntegrationProvider, SecretKind); 9] = [
    (IntegrationProvider::Google, SecretKind::AccessToken),
    (IntegrationProvider::Google, SecretKind::RefreshToken),
    (IntegrationProvider::Google, SecretKind::TokenExpiry),
    (IntegrationProvider::Notion, SecretKind::AccessToken),
    (IntegrationProvider::Notion, SecretKind::RefreshToken),
    (IntegrationProvider::Notion, SecretKind::TokenExpiry),
    (IntegrationProvider::Linkedin, SecretKind::AccessToken),
    (IntegrationProvider::Linkedin, SecretKind::RefreshToken),
    (IntegrationProvider::Linkedin, SecretKind::TokenExpiry),
];

const FIND_BY_SUBJECT: &str = r#"
    SELECT
        "accountId", "subjectId", email, "displayName", "imageUrl", "createdAt",
        "googleLinkedAt",
        CASE WHEN $2 THEN "googleAccessToken" END AS "googleAccessToken",
        CASE WHEN $3 THEN "googleRefreshToken" END AS "googleRefreshToken",
        CASE WHEN $4 THEN "googleTokenExpiry" END AS "googleTokenExpiry",
        "notionLinkedAt",
        CASE WHEN $5 THEN "notionAccessToken" END AS "notionAccessToken",
        CASE WHEN $6 THEN "notionRefreshToken" END AS "notionRefreshToken",
        CASE WHEN $7 THEN "notionTokenExpiry" END AS "notionTokenExpiry",
        "linkedinLinkedAt",
        CASE WHEN $8 THEN "linkedinAccessToken" END AS "linkedinAccessToken",
        CASE WHEN $9 THEN "linkedinRefreshToken" END AS "linkedinRefreshToken",
        CASE WHEN $10 THEN "linkedinTokenExpiry" END AS "linkedinTokenExpiry"
    FROM accounts
    WHERE "subjectId" = $1
"#;

/// Postgres-backed account store. Shares the pool read-only.
#[derive(Clone, Debug)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_subject(
        &self,
        subject_id: &str,
        fields: &FieldSelection,
    ) -> RepoResult<Option<AccountRecord>> {
        let mut query = sqlx::query_as::<_, AccountRow>(FIND_BY_SUBJECT).bind(subject_id);
        for (provider, kind) in SECRET_BINDS {
            query = query.bind(fields.contains(provider, kind));
        }

        let row = query.fetch_optional(&self.pool).await?;

        Ok(row.map(|r| r.into_record(fields)))
    }
}
