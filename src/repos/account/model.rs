use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Third-party services an account can link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationProvider {
    Google,
    Notion,
    Linkedin,
}

impl IntegrationProvider {
    pub const ALL: [IntegrationProvider; 3] = [Self::Google, Self::Notion, Self::Linkedin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Notion => "notion",
            Self::Linkedin => "linkedin",
        }
    }
}

impl fmt::Display for IntegrationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntegrationProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "notion" => Ok(Self::Notion),
            "linkedin" => Ok(Self::Linkedin),
            _ => Err(()),
        }
    }
}

/// An integration credential (access/refresh token).
///
/// Never printed and never serialized; read it with `expose()`.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretToken(String);

impl SecretToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretToken(<redacted>)")
    }
}

/// One linked integration. `linked_at` is public; the rest is secret and only
/// populated when selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Integration {
    pub linked_at: Option<DateTime<Utc>>,
    pub access_token: Option<SecretToken>,
    pub refresh_token: Option<SecretToken>,
    pub token_expiry: Option<DateTime<Utc>>,
}

impl Integration {
    pub fn has_credentials(&self) -> bool {
        self.access_token.is_some() || self.refresh_token.is_some()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.linked_at.is_none()
            && self.access_token.is_none()
            && self.refresh_token.is_none()
            && self.token_expiry.is_none()
    }
}

/// Internal account, keyed by the identity provider's subject id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub account_id: Uuid,
    pub subject_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub integrations: BTreeMap<IntegrationProvider, Integration>,
}

impl AccountRecord {
    pub fn integration(&self, provider: IntegrationProvider) -> Option<&Integration> {
        self.integrations.get(&provider)
    }

    /// Inserts `integration` unless it carries nothing at all.
    pub(super) fn put_integration(&mut self, provider: IntegrationProvider, integration: Integration) {
        if !integration.is_empty() {
            self.integrations.insert(provider, integration);
        }
    }
}
