use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::model::{AccountRecord, IntegrationProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SecretKind {
    AccessToken,
    RefreshToken,
    TokenExpiry,
}

impl SecretKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::RefreshToken => "refresh_token",
            Self::TokenExpiry => "token_expiry",
        }
    }
}

/// One hidden column, addressed as `<provider>.<kind>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SecretField {
    pub provider: IntegrationProvider,
    pub kind: SecretKind,
}

impl SecretField {
    pub const fn new(provider: IntegrationProvider, kind: SecretKind) -> Self {
        Self { provider, kind }
    }
}

impl fmt::Display for SecretField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.provider, self.kind.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldParseError {
    #[error("expected '<provider>.<field>', got '{0}'")]
    Malformed(String),
    #[error("unknown provider '{0}'")]
    UnknownProvider(String),
    #[error("unknown secret field '{0}'")]
    UnknownKind(String),
}

impl FromStr for SecretField {
    type Err = FieldParseError;

    /// Accepts `google.refresh_token` as well as `google.refreshToken`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches('+');
        let s = s.strip_prefix("integrations.").unwrap_or(s);
        let (provider, kind) = s
            .split_once('.')
            .ok_or_else(|| FieldParseError::Malformed(s.to_string()))?;

        let provider = provider
            .parse::<IntegrationProvider>()
            .map_err(|_| FieldParseError::UnknownProvider(provider.to_string()))?;

        let normalized: String = kind
            .chars()
            .filter(|c| *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        let kind = match normalized.as_str() {
            "accesstoken" => SecretKind::AccessToken,
            "refreshtoken" => SecretKind::RefreshToken,
            "tokenexpiry" => SecretKind::TokenExpiry,
            _ => return Err(FieldParseError::UnknownKind(kind.to_string())),
        };

        Ok(Self { provider, kind })
    }
}

/// The set of secret fields a read is allowed to return.
///
/// Default is empty: a read that does not ask for secrets gets none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelection(BTreeSet<SecretField>);

impl FieldSelection {
    pub fn none() -> Self {
        Self::default()
    }

    /// Credentials the request pipeline hands to handlers.
    pub fn integration_credentials() -> Self {
        use IntegrationProvider::*;
        use SecretKind::*;

        Self::none()
            .with(SecretField::new(Google, RefreshToken))
            .with(SecretField::new(Notion, AccessToken))
            .with(SecretField::new(Linkedin, AccessToken))
            .with(SecretField::new(Linkedin, TokenExpiry))
    }

    pub fn with(mut self, field: SecretField) -> Self {
        self.0.insert(field);
        self
    }

    pub fn contains(&self, provider: IntegrationProvider, kind: SecretKind) -> bool {
        self.0.contains(&SecretField::new(provider, kind))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SecretField> {
        self.0.iter()
    }

    /// Drops every secret in `record` that is not selected, then any
    /// integration left with nothing in it.
    pub fn mask(&self, mut record: AccountRecord) -> AccountRecord {
        for (provider, integration) in record.integrations.iter_mut() {
            let provider = *provider;
            if !self.contains(provider, SecretKind::AccessToken) {
                integration.access_token = None;
            }
            if !self.contains(provider, SecretKind::RefreshToken) {
                integration.refresh_token = None;
            }
            if !self.contains(provider, SecretKind::TokenExpiry) {
                integration.token_expiry = None;
            }
        }
        record.integrations.retain(|_, integration| !integration.is_empty());
        record
    }
}

impl FromStr for FieldSelection {
    type Err = FieldParseError;

    /// Comma or whitespace separated list of fields.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.trim().is_empty())
            .map(str::parse::<SecretField>)
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }
}

impl fmt::Display for FieldSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for field in &self.0 {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{field}")?;
            first = false;
        }
        Ok(())
    }
}
