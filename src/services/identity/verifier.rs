use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Key material used to check the provider's signature.
///
/// Not printable via Debug.
#[derive(Clone)]
pub enum KeyMaterial {
    RsaPem(String),
    EdPem(String),
    HmacSecret(String),
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::RsaPem(_) => "RsaPem",
            Self::EdPem(_) => "EdPem",
            Self::HmacSecret(_) => "HmacSecret",
        };
        f.debug_tuple(kind).field(&"<redacted>").finish()
    }
}

/// Verification options, built once at startup and never mutated.
///
/// All fields are optional; empty/`None` means the provider default applies.
#[derive(Debug, Clone, Default)]
pub struct VerifyOptions {
    /// Accepted `azp` values (caller origins). Empty = any.
    pub authorized_parties: Vec<String>,
    /// Replaces the provider's default key material.
    pub key_override: Option<KeyMaterial>,
    /// Required `iss` when set.
    pub issuer: Option<String>,
    pub leeway_seconds: u64,
}

impl VerifyOptions {
    /// Whether `azp` is acceptable. Tokens without `azp` pass.
    pub fn accepts_party(&self, azp: Option<&str>) -> bool {
        match azp {
            None => true,
            Some(_) if self.authorized_parties.is_empty() => true,
            Some(party) => self.authorized_parties.iter().any(|p| p == party),
        }
    }
}

/// The outcome of a successful verification.
///
/// `subject_id` is never empty: both constructors of this type enforce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    subject_id: String,
    pub session_id: Option<String>,
    pub authorized_party: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl VerifiedIdentity {
    pub fn new(subject_id: impl Into<String>) -> Result<Self, VerifyError> {
        let subject_id = subject_id.into();
        if subject_id.trim().is_empty() {
            return Err(VerifyError::EmptySubject);
        }

        Ok(Self {
            subject_id,
            session_id: None,
            authorized_party: None,
            expires_at: None,
        })
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("missing session credential")]
    MissingCredential,
    #[error("no key material configured")]
    MissingKey,
    #[error("session token rejected: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("empty 'sub' claim")]
    EmptySubject,
    #[error("unauthorized party: {0}")]
    UnauthorizedParty(String),
}

/// Verification routine owned by the identity provider.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait SessionVerifier: Send + Sync + 'static {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, VerifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_rejects_blank_subject() {
        assert!(matches!(
            VerifiedIdentity::new("   "),
            Err(VerifyError::EmptySubject)
        ));
        assert_eq!(VerifiedIdentity::new("user_123").unwrap().subject_id(), "user_123");
    }

    #[test]
    fn missing_azp_is_accepted_even_with_allowlist() {
        let opts = VerifyOptions {
            authorized_parties: vec!["https://app.example.com".into()],
            ..Default::default()
        };
        assert!(opts.accepts_party(None));
        assert!(opts.accepts_party(Some("https://app.example.com")));
        assert!(!opts.accepts_party(Some("https://evil.example.com")));
    }

    #[test]
    fn empty_allowlist_accepts_any_party() {
        assert!(VerifyOptions::default().accepts_party(Some("https://anything.test")));
    }

    #[test]
    fn key_material_debug_hides_value() {
        let key = KeyMaterial::HmacSecret("super-secret".into());
        let printed = format!("{key:?}");
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("HmacSecret"));
    }
}
