//! Shared fixtures for unit tests: token minting, account records, app state,
//! and log capture.

use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Map, Value, json};
use tracing_subscriber::fmt::MakeWriter;
use uuid::Uuid;

use crate::repos::account::{
    AccountRecord, FieldSelection, Integration, IntegrationProvider, SecretToken,
    memory::MemoryAccountStore,
};
use crate::services::identity::{JwtSessionVerifier, KeyMaterial, VerifyOptions};
use crate::state::AppState;

pub const TEST_SECRET: &str = "test-session-signing-secret";

/// Claims for a test session token.
pub struct TokenSpec {
    claims: Map<String, Value>,
}

impl TokenSpec {
    pub fn valid(sub: &str) -> Self {
        Self::expiring(sub, Duration::minutes(10))
    }

    pub fn expired(sub: &str) -> Self {
        Self::expiring(sub, Duration::hours(-1))
    }

    /// `ttl` may be negative for an already-expired token.
    pub fn expiring(sub: &str, ttl: Duration) -> Self {
        let now = Utc::now();
        let mut claims = Map::new();
        claims.insert("sub".into(), json!(sub));
        claims.insert("iat".into(), json!(now.timestamp()));
        claims.insert("exp".into(), json!((now + ttl).timestamp()));
        Self { claims }
    }

    pub fn azp(self, azp: &str) -> Self {
        self.claim("azp", azp)
    }

    pub fn iss(self, iss: &str) -> Self {
        self.claim("iss", iss)
    }

    pub fn sid(self, sid: &str) -> Self {
        self.claim("sid", sid)
    }

    /// Not valid before `now + offset`.
    pub fn not_before(mut self, offset: Duration) -> Self {
        self.claims
            .insert("nbf".into(), json!((Utc::now() + offset).timestamp()));
        self
    }

    fn claim(mut self, key: &str, value: &str) -> Self {
        self.claims.insert(key.into(), json!(value));
        self
    }
}

/// HS256 token signed with `TEST_SECRET`.
pub fn mint(token: TokenSpec) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &Value::Object(token.claims),
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn hmac_verifier(options: VerifyOptions) -> JwtSessionVerifier {
    JwtSessionVerifier::new(Some(&KeyMaterial::HmacSecret(TEST_SECRET.into())), options).unwrap()
}

fn linked(access: Option<&str>, refresh: Option<&str>, with_expiry: bool) -> Integration {
    Integration {
        linked_at: Some(Utc::now() - Duration::days(3)),
        access_token: access.map(SecretToken::new),
        refresh_token: refresh.map(SecretToken::new),
        token_expiry: with_expiry.then(|| Utc::now() + Duration::hours(1)),
    }
}

/// An account with every secret populated for all three providers.
pub fn sample_account(subject_id: &str) -> AccountRecord {
    AccountRecord {
        account_id: Uuid::new_v4(),
        subject_id: subject_id.to_string(),
        email: Some("ada@example.com".into()),
        display_name: Some("Ada".into()),
        image_url: None,
        created_at: Utc::now() - Duration::days(30),
        integrations: BTreeMap::from([
            (
                IntegrationProvider::Google,
                linked(Some("google-access"), Some("google-refresh"), true),
            ),
            (
                IntegrationProvider::Notion,
                linked(Some("notion-access"), Some("notion-refresh"), false),
            ),
            (
                IntegrationProvider::Linkedin,
                linked(Some("linkedin-access"), Some("linkedin-refresh"), true),
            ),
        ]),
    }
}

pub fn test_state(store: MemoryAccountStore) -> AppState {
    AppState::new(
        Arc::new(hmac_verifier(VerifyOptions::default())),
        Arc::new(store),
        FieldSelection::integration_credentials(),
        std::time::Duration::from_secs(5),
    )
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Captures logs on the current thread until the guard drops.
///
/// `#[tokio::test]` runs on a current-thread runtime, so spawned tasks are
/// captured too.
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
