/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, CORS 許可、IdP 検証オプションなど)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::repos::account::FieldSelection;
use crate::services::identity::{KeyMaterial, VerifyOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Which algorithm the identity provider signs session tokens with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
    Rs256,
    EdDsa,
    Hs256,
}

impl FromStr for KeyAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RS256" => Ok(Self::Rs256),
            "EDDSA" => Ok(Self::EdDsa),
            "HS256" => Ok(Self::Hs256),
            _ => Err(ConfigError::Invalid("IDP_KEY_ALGORITHM")),
        }
    }
}

impl KeyAlgorithm {
    fn material(self, raw: String) -> KeyMaterial {
        match self {
            Self::Rs256 => KeyMaterial::RsaPem(raw),
            Self::EdDsa => KeyMaterial::EdPem(raw),
            Self::Hs256 => KeyMaterial::HmacSecret(raw),
        }
    }
}

pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,
    pub request_timeout: Duration,
    /// Upper bound for one account store read; always below `request_timeout`.
    pub lookup_timeout: Duration,

    /// Provider default key. `None` only when an override is configured.
    pub idp_default_key: Option<KeyMaterial>,
    pub verify_options: VerifyOptions,

    pub resolver_fields: FieldSelection,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let database_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(10);

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = split_list(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let request_timeout = Duration::from_secs(
            std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        );

        let lookup_timeout = parse_lookup_timeout(
            std::env::var("ACCOUNT_LOOKUP_TIMEOUT_MS").ok().as_deref(),
            request_timeout,
        )?;

        let algorithm = match std::env::var("IDP_KEY_ALGORITHM") {
            Ok(v) => v.parse::<KeyAlgorithm>()?,
            Err(_) => KeyAlgorithm::Rs256,
        };

        let idp_default_key = read_key("IDP_KEY").map(|raw| algorithm.material(raw));
        let key_override = read_key("AUTH_KEY_OVERRIDE").map(|raw| algorithm.material(raw));

        if idp_default_key.is_none() && key_override.is_none() {
            return Err(ConfigError::Missing("IDP_KEY"));
        }

        let authorized_parties =
            parse_authorized_parties(&std::env::var("AUTH_AUTHORIZED_PARTIES").unwrap_or_default())?;

        let issuer = std::env::var("AUTH_ISSUER")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let leeway_seconds = std::env::var("AUTH_LEEWAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(5);

        let resolver_fields = match std::env::var("AUTH_SECRET_FIELDS") {
            Ok(v) if !v.trim().is_empty() => v
                .parse::<FieldSelection>()
                .map_err(|_| ConfigError::Invalid("AUTH_SECRET_FIELDS"))?,
            _ => FieldSelection::integration_credentials(),
        };

        Ok(Self {
            addr,
            database_url,
            database_max_connections,
            app_env,
            cors_allowed_origins,
            request_timeout,
            lookup_timeout,
            idp_default_key,
            verify_options: VerifyOptions {
                authorized_parties,
                key_override,
                issuer,
                leeway_seconds,
            },
            resolver_fields,
        })
    }
}

// PEM in a single-line env var comes with literal "\n".
fn read_key(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.replace("\\n", "\n"))
        .filter(|v| !v.trim().is_empty())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

// The lookup has to give up before the request-level timeout fires.
fn parse_lookup_timeout(raw: Option<&str>, request_timeout: Duration) -> Result<Duration, ConfigError> {
    let timeout = match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(v) => v
            .parse::<u64>()
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .ok_or(ConfigError::Invalid("ACCOUNT_LOOKUP_TIMEOUT_MS"))?,
        None => DEFAULT_LOOKUP_TIMEOUT.min(request_timeout / 2),
    };

    if timeout >= request_timeout {
        return Err(ConfigError::Invalid("ACCOUNT_LOOKUP_TIMEOUT_MS"));
    }
    Ok(timeout)
}

/// Authorized parties are caller origins (`scheme://host[:port]`), compared
/// exactly against the token's `azp` claim.
fn parse_authorized_parties(raw: &str) -> Result<Vec<String>, ConfigError> {
    split_list(raw)
        .into_iter()
        .map(|party| {
            let url = Url::parse(&party).map_err(|_| ConfigError::Invalid("AUTH_AUTHORIZED_PARTIES"))?;
            if url.host_str().is_none() {
                return Err(ConfigError::Invalid("AUTH_AUTHORIZED_PARTIES"));
            }
            Ok(url.origin().ascii_serialization())
        })
        .collect()
}
