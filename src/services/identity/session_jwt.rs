use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::services::identity::verifier::{
    KeyMaterial, SessionVerifier, VerifiedIdentity, VerifyError, VerifyOptions,
};

/// Session token claims as issued by the identity provider.
///
/// Only the claims we act on are modelled. `iss`/`nbf` are checked by
/// `Validation` straight from the payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionClaims {
    #[serde(default)]
    pub sub: String,
    pub exp: u64,

    #[serde(default)]
    pub azp: Option<String>,
    #[serde(default)]
    pub sid: Option<String>,
}

/// Networkless session-token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtSessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    options: VerifyOptions,
}

impl std::fmt::Debug for JwtSessionVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtSessionVerifier")
            .field("validation", &self.validation)
            .field("authorized_parties", &self.options.authorized_parties)
            .finish()
    }
}

impl JwtSessionVerifier {
    /// `options.key_override` wins over `default_key` when both are present.
    pub fn new(
        default_key: Option<&KeyMaterial>,
        options: VerifyOptions,
    ) -> Result<Self, VerifyError> {
        let key = options
            .key_override
            .as_ref()
            .or(default_key)
            .ok_or(VerifyError::MissingKey)?;

        let (decoding_key, algorithm) = match key {
            KeyMaterial::RsaPem(pem) => (DecodingKey::from_rsa_pem(pem.as_bytes())?, Algorithm::RS256),
            KeyMaterial::EdPem(pem) => (DecodingKey::from_ed_pem(pem.as_bytes())?, Algorithm::EdDSA),
            KeyMaterial::HmacSecret(secret) => {
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
        };

        let mut validation = Validation::new(algorithm);
        // Session tokens carry `azp`, not `aud`; parties are checked below.
        validation.validate_aud = false;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = options.leeway_seconds;
        if let Some(issuer) = &options.issuer {
            validation.set_issuer(&[issuer]);
        }

        Ok(Self {
            decoding_key,
            validation,
            options,
        })
    }

    pub fn decode(&self, token: &str) -> Result<SessionClaims, VerifyError> {
        let data =
            jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }
}

#[async_trait]
impl SessionVerifier for JwtSessionVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, VerifyError> {
        let claims = self.decode(token)?;

        if !self.options.accepts_party(claims.azp.as_deref()) {
            return Err(VerifyError::UnauthorizedParty(
                claims.azp.unwrap_or_default(),
            ));
        }

        let mut identity = VerifiedIdentity::new(claims.sub)?;
        identity.session_id = claims.sid;
        identity.authorized_party = claims.azp;
        identity.expires_at = i64::try_from(claims.exp)
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

        Ok(identity)
    }
}
