/// Factory: build the session verifier from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::identity::{JwtSessionVerifier, SessionVerifier, VerifyError};

pub fn build_session_verifier(config: &Config) -> Result<Arc<dyn SessionVerifier>, VerifyError> {
    let verifier = JwtSessionVerifier::new(
        config.idp_default_key.as_ref(),
        config.verify_options.clone(),
    )?;

    tracing::info!(
        authorized_parties = config.verify_options.authorized_parties.len(),
        key_override = config.verify_options.key_override.is_some(),
        "session verifier ready"
    );

    Ok(Arc::new(verifier))
}
