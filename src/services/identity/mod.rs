//! Session verification against the external identity provider.
//!
//! The provider signs session tokens; this module only checks them. Nothing
//! here issues, refreshes, or revokes sessions.

pub mod factory;
pub mod session_jwt;
pub mod verifier;

pub use factory::build_session_verifier;
pub use session_jwt::JwtSessionVerifier;
pub use verifier::{KeyMaterial, SessionVerifier, VerifiedIdentity, VerifyError, VerifyOptions};
