use thiserror::Error;

use crate::error::AppError;
use crate::repos::error::RepoError;
use crate::services::identity::VerifyError;

/// Why a pipeline stage stopped the request.
///
/// The inner details are for logs only; `AppError` carries what the caller sees.
#[derive(Debug, Error)]
pub enum AuthRejection {
    #[error("credential rejected: {0}")]
    Credential(#[from] VerifyError),
    #[error("no verified identity on request")]
    PipelineInvariant,
    #[error("no account for subject {subject_id}")]
    ProfileNotFound { subject_id: String },
    #[error("account store failure: {0}")]
    Store(#[from] RepoError),
}

impl From<AuthRejection> for AppError {
    fn from(rejection: AuthRejection) -> Self {
        match rejection {
            AuthRejection::Credential(_) | AuthRejection::PipelineInvariant => AppError::Unauthorized,
            AuthRejection::ProfileNotFound { .. } => AppError::ProfileNotFound,
            AuthRejection::Store(_) => AppError::Internal,
        }
    }
}
