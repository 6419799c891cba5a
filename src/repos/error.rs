/*
 * Responsibility
 * - repo が上位に伝える意味の定義
 * - 詳細 (sqlx::Error) はログ用に保持し、レスポンスには出さない
 */
use std::time::Duration;

use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("account lookup timed out after {0:?}")]
    Timeout(Duration),
}
