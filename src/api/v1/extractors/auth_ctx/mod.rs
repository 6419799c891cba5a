/*!
 * Authentication context extractors
 *
 * Responsibility:
 * - 認証済みリクエストのコンテキストを handler に提供する
 *   - VerifiedIdentity: verify stage の結果
 *   - CurrentAccount: resolve stage の結果 (secret field 付き AccountRecord)
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 */

mod core;
mod types;

pub use types::CurrentAccount;
