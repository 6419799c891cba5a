/*!
 * Account records keyed by the identity provider's subject id.
 *
 * Responsibility:
 * - AccountRecord / Integration の型
 * - secret field の明示選択 (FieldSelection)
 * - AccountStore trait と Postgres 実装
 *
 * Secret integration fields are hidden unless the caller names them in a
 * `FieldSelection`. Every read path takes one.
 */

mod model;
mod pg;
mod selection;
mod store;

#[cfg(test)]
pub mod memory;

pub use model::{AccountRecord, Integration, IntegrationProvider, SecretToken};
pub use pg::PgAccountStore;
pub use selection::{FieldParseError, FieldSelection, SecretField, SecretKind};
pub use store::AccountStore;
