/*
 * Responsibility
 * - crate の公開面 (route 定義側から使う認証 pipeline とその型)
 *   - middleware::auth::verify::apply   : verify のみ
 *   - middleware::auth::resolve::apply  : resolve のみ (上流で verify 済みの場合)
 *   - middleware::auth::apply           : verify → resolve
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_support;
