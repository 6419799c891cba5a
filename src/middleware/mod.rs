/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: 認証 pipeline (verify / resolve), http / cors: Router 全体に掛ける横断的関心事
 */
pub mod auth;
pub mod cors;
pub mod http;
