/*
 * Responsibility
 * - Handler から見える「解決済みアカウント」の型
 * - resolve stage が request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - secret field は resolve stage が選択したものだけが Some になる
 * - リクエスト単位で生成・破棄され、リクエスト間で共有しない
 */
use std::sync::Arc;

use crate::repos::account::AccountRecord;

#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Arc<AccountRecord>);
