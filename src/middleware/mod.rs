/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - pub fn apply(...) を各モジュールに置く
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
