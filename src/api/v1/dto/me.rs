/*
 * Responsibility
 * - /me, /whoami の response DTO
 * - UserPayload 自体は Serialize を持つので、そのまま返す場合は DTO を挟まない
 */
use serde::Serialize;

use crate::api::v1::extractors::ObjectRef;

#[derive(Debug, Serialize)]
pub struct FieldValueResponse {
    pub field: String,
    // 未認証 / 未知のフィールド / 値なし はすべて null
    pub value: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub authenticated: bool,
    pub uid: Option<String>,
    pub email: Option<String>,
    pub id: Option<ObjectRef>,
}
