/*
 * Responsibility
 * - 現在のユーザーを返す handler 群
 * - GET /me            : RequireUser (未認証は 401)
 * - GET /me/{field}    : フィールド名で 1 つだけ取り出す (未知の名前は null)
 * - GET /whoami        : CurrentUser + UserField<F> (未認証でも 200)
 */
use axum::{Json, extract::Path, http::Extensions};

use crate::{
    api::v1::{
        dto::me::{FieldValueResponse, WhoAmIResponse},
        extractors::{
            CurrentEmail, CurrentId, CurrentUid, CurrentUser, RequireUser, UserPayload,
            extract_user_by_name,
        },
    },
    error::AppError,
};

pub async fn me(RequireUser(user): RequireUser) -> Json<UserPayload> {
    Json(user)
}

pub async fn me_field(
    Path(field): Path<String>,
    extensions: Extensions,
) -> Result<Json<FieldValueResponse>, AppError> {
    let value = serde_json::to_value(extract_user_by_name(Some(field.as_str()), &extensions))
        .map_err(|e| {
            tracing::error!(error = %e, "failed to serialize user field");
            AppError::Internal
        })?;

    Ok(Json(FieldValueResponse { field, value }))
}

pub async fn whoami(
    CurrentUser(user): CurrentUser,
    uid: CurrentUid,
    email: CurrentEmail,
    id: CurrentId,
) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        authenticated: user.is_some(),
        uid: uid.into_inner(),
        email: email.into_inner(),
        id: id.into_inner(),
    })
}
