/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - current user の付与 (gateway middleware) は app.rs 側で nest 前に掛ける
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::me::{me, me_field, whoami};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/me/{field}", get(me_field))
        .route("/whoami", get(whoami))
}
