//! gateway が付与した identity header → UserPayload を extensions に入れる
//!
//! 認証 (token/session の検証) は前段の gateway の責務。ここでは:
//! - `x-user-uid` / `x-user-email` / `x-user-id` を RawUserPayload として読む
//! - validate() を通して UserPayload を組み立てる
//! - request.extensions() に insert し、extractor に受け渡す
//!
//! `x-user-uid` が無い request は匿名としてそのまま通す。
//! 401 にするかどうかは handler 側 (RequireUser) が決める。

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderName, Request},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::{ObjectRef, RawUserPayload, validate};
use crate::error::AppError;
use crate::state::AppState;

pub const USER_UID_HEADER: HeaderName = HeaderName::from_static("x-user-uid");
pub const USER_EMAIL_HEADER: HeaderName = HeaderName::from_static("x-user-email");
pub const USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");

/// `/api/v1/*` に "current user" の付与を掛ける。
///
/// 例：
/// ```ignore
/// let v1 = middleware::auth::gateway::apply(api::v1::routes(), state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, gateway_middleware))
}

async fn gateway_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if !state.trust_gateway_headers {
        return Ok(next.run(req).await);
    }

    if let Some(raw) = read_raw_payload(req.headers())? {
        let user = match validate(raw) {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!(error = %err, "rejected user payload from gateway headers");
                return Err(err.into());
            }
        };

        tracing::debug!(uid = user.uid(), "current user attached");

        // middleware → extractor への受け渡し
        req.extensions_mut().insert(user);
    }

    Ok(next.run(req).await)
}

/// `x-user-uid` が無ければ `None` (匿名)
fn read_raw_payload(headers: &HeaderMap) -> Result<Option<RawUserPayload>, AppError> {
    let Some(uid) = header_str(headers, &USER_UID_HEADER)? else {
        return Ok(None);
    };

    let email = header_str(headers, &USER_EMAIL_HEADER)?;
    let id = header_str(headers, &USER_ID_HEADER)?;

    Ok(Some(RawUserPayload {
        uid: uid.to_string(),
        email: email.map(str::to_string),
        id: id.map(ObjectRef::new),
    }))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Result<Option<&'a str>, AppError> {
    headers
        .get(name)
        .map(|v| {
            v.to_str().map_err(|_| {
                AppError::bad_request("INVALID_GATEWAY_HEADER", format!("{name} is not valid text"))
            })
        })
        .transpose()
}
