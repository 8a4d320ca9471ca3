/*!
 * Current user extractor
 *
 * Responsibility:
 * - 認証レイヤーが request に載せた "current user" を handler に提供する
 * - 丸ごと (CurrentUser / RequireUser) または 1 フィールド (CurrentUid など) を取り出す
 * - user の形 (UserPayload) と検証 (validate) は payload に、タグ型は types に分離する
 *
 * Public API:
 * - UserPayload, RawUserPayload, ObjectRef, validate, ValidationError
 * - extract_user, extract_user_by_name, UserSelector, Selected, RequestContext
 * - CurrentUser, RequireUser, UserField, CurrentUid, CurrentEmail, CurrentId
 */

mod core;
mod payload;
mod types;

pub use self::core::{
    CurrentUser, FieldSelector, RequestContext, RequireUser, Selected, UserField, UserSelector,
    extract_user, extract_user_by_name,
};
pub use payload::{FieldViolation, ObjectRef, RawUserPayload, Rule, UserPayload, ValidationError, validate};
pub use types::*;
