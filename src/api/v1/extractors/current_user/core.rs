/*
 * Responsibility
 * - request に載っている "current user" を読み出し、丸ごと or 1 フィールドだけを返す
 * - axum の FromRequestParts 実装 (CurrentUser / UserField<F> / RequireUser)
 *
 * 前提
 * - 認証 middleware が UserPayload を request.extensions() に insert 済み
 * - ここでは検証しない。読み取り専用で、失敗もしない (RequireUser を除く)
 */
use std::convert::Infallible;
use std::marker::PhantomData;

use axum::{
    extract::FromRequestParts,
    http::{Extensions, Request, request::Parts},
};
use serde::Serialize;

use crate::error::AppError;

use super::payload::{ObjectRef, UserPayload};
use super::types::{EmailField, IdField, UidField};

/// "current user" の slot を持つもの
///
/// extensions / Parts / Request のどれからでも読めるようにしておくと、
/// handler の外 (middleware, テスト) からも同じ関数で取り出せる
pub trait RequestContext {
    fn current_user(&self) -> Option<&UserPayload>;
}

impl RequestContext for Extensions {
    fn current_user(&self) -> Option<&UserPayload> {
        self.get::<UserPayload>()
    }
}

impl RequestContext for Parts {
    fn current_user(&self) -> Option<&UserPayload> {
        self.extensions.current_user()
    }
}

impl<B> RequestContext for Request<B> {
    fn current_user(&self) -> Option<&UserPayload> {
        self.extensions().current_user()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSelector {
    Whole,
    Uid,
    Email,
    Id,
}

impl UserSelector {
    /// 文字列のフィールド名から selector を引く
    ///
    /// - `None` / 空文字は Whole
    /// - 未知の名前は `None` (エラーにはしない)
    pub fn from_name(name: Option<&str>) -> Option<Self> {
        match name {
            None | Some("") => Some(Self::Whole),
            Some("uid") => Some(Self::Uid),
            Some("email") => Some(Self::Email),
            Some("id" | "_id") => Some(Self::Id),
            Some(_) => None,
        }
    }
}

/// extract_user の結果。request に載っている値を借用したまま返す
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Selected<'a> {
    Whole(&'a UserPayload),
    Uid(&'a str),
    Email(&'a str),
    Id(&'a ObjectRef),
}

/// 現在のユーザー (or その 1 フィールド) を request context から取り出す
///
/// user が載っていない場合、またはフィールドが無い場合 (`id` 未設定) は `None`
pub fn extract_user<C>(selector: UserSelector, ctx: &C) -> Option<Selected<'_>>
where
    C: RequestContext + ?Sized,
{
    let user = ctx.current_user()?;

    match selector {
        UserSelector::Whole => Some(Selected::Whole(user)),
        UserSelector::Uid => Some(Selected::Uid(user.uid())),
        UserSelector::Email => Some(Selected::Email(user.email())),
        UserSelector::Id => user.id().map(Selected::Id),
    }
}

/// フィールド名 (文字列) 版の extract_user
pub fn extract_user_by_name<'a, C>(name: Option<&str>, ctx: &'a C) -> Option<Selected<'a>>
where
    C: RequestContext + ?Sized,
{
    extract_user(UserSelector::from_name(name)?, ctx)
}

/// Handler で、現在のユーザーを丸ごと受け取るための extractor
/// 未認証なら `None` (401 にはしない)
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<UserPayload>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match extract_user(UserSelector::Whole, &*parts) {
            Some(Selected::Whole(user)) => Some(user.clone()),
            _ => None,
        };
        Ok(Self(user))
    }
}

/// 認証必須の handler 用。user が載っていなければ 401 を返す
/// (認証 middleware が掛かっていない route でも 401 になる)
#[derive(Debug, Clone)]
pub struct RequireUser(pub UserPayload);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match extract_user(UserSelector::Whole, &*parts) {
            Some(Selected::Whole(user)) => Ok(Self(user.clone())),
            _ => {
                tracing::debug!(uri = %parts.uri, "no current user on request");
                Err(AppError::Unauthorized)
            }
        }
    }
}

/// UserField<F> が取り出すフィールドの定義
pub trait FieldSelector {
    type Value;

    const SELECTOR: UserSelector;

    fn project(selected: Selected<'_>) -> Option<Self::Value>;
}

impl FieldSelector for UidField {
    type Value = String;

    const SELECTOR: UserSelector = UserSelector::Uid;

    fn project(selected: Selected<'_>) -> Option<Self::Value> {
        match selected {
            Selected::Uid(uid) => Some(uid.to_owned()),
            _ => None,
        }
    }
}

impl FieldSelector for EmailField {
    type Value = String;

    const SELECTOR: UserSelector = UserSelector::Email;

    fn project(selected: Selected<'_>) -> Option<Self::Value> {
        match selected {
            Selected::Email(email) => Some(email.to_owned()),
            _ => None,
        }
    }
}

impl FieldSelector for IdField {
    type Value = ObjectRef;

    const SELECTOR: UserSelector = UserSelector::Id;

    fn project(selected: Selected<'_>) -> Option<Self::Value> {
        match selected {
            Selected::Id(id) => Some(id.clone()),
            _ => None,
        }
    }
}

/// 現在のユーザーの 1 フィールドだけを受け取るための extractor
/// 未認証 / フィールド無しは `value == None`
pub struct UserField<F: FieldSelector> {
    pub value: Option<F::Value>,
    _marker: PhantomData<F>,
}

impl<F: FieldSelector> UserField<F> {
    fn new(value: Option<F::Value>) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub fn into_inner(self) -> Option<F::Value> {
        self.value
    }
}

impl<F, S> FromRequestParts<S> for UserField<F>
where
    F: FieldSelector + Send + Sync,
    F::Value: Send,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = extract_user(F::SELECTOR, &*parts).and_then(F::project);
        Ok(Self::new(value))
    }
}

impl<F> std::fmt::Debug for UserField<F>
where
    F: FieldSelector,
    F::Value: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserField")
            .field("value", &self.value)
            .finish()
    }
}
