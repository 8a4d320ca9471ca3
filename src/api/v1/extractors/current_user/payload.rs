/*
 * Responsibility
 * - "current user" の形 (RawUserPayload / UserPayload) を定義する
 * - Raw → Validated への変換 (validate) と、構築済み payload への検証パス
 *
 * Notes
 * - 認証そのもの (token/session の検証) はここの責務ではない
 * - extractor は検証しない。検証は slot に載せる側 (middleware) が行う
 */
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 外部システムの不透明な識別子 (ex: document store の object id)
/// 中身は解釈しないし検証もしない
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectRef(String);

impl ObjectRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 認証レイヤーが生成する未検証の payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawUserPayload {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    // absent / null / "" はすべて「id なし」として扱う
    #[serde(default, alias = "_id")]
    pub id: Option<ObjectRef>,
}

/// Handler から見える唯一の user 型
///
/// - `uid` は空でない文字列
/// - `email` は常に存在し、メールアドレスの構文を満たす
/// - `id` は不透明な外部 ID。そのまま運ぶだけ
///
/// フィールドは構築後に変更できない (accessor のみ公開)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserPayload {
    uid: String,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<ObjectRef>,
}

impl UserPayload {
    /// 検証なしで組み立てる。形の保証が必要なら [`UserPayload::validate`] を通すこと
    pub fn new(uid: impl Into<String>, email: impl Into<String>, id: Option<ObjectRef>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            id,
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn id(&self) -> Option<&ObjectRef> {
        self.id.as_ref()
    }

    /// 構築済みの payload に検証ルールを適用する
    ///
    /// 違反したフィールドはすべて列挙して返す
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        check_uid(&self.uid, &mut violations);
        check_email(&self.email, &mut violations);

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }
}

impl TryFrom<RawUserPayload> for UserPayload {
    type Error = ValidationError;

    fn try_from(raw: RawUserPayload) -> Result<Self, Self::Error> {
        validate(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    NotEmpty,
    Required,
    Email,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::NotEmpty => "not_empty",
            Rule::Required => "required",
            Rule::Email => "email",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub rule: Rule,
}

impl FieldViolation {
    fn new(field: &'static str, rule: Rule) -> Self {
        Self { field, rule }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.field, self.rule.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid user payload: {}", join_violations(.violations))]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn has(&self, field: &str, rule: Rule) -> bool {
        self.violations
            .iter()
            .any(|v| v.field == field && v.rule == rule)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// RawUserPayload を検証して UserPayload を構築する
///
/// email が無い raw payload は `Rule::Required` で拒否する
pub fn validate(raw: RawUserPayload) -> Result<UserPayload, ValidationError> {
    let RawUserPayload { uid, email, id } = raw;

    let mut violations = Vec::new();
    check_uid(&uid, &mut violations);
    match email.as_deref() {
        Some(email) => check_email(email, &mut violations),
        None => violations.push(FieldViolation::new("email", Rule::Required)),
    }

    match email {
        Some(email) if violations.is_empty() => {
            let id = id.filter(|id| !id.is_empty());
            Ok(UserPayload::new(uid, email, id))
        }
        _ => Err(ValidationError::new(violations)),
    }
}

fn check_uid(uid: &str, violations: &mut Vec<FieldViolation>) {
    if uid.trim().is_empty() {
        violations.push(FieldViolation::new("uid", Rule::NotEmpty));
    }
}

fn check_email(email: &str, violations: &mut Vec<FieldViolation>) {
    if !is_email(email) {
        violations.push(FieldViolation::new("email", Rule::Email));
    }
}

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;
const MAX_DOMAIN_LABEL_LEN: usize = 63;

fn is_email(value: &str) -> bool {
    if value.len() > MAX_EMAIL_LEN || value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    is_local_part(local) && is_domain(domain)
}

fn is_local_part(local: &str) -> bool {
    !local.is_empty()
        && local.len() <= MAX_LOCAL_PART_LEN
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        // UTF-8 の英数字 (ü など) も local part では許可する
        && local
            .chars()
            .all(|c| c.is_alphanumeric() || "!#$%&'*+/=?^_`{|}~-.".contains(c))
}

fn is_domain(domain: &str) -> bool {
    // `@` が 2 つ以上ある場合はここで弾かれる
    domain.contains('.')
        && domain.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= MAX_DOMAIN_LABEL_LEN
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(uid: &str, email: Option<&str>) -> RawUserPayload {
        RawUserPayload {
            uid: uid.to_string(),
            email: email.map(str::to_string),
            id: None,
        }
    }

    #[test]
    fn new_preserves_fields_without_id() {
        let user = UserPayload::new("u1", "a@b.com", None);

        assert_eq!(user.uid(), "u1");
        assert_eq!(user.email(), "a@b.com");
        assert!(user.id().is_none());
    }

    #[test]
    fn validate_accepts_well_formed_payload() {
        let user = validate(raw("u1", Some("a@b.com"))).unwrap();

        assert_eq!(user, UserPayload::new("u1", "a@b.com", None));
        assert!(user.validate().is_ok());
    }

    #[test]
    fn validation_pass_flags_empty_uid() {
        let user = UserPayload::new("", "a@b.com", None);

        let err = user.validate().unwrap_err();
        assert!(err.has("uid", Rule::NotEmpty));
        assert_eq!(err.violations().len(), 1);
    }

    #[test]
    fn validation_pass_flags_blank_uid() {
        let err = validate(raw("   ", Some("a@b.com"))).unwrap_err();

        assert!(err.has("uid", Rule::NotEmpty));
    }

    #[test]
    fn validation_pass_flags_malformed_email() {
        let user = UserPayload::new("u1", "not-an-email", None);

        let err = user.validate().unwrap_err();
        assert!(err.has("email", Rule::Email));
    }

    #[test]
    fn missing_email_is_rejected_as_required() {
        let err = validate(raw("u1", None)).unwrap_err();

        assert!(err.has("email", Rule::Required));
    }

    #[test]
    fn every_violated_field_is_reported() {
        let err = validate(raw("", Some("nope"))).unwrap_err();

        assert_eq!(
            err.violations(),
            &[
                FieldViolation::new("uid", Rule::NotEmpty),
                FieldViolation::new("email", Rule::Email),
            ]
        );
        assert_eq!(
            err.to_string(),
            "invalid user payload: uid (not_empty), email (email)"
        );
    }

    #[test]
    fn id_is_carried_through_unchanged() {
        let mut payload = raw("u1", Some("a@b.com"));
        payload.id = Some(ObjectRef::new("65f1c0ffee"));

        let user = UserPayload::try_from(payload).unwrap();
        assert_eq!(user.id().map(ObjectRef::as_str), Some("65f1c0ffee"));
    }

    #[test]
    fn empty_id_is_treated_as_absent() {
        let mut payload = raw("u1", Some("a@b.com"));
        payload.id = Some(ObjectRef::new(""));

        let user = validate(payload).unwrap();
        assert!(user.id().is_none());
    }

    #[test]
    fn raw_payload_accepts_underscore_id_and_null() {
        let with_id: RawUserPayload =
            serde_json::from_str(r#"{"uid":"u1","email":"a@b.com","_id":"abc"}"#).unwrap();
        assert_eq!(with_id.id, Some(ObjectRef::new("abc")));

        let with_null: RawUserPayload =
            serde_json::from_str(r#"{"uid":"u1","id":null}"#).unwrap();
        assert!(with_null.id.is_none());
        assert!(with_null.email.is_none());
    }

    #[test]
    fn email_syntax() {
        for ok in [
            "a@b.com",
            "first.last@example.co.jp",
            "user+tag@sub-domain.example.org",
        ] {
            assert!(is_email(ok), "{ok} should be accepted");
        }

        for bad in [
            "",
            "not-an-email",
            "@b.com",
            "a@",
            "a@b",
            "a@@b.com",
            "a@b@c.com",
            ".a@b.com",
            "a..b@c.com",
            "a b@c.com",
            "a@-b.com",
            "a@b..com",
        ] {
            assert!(!is_email(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn email_length_limits() {
        let local = |n: usize| format!("{}@b.com", "a".repeat(n));
        assert!(is_email(&local(MAX_LOCAL_PART_LEN)));
        assert!(!is_email(&local(MAX_LOCAL_PART_LEN + 1)));

        let label = |n: usize| format!("a@{}.com", "b".repeat(n));
        assert!(is_email(&label(MAX_DOMAIN_LABEL_LEN)));
        assert!(!is_email(&label(MAX_DOMAIN_LABEL_LEN + 1)));

        // labels stay within 63 chars, only the total length is exceeded
        let domain = vec!["c".repeat(60); 4].join(".");
        let at_limit = format!("{}@{}", "a".repeat(MAX_EMAIL_LEN - domain.len() - 1), domain);
        assert_eq!(at_limit.len(), MAX_EMAIL_LEN);
        assert!(is_email(&at_limit));

        let too_long = format!("a{at_limit}");
        assert!(!is_email(&too_long));
    }

    #[test]
    fn email_accepts_non_ascii_local_part() {
        assert!(is_email("ü@b.com"));
        assert!(is_email("jörg.müller@example.de"));
        assert!(!is_email("ü b@c.com"));
    }

    #[test]
    fn serializes_without_absent_id() {
        let user = UserPayload::new("u1", "a@b.com", None);

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json, serde_json::json!({"uid": "u1", "email": "a@b.com"}));
    }
}
