/**
 * Responsibility
 *
 * 主な責務
 *  - UserField<F> に渡すフィールドのタグ型を宣言する
 *  - handler が使う alias (CurrentUid など) を集約する
 *
 * 置くもの
 *  - UidField, EmailField, IdField などのタグ型
 *  - type CurrentUid = UserField<UidField> のような alias
 *
 * 置かないもの
 *  - extensions からの取り出しロジック
 *  - extractor 実装
 */
use super::core::UserField;

/**
 * 以下に pub で列挙するものは、./mod.rs 経由で全て公開されるため注意
 * pub use types::*;
 */
// uid
pub enum UidField {}
pub type CurrentUid = UserField<UidField>;

// email
pub enum EmailField {}
pub type CurrentEmail = UserField<EmailField>;

// id (外部 ID)
pub enum IdField {}
pub type CurrentId = UserField<IdField>;
