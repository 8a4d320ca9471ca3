/*
 * Responsibility
 * - handler 向け extractor の公開 (re-export)
 */
pub mod current_user;

pub use current_user::*;
