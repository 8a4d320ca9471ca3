/*
 * Responsibility
 * - "current user" を request extensions に載せる middleware 群
 * - 認証そのものは前段 (gateway) の責務。ここは付与と形の検証だけ
 */
pub mod gateway;
