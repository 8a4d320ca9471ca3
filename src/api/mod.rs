/*
 * Responsibility
 * - API version ごとの module をまとめる
 */
pub mod v1;
