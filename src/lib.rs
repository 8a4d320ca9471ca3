/*
 * Responsibility
 * - crate の module 構成
 * - handler 向けの extractor (current user) を他の crate からも使えるように公開する
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod state;

pub use api::v1::extractors::current_user;
