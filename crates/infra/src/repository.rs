//! # リポジトリ実装
//!
//! ユースケースが依存するリポジトリトレイトと、その PostgreSQL 実装を提供する。

pub mod contact_message_repository;

pub use contact_message_repository::{ContactMessageRepository, PostgresContactMessageRepository};
