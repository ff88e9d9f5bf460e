//! # Toiawase インフラ層
//!
//! 外部システム（PostgreSQL、SMTP サーバー）との接続・通信を担当する。
//!
//! ## 設計方針
//!
//! このクレートはユースケースが依存するトレイト（リポジトリ、通知送信）の
//! 具体的な実装を提供する。外部システムの詳細をカプセル化し、
//! ユースケースをインフラの変更から保護する。
//!
//! ## 依存関係
//!
//! ```text
//! contact-service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL 接続プールとマイグレーション
//! - [`error`] - インフラ層エラー定義
//! - [`notification`] - メール送信（SMTP / Noop）
//! - [`repository`] - リポジトリ実装
//! - `mock` - テスト用モック（`test-utils` feature）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use toiawase_infra::{db, repository::PostgresContactMessageRepository};
//!
//! let pool = db::create_pool("postgres://localhost/toiawase")?;
//! let repository = PostgresContactMessageRepository::new(pool);
//! ```

pub mod db;
pub mod error;
#[cfg(feature = "test-utils")]
pub mod mock;
pub mod notification;
pub mod repository;

pub use error::InfraError;
pub use notification::NotificationSender;
