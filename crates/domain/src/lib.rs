//! # Toiawase ドメイン層
//!
//! お問い合わせフォームの受付に関するドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: [`contact::ContactSubmission`]（受付済みのお問い合わせ）
//! - **値オブジェクト**: [`contact::EmailAddress`], [`origin::AllowedOriginSet`]
//! - **ドメインエラー**: 入力検証の失敗を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! contact-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、SMTP）には一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`clock`] - 時刻プロバイダ（受付日時の採番に使用）
//! - [`contact`] - お問い合わせエンティティと入力検証
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`notification`] - 通知メールのメッセージ型
//! - [`origin`] - クロスオリジン許可リスト
//!
//! ## 使用例
//!
//! ```rust
//! use toiawase_domain::contact::{ContactForm, ContactSubmission, ContactSubmissionId};
//!
//! let form = ContactForm {
//!     name:    Some("Ada".to_string()),
//!     email:   Some("ada@example.com".to_string()),
//!     subject: Some("Hi".to_string()),
//!     message: Some("Hello".to_string()),
//! };
//!
//! let validated = form.validate().unwrap();
//! let submission =
//!     ContactSubmission::new(ContactSubmissionId::new(), validated, chrono::Utc::now());
//! assert_eq!(submission.email().as_str(), "ada@example.com");
//! ```

#[macro_use]
mod macros;

pub mod clock;
pub mod contact;
pub mod error;
pub mod notification;
pub mod origin;

pub use error::DomainError;
