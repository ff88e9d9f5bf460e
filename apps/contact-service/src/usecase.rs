//! # ユースケース層
//!
//! Contact Service のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリと通知送信を `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは HTTP の変換のみ行い、処理の流れはユースケースに集約

pub mod contact;

pub use contact::{ContactUseCaseImpl, SubmitContactError, TemplateRenderer};
