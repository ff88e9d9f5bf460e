//! # ドメイン層エラー定義
//!
//! 起動時の設定値など、お問い合わせ以外のドメイン値の検証失敗を表現する。
//! お問い合わせフォームの入力検証は
//! [`ContactValidationError`](crate::contact::ContactValidationError) が担う。
//!
//! ## 使用例
//!
//! ```rust
//! use toiawase_domain::{DomainError, origin::AllowedOriginSet};
//!
//! let result = AllowedOriginSet::parse("ftp://example.com");
//! assert!(matches!(result, Err(DomainError::Validation(_))));
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 値がドメインの不変条件を満たさない場合に使用する。
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
