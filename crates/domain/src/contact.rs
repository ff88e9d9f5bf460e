//! # お問い合わせ
//!
//! お問い合わせフォームから受け付けたメッセージを表現するドメインモデル。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 |
//! |---|------------|
//! | [`ContactForm`] | 受信したままのフォーム入力（未検証） |
//! | [`ValidatedContact`] | 検証済みのフォーム入力 |
//! | [`ContactSubmission`] | 受付済みのお問い合わせ（ID と受付日時を持つ） |
//! | [`SubmissionStage`] | 受付処理の進行段階 |
//!
//! ## 不変条件
//!
//! - 4 項目（name, email, subject, message）はすべて必須。空文字列は未入力とみなす（空白のみは入力あり）
//! - email は `local@domain.tld` 形式（`^[^\s@]+@[^\s@]+\.[^\s@]+$`）
//! - 保存される値は送信された文字列そのもの（トリムしない）
//! - 受付後は不変。更新・削除の操作は存在しない

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use thiserror::Error;

define_uuid_id! {
    /// お問い合わせ ID
    ///
    /// contact_messages テーブルの主キー。UUID v7 を使用。
    pub struct ContactSubmissionId;
}

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("メールアドレスの正規表現が不正です")
});

/// フォーム項目
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ContactField {
    Name,
    Email,
    Subject,
    Message,
}

/// お問い合わせの入力検証エラー
///
/// `Display` の文言はそのままクライアントに返す。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactValidationError {
    /// 必須項目が未入力
    #[error("All fields are required")]
    MissingField(ContactField),

    /// メールアドレスの形式が不正
    #[error("Please provide a valid email address")]
    InvalidEmail,
}

/// メールアドレス（値オブジェクト）
///
/// 生成時に `local@domain.tld` 形式であることを検証する。
/// 問い合わせ者のアドレスと運用者の受信箱の両方に使う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// メールアドレスを検証して作成する
    pub fn parse(value: impl Into<String>) -> Result<Self, ContactValidationError> {
        let value = value.into();
        if !EMAIL_PATTERN.is_match(&value) {
            return Err(ContactValidationError::InvalidEmail);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 受信したままのフォーム入力
///
/// JSON の項目欠落を表現するため、各項目は `Option` で保持する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name:    Option<String>,
    pub email:   Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

impl ContactForm {
    /// フォーム入力を検証する
    ///
    /// 必須チェックを全項目（name → email → subject → message の順）に行ってから、
    /// メールアドレスの形式を検証する。
    pub fn validate(self) -> Result<ValidatedContact, ContactValidationError> {
        let name = require(ContactField::Name, self.name)?;
        let email = require(ContactField::Email, self.email)?;
        let subject = require(ContactField::Subject, self.subject)?;
        let message = require(ContactField::Message, self.message)?;

        Ok(ValidatedContact {
            name,
            email: EmailAddress::parse(email)?,
            subject,
            message,
        })
    }
}

fn require(field: ContactField, value: Option<String>) -> Result<String, ContactValidationError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ContactValidationError::MissingField(field)),
    }
}

/// 検証済みのフォーム入力
///
/// [`ContactForm::validate`] を経由しないと生成できない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedContact {
    name:    String,
    email:   EmailAddress,
    subject: String,
    message: String,
}

/// 受付済みのお問い合わせ
///
/// 永続化先には 1 度だけ渡され、以後変更されない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    id:          ContactSubmissionId,
    name:        String,
    email:       EmailAddress,
    subject:     String,
    message:     String,
    received_at: DateTime<Utc>,
}

impl ContactSubmission {
    /// 検証済みの入力からお問い合わせを作成する
    pub fn new(
        id: ContactSubmissionId,
        contact: ValidatedContact,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: contact.name,
            email: contact.email,
            subject: contact.subject,
            message: contact.message,
            received_at,
        }
    }

    pub fn id(&self) -> &ContactSubmissionId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}

/// 受付処理の進行段階
///
/// ```text
/// Received → Validated → Persisted → Notified → Responded
///     ↓                                  ↓
///  Invalid                            Failed
/// ```
///
/// ログの `contact.stage` フィールドに snake_case で出力する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SubmissionStage {
    Received,
    Validated,
    /// 永続化を依頼済み（完了は待たない）
    Persisted,
    Notified,
    Responded,
    Invalid,
    Failed,
}
