//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで運用者宛ての通知メールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **件名**: 問い合わせ者が入力した件名をそのまま使う
//! - **HTML の自動エスケープ**: `.html` テンプレートは tera が自動エスケープする

use tera::{Context, Tera};
use toiawase_domain::{
    contact::{ContactSubmission, EmailAddress},
    notification::{EmailMessage, NotificationError},
};

const HTML_TEMPLATE: &str = "contact_message.html";
const TEXT_TEMPLATE: &str = "contact_message.txt";

/// テンプレートレンダラー
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// `include_str!` で埋め込んだテンプレートを tera に登録する
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    HTML_TEMPLATE,
                    include_str!("../../../templates/contact/contact_message.html"),
                ),
                (
                    TEXT_TEMPLATE,
                    include_str!("../../../templates/contact/contact_message.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// お問い合わせから運用者宛てのメールを生成する
    ///
    /// 返信先（Reply-To）には問い合わせ者のアドレスを設定する。
    pub fn render(
        &self,
        submission: &ContactSubmission,
        operator_mailbox: &EmailAddress,
    ) -> Result<EmailMessage, NotificationError> {
        let mut context = Context::new();
        context.insert("id", &submission.id().to_string());
        context.insert("name", submission.name());
        context.insert("email", submission.email().as_str());
        context.insert("subject", submission.subject());
        context.insert("message", submission.message());
        context.insert("received_at", &submission.received_at().to_rfc3339());

        let html_body = self
            .engine
            .render(HTML_TEMPLATE, &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;
        let text_body = self
            .engine
            .render(TEXT_TEMPLATE, &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage {
            to: operator_mailbox.as_str().to_string(),
            reply_to: Some(submission.email().as_str().to_string()),
            subject: submission.subject().to_string(),
            html_body,
            text_body,
        })
    }
}
