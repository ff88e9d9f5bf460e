//! # 通知
//!
//! お問い合わせを運用者へ届けるメール通知のドメインモデル。
//!
//! ## 設計方針
//!
//! - **同期的な通知**: 通知の成否はクライアントへのレスポンスを左右する
//!   （永続化とは異なり fire-and-forget ではない）
//! - **テンプレート分離**: メール生成（TemplateRenderer）は contact-service が担う

use thiserror::Error;

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// 送信がタイムアウト
    #[error("メール送信が {seconds} 秒以内に完了しませんでした")]
    Timeout { seconds: u64 },

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。NotificationSender に渡される。
/// 送信元アドレスは送信実装の設定で決まる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信先メールアドレス
    pub to:        String,
    /// 返信先（問い合わせ者のアドレス）
    pub reply_to:  Option<String>,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
    /// プレーンテキスト本文
    pub text_body: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_タイムアウトエラーは秒数を含む() {
        let error = NotificationError::Timeout { seconds: 30 };

        assert_eq!(
            error.to_string(),
            "メール送信が 30 秒以内に完了しませんでした"
        );
    }
}
