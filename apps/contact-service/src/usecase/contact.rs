//! # お問い合わせユースケース
//!
//! 入力検証 → 保存（待たない）→ 運用者への通知（待つ）の流れを実装する。
//!
//! ## 処理の流れ
//!
//! ```text
//! Received ─ 検証失敗 ─→ Invalid
//!    │
//! Validated → Persisted（保存を依頼、結果は待たない）→ Notified → Responded
//!                                                   └─ 送信失敗 ─→ Failed
//! ```
//!
//! ## 設計方針
//!
//! - **保存は fire-and-forget**: 別タスクで実行し、失敗してもレスポンスには影響しない
//! - **通知は待つ**: 通知の成否がレスポンスを決める。送信は別タスクで実行し
//!   `JoinHandle` を待つため、クライアントが切断しても送信は完了まで続く
//! - **再送なし**: 送信は 1 回のみ

mod template_renderer;

use std::{sync::Arc, time::Duration};

use thiserror::Error;
use toiawase_domain::{
    clock::Clock,
    contact::{
        ContactForm,
        ContactSubmission,
        ContactSubmissionId,
        ContactValidationError,
        EmailAddress,
        SubmissionStage,
    },
    notification::{EmailMessage, NotificationError},
};
use toiawase_infra::{notification::NotificationSender, repository::ContactMessageRepository};
use toiawase_shared::{
    event_log::{error as log_error, event},
    log_business_event,
};
use tracing::Instrument;

pub use self::template_renderer::TemplateRenderer;

/// お問い合わせ受付のエラー
#[derive(Debug, Error)]
pub enum SubmitContactError {
    /// 入力が不正（クライアントに理由を返す）
    #[error(transparent)]
    Validation(#[from] ContactValidationError),

    /// 通知メールを配送できなかった
    #[error("通知メールの配送に失敗: {0}")]
    Delivery(NotificationError),

    /// 予期しないエラー（テンプレート不備、送信タスクの異常終了）
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

/// お問い合わせユースケース実装
#[derive(Clone)]
pub struct ContactUseCaseImpl {
    repository:       Arc<dyn ContactMessageRepository>,
    sender:           Arc<dyn NotificationSender>,
    renderer:         Arc<TemplateRenderer>,
    clock:            Arc<dyn Clock>,
    operator_mailbox: EmailAddress,
    send_timeout:     Duration,
}

impl ContactUseCaseImpl {
    pub fn new(
        repository: Arc<dyn ContactMessageRepository>,
        sender: Arc<dyn NotificationSender>,
        renderer: Arc<TemplateRenderer>,
        clock: Arc<dyn Clock>,
        operator_mailbox: EmailAddress,
        send_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            sender,
            renderer,
            clock,
            operator_mailbox,
            send_timeout,
        }
    }

    /// お問い合わせを受け付ける
    ///
    /// 成功時は採番したお問い合わせ ID を返す。保存の完了は保証しない。
    #[tracing::instrument(
        skip_all,
        fields(contact.id = tracing::field::Empty, contact.stage = tracing::field::Empty)
    )]
    pub async fn submit(&self, form: ContactForm) -> Result<ContactSubmissionId, SubmitContactError> {
        record_stage(SubmissionStage::Received);

        let validated = match form.validate() {
            Ok(validated) => validated,
            Err(e) => {
                record_stage(SubmissionStage::Invalid);
                log_business_event!(
                    event.category = event::category::CONTACT,
                    event.action = event::action::CONTACT_REJECTED,
                    event.result = event::result::FAILURE,
                    reason = %e,
                    "お問い合わせを受け付けませんでした"
                );
                return Err(e.into());
            }
        };

        let submission =
            ContactSubmission::new(ContactSubmissionId::new(), validated, self.clock.now());
        let id = submission.id().clone();
        tracing::Span::current().record("contact.id", tracing::field::display(&id));
        record_stage(SubmissionStage::Validated);
        log_business_event!(
            event.category = event::category::CONTACT,
            event.action = event::action::CONTACT_RECEIVED,
            event.entity_type = event::entity_type::CONTACT_SUBMISSION,
            event.entity_id = %id,
            event.result = event::result::SUCCESS,
            "お問い合わせを受け付けました"
        );

        self.persist_detached(submission.clone());
        record_stage(SubmissionStage::Persisted);

        let email = self
            .renderer
            .render(&submission, &self.operator_mailbox)
            .map_err(|e| {
                record_stage(SubmissionStage::Failed);
                tracing::error!(
                    error.category = log_error::category::APPLICATION,
                    error.kind = log_error::kind::TEMPLATE,
                    "通知テンプレートのレンダリングに失敗: {}",
                    e
                );
                SubmitContactError::Unexpected(e.to_string())
            })?;

        match self.deliver(email).await {
            Ok(()) => {
                record_stage(SubmissionStage::Notified);
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_SENT,
                    event.entity_type = event::entity_type::CONTACT_SUBMISSION,
                    event.entity_id = %id,
                    event.result = event::result::SUCCESS,
                    "通知メール送信成功"
                );
                record_stage(SubmissionStage::Responded);
                Ok(id)
            }
            Err(e) => {
                record_stage(SubmissionStage::Failed);
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_FAILED,
                    event.entity_type = event::entity_type::CONTACT_SUBMISSION,
                    event.entity_id = %id,
                    event.result = event::result::FAILURE,
                    error = %e,
                    "通知メール送信失敗"
                );
                Err(e)
            }
        }
    }

    /// 別タスクで保存する（結果は待たない）
    fn persist_detached(&self, submission: ContactSubmission) {
        let repository = Arc::clone(&self.repository);

        tokio::spawn(
            async move {
                if let Err(e) = repository.insert(&submission).await {
                    log_business_event!(
                        event.category = event::category::CONTACT,
                        event.action = event::action::CONTACT_PERSISTENCE_FAILED,
                        event.entity_type = event::entity_type::CONTACT_SUBMISSION,
                        event.entity_id = %submission.id(),
                        event.result = event::result::FAILURE,
                        error.category = log_error::category::INFRASTRUCTURE,
                        error.kind = log_error::kind::DATABASE,
                        error = %e,
                        "お問い合わせの保存に失敗"
                    );
                    tracing::debug!(span_trace = %e.span_trace(), "保存失敗時の呼び出し経路");
                }
            }
            .in_current_span(),
        );
    }

    /// 別タスクでメールを送信し、完了を待つ
    ///
    /// 待ち時間が `send_timeout` を超えた場合は配送失敗とする（送信タスク自体は継続する）。
    async fn deliver(&self, email: EmailMessage) -> Result<(), SubmitContactError> {
        let sender = Arc::clone(&self.sender);
        let handle = tokio::spawn(async move { sender.send_email(&email).await }.in_current_span());

        match tokio::time::timeout(self.send_timeout, handle).await {
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(e))) => Err(SubmitContactError::Delivery(e)),
            Ok(Err(join_error)) => Err(SubmitContactError::Unexpected(format!(
                "メール送信タスクが異常終了しました: {join_error}"
            ))),
            Err(_) => Err(SubmitContactError::Delivery(NotificationError::Timeout {
                seconds: self.send_timeout.as_secs(),
            })),
        }
    }
}

fn record_stage(stage: SubmissionStage) {
    let stage: &'static str = stage.into();
    tracing::Span::current().record("contact.stage", stage);
    tracing::debug!(contact.stage = stage, "受付段階を更新");
}
