//! # テスト用モック
//!
//! ユースケース・ハンドラのテストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! toiawase-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use toiawase_domain::{
    contact::ContactSubmission,
    notification::{EmailMessage, NotificationError},
};

use crate::{error::InfraError, notification::NotificationSender, repository::ContactMessageRepository};

// ===== MockContactMessageRepository =====

/// 挿入されたお問い合わせを記録するモック
#[derive(Clone, Default)]
pub struct MockContactMessageRepository {
    inserted:  Arc<Mutex<Vec<ContactSubmission>>>,
    fail_with: Arc<Mutex<Option<String>>>,
}

impl MockContactMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以後の insert を失敗させる
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.fail_with.lock().unwrap() = Some(message.into());
    }

    /// 挿入済みのお問い合わせ
    pub fn inserted(&self) -> Vec<ContactSubmission> {
        self.inserted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContactMessageRepository for MockContactMessageRepository {
    async fn insert(&self, submission: &ContactSubmission) -> Result<(), InfraError> {
        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(InfraError::unexpected(message));
        }
        self.inserted.lock().unwrap().push(submission.clone());
        Ok(())
    }
}

// ===== MockNotificationSender =====

/// 送信されたメールを記録するモック
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    sent:      Arc<Mutex<Vec<EmailMessage>>>,
    fail_with: Arc<Mutex<Option<String>>>,
    delay:     Arc<Mutex<Option<Duration>>>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以後の送信を失敗させる
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.fail_with.lock().unwrap() = Some(message.into());
    }

    /// 送信完了までに指定時間待つ
    pub fn delay(&self, duration: Duration) {
        *self.delay.lock().unwrap() = Some(duration);
    }

    /// 送信済みのメール
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(NotificationError::SendFailed(message));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}
