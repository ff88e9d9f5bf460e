//! # ContactMessageRepository
//!
//! 受付済みお問い合わせの永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **追記のみ**: INSERT だけを提供する。読み取り・更新・削除は行わない
//! - **fire-and-forget**: 呼び出し側は結果を待たずにレスポンスを返す。
//!   失敗はログにのみ残る

use async_trait::async_trait;
use sqlx::PgPool;
use toiawase_domain::contact::ContactSubmission;

use crate::error::InfraError;

/// お問い合わせリポジトリトレイト
#[async_trait]
pub trait ContactMessageRepository: Send + Sync {
    /// お問い合わせを 1 件挿入する
    async fn insert(&self, submission: &ContactSubmission) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の ContactMessageRepository
#[derive(Debug, Clone)]
pub struct PostgresContactMessageRepository {
    pool: PgPool,
}

impl PostgresContactMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactMessageRepository for PostgresContactMessageRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(contact.id = %submission.id()))]
    async fn insert(&self, submission: &ContactSubmission) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            INSERT INTO contact_messages (id, name, email, subject, message, received_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(submission.id().as_uuid())
        .bind(submission.name())
        .bind(submission.email().as_str())
        .bind(submission.subject())
        .bind(submission.message())
        .bind(submission.received_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
