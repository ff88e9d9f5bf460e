//! ContactMessageRepository 統合テスト
//!
//! データベースを使用したテスト。sqlx::test マクロがテストごとに
//! 専用データベースを作成し、マイグレーションを適用する。
//!
//! 実行方法（`DATABASE_URL` が必要）:
//! ```bash
//! cargo test -p toiawase-infra --test contact_message_repository_test -- --ignored
//! ```

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use sqlx::{PgPool, Row};
use toiawase_domain::contact::{ContactForm, ContactSubmission, ContactSubmissionId};
use toiawase_infra::repository::{ContactMessageRepository, PostgresContactMessageRepository};

fn submission(name: &str) -> ContactSubmission {
    let validated = ContactForm {
        name:    Some(name.to_string()),
        email:   Some("ada@example.com".to_string()),
        subject: Some("Hi".to_string()),
        message: Some("Hello\nWorld".to_string()),
    }
    .validate()
    .unwrap();

    ContactSubmission::new(
        ContactSubmissionId::new(),
        validated,
        Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap(),
    )
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "DATABASE_URL が必要"]
async fn test_お問い合わせを挿入できる(pool: PgPool) {
    let sut = PostgresContactMessageRepository::new(pool.clone());
    let submission = submission("Ada");

    sut.insert(&submission).await.unwrap();

    let row = sqlx::query(
        "SELECT name, email, subject, message, received_at FROM contact_messages WHERE id = $1",
    )
    .bind(submission.id().as_uuid())
    .fetch_one(&pool)
    .await
    .unwrap();

    assert_eq!(row.get::<String, _>("name"), "Ada");
    assert_eq!(row.get::<String, _>("email"), "ada@example.com");
    assert_eq!(row.get::<String, _>("subject"), "Hi");
    assert_eq!(row.get::<String, _>("message"), "Hello\nWorld");
    assert_eq!(
        row.get::<chrono::DateTime<Utc>, _>("received_at"),
        submission.received_at()
    );
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "DATABASE_URL が必要"]
async fn test_同じ内容でも別レコードとして保存される(pool: PgPool) {
    let sut = PostgresContactMessageRepository::new(pool.clone());

    sut.insert(&submission("Ada")).await.unwrap();
    sut.insert(&submission("Ada")).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contact_messages")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "DATABASE_URL が必要"]
async fn test_同じidの二重挿入はエラーになる(pool: PgPool) {
    let sut = PostgresContactMessageRepository::new(pool);
    let submission = submission("Ada");

    sut.insert(&submission).await.unwrap();
    let result = sut.insert(&submission).await;

    assert!(result.is_err());
}
