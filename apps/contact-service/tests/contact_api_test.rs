//! # お問い合わせ API の結合テスト
//!
//! 組み立て済みのルーターに `oneshot` でリクエストを送り、
//! ステータスコード・レスポンスボディ・保存と通知の副作用を検証する。

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::{Body, to_bytes},
};
use chrono::{TimeZone, Utc};
use http::{Method, Request, StatusCode, header};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use toiawase_contact_service::{
    app_builder::build_app,
    error::DiagnosticsMode,
    usecase::{ContactUseCaseImpl, TemplateRenderer},
};
use toiawase_domain::{clock::FixedClock, contact::EmailAddress, origin::AllowedOriginSet};
use toiawase_infra::mock::{MockContactMessageRepository, MockNotificationSender};
use tower::ServiceExt;

struct TestApp {
    app:        Router,
    repository: MockContactMessageRepository,
    sender:     MockNotificationSender,
}

fn test_app(diagnostics: DiagnosticsMode) -> TestApp {
    let repository = MockContactMessageRepository::new();
    let sender = MockNotificationSender::new();
    let usecase = ContactUseCaseImpl::new(
        Arc::new(repository.clone()),
        Arc::new(sender.clone()),
        Arc::new(TemplateRenderer::new().unwrap()),
        Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap(),
        )),
        EmailAddress::parse("ops@example.com").unwrap(),
        Duration::from_secs(30),
    );
    let app = build_app(
        Arc::new(AllowedOriginSet::parse("https://example.com").unwrap()),
        diagnostics,
        usecase,
    );
    TestApp {
        app,
        repository,
        sender,
    }
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn ada() -> Value {
    json!({
        "name": "Ada",
        "email": "ada@example.com",
        "subject": "Hi",
        "message": "Hello"
    })
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn wait_for_inserts(repository: &MockContactMessageRepository, expected: usize) {
    for _ in 0..100 {
        if repository.inserted().len() >= expected {
            return;
        }
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_正常なお問い合わせは200を返し保存と通知を行う() {
    let TestApp {
        app,
        repository,
        sender,
    } = test_app(DiagnosticsMode::Hidden);

    let response = app.oneshot(post_json("/contact", &ada())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "success": true, "message": "Message received successfully" })
    );

    wait_for_inserts(&repository, 1).await;
    let inserted = repository.inserted();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].name(), "Ada");
    assert_eq!(inserted[0].email().as_str(), "ada@example.com");
    assert_eq!(inserted[0].subject(), "Hi");
    assert_eq!(inserted[0].message(), "Hello");

    let sent = sender.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ops@example.com");
    assert_eq!(sent[0].reply_to.as_deref(), Some("ada@example.com"));
}

#[tokio::test]
async fn test_旧パスでも受け付ける() {
    let TestApp { app, sender, .. } = test_app(DiagnosticsMode::Hidden);

    let response = app
        .oneshot(post_json("/auth/contactus", &ada()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(sender.sent().len(), 1);
}

#[rstest]
#[case::name欠落(json!({ "email": "ada@example.com", "subject": "Hi", "message": "Hello" }), "All fields are required")]
#[case::message空文字(json!({ "name": "Ada", "email": "ada@example.com", "subject": "Hi", "message": "" }), "All fields are required")]
#[case::subject空文字(json!({ "name": "Ada", "email": "ada@example.com", "subject": "", "message": "Hello" }), "All fields are required")]
#[case::メール形式不正(json!({ "name": "Ada", "email": "not-an-email", "subject": "Hi", "message": "Hello" }), "Please provide a valid email address")]
#[case::欠落とメール不正の両方(json!({ "name": "Ada", "email": "bad", "subject": "Hi" }), "All fields are required")]
#[tokio::test]
async fn test_検証エラーは400を返し副作用なし(#[case] body: Value, #[case] expected: &str) {
    let TestApp {
        app,
        repository,
        sender,
    } = test_app(DiagnosticsMode::Exposed);

    let response = app.oneshot(post_json("/contact", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({ "success": false, "message": expected })
    );
    tokio::task::yield_now().await;
    assert!(repository.inserted().is_empty());
    assert!(sender.sent().is_empty());
}

#[tokio::test]
async fn test_空白のみの項目は受け付けてそのまま保存する() {
    let TestApp {
        app,
        repository,
        sender,
    } = test_app(DiagnosticsMode::Hidden);
    let body = json!({ "name": "   ", "email": "ada@example.com", "subject": "Hi", "message": "Hello" });

    let response = app.oneshot(post_json("/contact", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    wait_for_inserts(&repository, 1).await;
    assert_eq!(repository.inserted()[0].name(), "   ");
    assert_eq!(sender.sent().len(), 1);
}

#[tokio::test]
async fn test_jsonとして解釈できないボディは400を返す() {
    let TestApp { app, sender, .. } = test_app(DiagnosticsMode::Hidden);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({ "success": false, "message": "Invalid request body" })
    );
    assert!(sender.sent().is_empty());
}

#[tokio::test]
async fn test_フィールドの型が違うボディは400を返す() {
    let TestApp { app, .. } = test_app(DiagnosticsMode::Hidden);

    let body = json!({ "name": 42, "email": "ada@example.com", "subject": "Hi", "message": "Hello" });
    let response = app.oneshot(post_json("/contact", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "Invalid request body");
}

#[tokio::test]
async fn test_送信失敗は500を返し原因を隠す() {
    let TestApp {
        app,
        repository,
        sender,
    } = test_app(DiagnosticsMode::Hidden);
    sender.fail_with("535 authentication failed");

    let response = app.oneshot(post_json("/contact", &ada())).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({ "success": false, "message": "Something went wrong" })
    );
    // 保存は通知の結果に関わらず行われる
    wait_for_inserts(&repository, 1).await;
    assert_eq!(repository.inserted().len(), 1);
}

#[tokio::test]
async fn test_開発環境では送信失敗の診断情報を返す() {
    let TestApp { app, sender, .. } = test_app(DiagnosticsMode::Exposed);
    sender.fail_with("535 authentication failed");

    let response = app.oneshot(post_json("/contact", &ada())).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Something went wrong");
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("535 authentication failed"),
        "{body}"
    );
}

#[tokio::test]
async fn test_保存に失敗しても200を返す() {
    let TestApp {
        app,
        repository,
        sender,
    } = test_app(DiagnosticsMode::Hidden);
    repository.fail_with("connection refused");

    let response = app.oneshot(post_json("/contact", &ada())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["success"], true);
    assert_eq!(sender.sent().len(), 1);
}

#[tokio::test]
async fn test_cors_testは固定メッセージを返す() {
    let TestApp { app, .. } = test_app(DiagnosticsMode::Hidden);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/cors-test")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "message": "CORS is working correctly!" })
    );
}

#[tokio::test]
async fn test_healthはバージョンを返す() {
    let TestApp { app, .. } = test_app(DiagnosticsMode::Hidden);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "status": "healthy", "version": env!("CARGO_PKG_VERSION") })
    );
}

#[tokio::test]
async fn test_未定義のパスは404を返す() {
    let TestApp { app, .. } = test_app(DiagnosticsMode::Hidden);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/no-such-path")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await,
        json!({ "success": false, "message": "Not Found" })
    );
}

#[tokio::test]
async fn test_全レスポンスにrequest_idとno_storeが付与される() {
    let TestApp { app, .. } = test_app(DiagnosticsMode::Hidden);

    let response = app.oneshot(post_json("/contact", &ada())).await.unwrap();

    let request_id = response
        .headers()
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(
        uuid::Uuid::parse_str(request_id).unwrap().get_version_num(),
        7
    );
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );
}

#[tokio::test]
async fn test_クライアント提供のrequest_idがそのまま返される() {
    let TestApp { app, .. } = test_app(DiagnosticsMode::Hidden);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "client-provided-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "client-provided-id"
    );
}
