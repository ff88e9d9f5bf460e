//! # Contact Service サーバー
//!
//! お問い合わせフォームの受付サーバー。
//!
//! ## 役割
//!
//! - **アドミッション**: 許可オリジンの判定とプリフライト応答
//! - **受付**: 入力検証、PostgreSQL への保存（待たない）、運用者へのメール通知
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `CONTACT_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `PORT` | **Yes** | ポート番号 |
//! | `ENVIRONMENT` | No | `development` / `staging` / `production`（デフォルト） |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `ALLOWED_ORIGINS` | **Yes** | 許可オリジン（カンマ区切り） |
//! | `NOTIFICATION_BACKEND` | No | `smtp`（デフォルト）/ `noop` |
//! | `SMTP_HOST` | smtp 時 | SMTP リレーのホスト |
//! | `SMTP_PORT` / `SMTP_TLS` | No | ポート（587）/ STARTTLS（true） |
//! | `SMTP_USERNAME` / `SMTP_PASSWORD` | No | 認証情報（両方指定または両方省略） |
//! | `OPERATOR_MAILBOX` | No | 通知先（デフォルト: `SMTP_USERNAME`） |
//! | `NOTIFICATION_FROM_ADDRESS` | No | From ヘッダー（デフォルト: 通知先） |
//! | `MAIL_SEND_TIMEOUT_SECS` | No | 送信待ちの上限秒数（30） |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env ファイルを使用）
//! cargo run -p toiawase-contact-service
//!
//! # 本番環境（環境変数を直接指定）
//! PORT=5000 DATABASE_URL=postgres://... ALLOWED_ORIGINS=https://example.com \
//!   SMTP_HOST=smtp.example.com cargo run -p toiawase-contact-service --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use tokio::net::TcpListener;
use toiawase_contact_service::{
    app_builder::build_app,
    config::{ContactServiceConfig, NotificationBackend},
    usecase::{ContactUseCaseImpl, TemplateRenderer},
};
use toiawase_domain::clock::SystemClock;
use toiawase_infra::{
    NotificationSender,
    db,
    notification::{NoopNotificationSender, SmtpNotificationSender},
    repository::PostgresContactMessageRepository,
};
use toiawase_shared::observability::TracingConfig;

/// Contact Service サーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. 依存関係（DB プール、メール送信）の初期化
/// 5. ルーターの構築と HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 本番環境では .env ファイルは使用せず、環境変数を直接設定する
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("contact-service");
    toiawase_shared::observability::init_tracing(tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "contact-service").entered();

    let config = ContactServiceConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        environment = ?config.environment,
        allowed_origins = ?config.allowed_origins.iter().collect::<Vec<_>>(),
        "Contact Service を起動します: {}:{}",
        config.host,
        config.port
    );

    // DB は遅延接続。停止していても起動は続行する（保存はベストエフォート）
    let pool = db::create_pool(&config.database_url).context("DATABASE_URL が不正です")?;
    match db::run_migrations(&pool).await {
        Ok(()) => tracing::info!("マイグレーションを適用しました"),
        Err(e) => tracing::error!(
            error.category = toiawase_shared::event_log::error::category::INFRASTRUCTURE,
            error.kind = toiawase_shared::event_log::error::kind::DATABASE,
            "マイグレーションに失敗しました（保存できない状態で起動します）: {}",
            e
        ),
    }
    let repository = Arc::new(PostgresContactMessageRepository::new(pool));

    let sender: Arc<dyn NotificationSender> = match &config.notification.backend {
        NotificationBackend::Smtp(settings) => {
            tracing::info!(host = %settings.host, port = settings.port, tls = settings.tls, "SMTP で通知します");
            Arc::new(
                SmtpNotificationSender::new(settings.clone())
                    .context("SMTP 送信の初期化に失敗しました")?,
            )
        }
        NotificationBackend::Noop => {
            tracing::warn!("NOTIFICATION_BACKEND=noop: 通知メールは送信されません");
            Arc::new(NoopNotificationSender)
        }
    };

    let renderer = TemplateRenderer::new().context("メールテンプレートの読み込みに失敗しました")?;
    let usecase = ContactUseCaseImpl::new(
        repository,
        sender,
        Arc::new(renderer),
        Arc::new(SystemClock),
        config.notification.operator_mailbox.clone(),
        config.notification.send_timeout,
    );

    let app = build_app(
        Arc::new(config.allowed_origins.clone()),
        config.environment.diagnostics_mode(),
        usecase,
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("バインドアドレスのパースに失敗しました")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Contact Service が起動しました: {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Contact Service を停止しました");
    Ok(())
}

/// Ctrl-C を受けたら新規受付を止める（処理中のリクエストは完了を待つ）
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("シグナルハンドラの登録に失敗しました: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("停止シグナルを受信しました");
}
