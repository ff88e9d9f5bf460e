//! # Toiawase Contact Service
//!
//! Web サイトのお問い合わせフォームを受け付け、運用者へメールで通知するサービス。
//!
//! ## 構成
//!
//! ```text
//! Browser ──▶ アドミッションゲート（CORS・プリフライト）
//!                 │
//!                 ▼
//!             ハンドラ ──▶ ユースケース ──┬─▶ PostgreSQL（待たない）
//!                                         └─▶ SMTP リレー（待つ）
//! ```
//!
//! - [`middleware`]: アドミッションゲート、キャッシュ制御
//! - [`handler`]: HTTP ハンドラ
//! - [`usecase`]: 受付の流れ
//! - [`app_builder`]: ルーター構築
//! - [`config`]: 環境変数からの設定読み込み

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod usecase;
