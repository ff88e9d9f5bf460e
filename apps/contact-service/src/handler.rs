//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置し、親モジュールで re-export する
//! - ハンドラは薄く保ち、受付の流れは [`crate::usecase`] に委譲
//!
//! ## ハンドラ一覧
//!
//! - `contact`: お問い合わせ受付
//! - `cors_test`: CORS 疎通確認
//! - `health`: ヘルスチェック
//! - `fallback`: 未定義ルート

pub mod contact;
pub mod fallback;
pub mod health;

pub use contact::{ContactRequest, ContactState, SUCCESS_MESSAGE, submit_contact};
pub use cors_test::cors_test;
pub use fallback::not_found;
pub use health::health_check;
