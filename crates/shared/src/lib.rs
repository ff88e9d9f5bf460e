//! # Toiawase 共有ユーティリティ
//!
//! HTTP レスポンス形式とログ基盤など、ビジネスロジックを含まない共通部品を提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - tracing / tower 系の依存は `observability` feature の背後に置く

pub mod api_response;
#[cfg(feature = "observability")]
pub mod canonical_log;
pub mod event_log;
pub mod health;
pub mod observability;

pub use api_response::ApiResponse;
pub use health::HealthResponse;
