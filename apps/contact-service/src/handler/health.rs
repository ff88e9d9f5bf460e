//! # ヘルスチェックハンドラ
//!
//! `/health`: Liveness Check（常に `"healthy"` を返す）。
//! DB やメールリレーの状態は見ない（どちらが落ちていても受付処理自体は動くため）。

use axum::Json;
use toiawase_shared::HealthResponse;

/// Contact Service のヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}
