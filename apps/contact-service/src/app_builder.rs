//! # Contact Service アプリケーション構築
//!
//! State の初期化とルーター構築を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::{any::Any, sync::Arc};

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use toiawase_domain::origin::AllowedOriginSet;
use toiawase_shared::{
    canonical_log::CanonicalLogLineLayer,
    event_log::error as log_error,
    observability::{MakeRequestUuidV7, make_request_span},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    error::{ApiError, DiagnosticsMode},
    handler::{ContactState, cors_test, health_check, not_found, submit_contact},
    middleware::{AdmissionState, admission_gate, no_cache},
    usecase::ContactUseCaseImpl,
};

/// ルーターを構築する
///
/// 初期化済みのユースケースと許可オリジンを受け取り、State → Router の順に組み立てる。
pub fn build_app(
    allowed_origins: Arc<AllowedOriginSet>,
    diagnostics: DiagnosticsMode,
    usecase: ContactUseCaseImpl,
) -> Router {
    let contact_state = Arc::new(ContactState {
        usecase,
        diagnostics,
    });
    let admission_state = AdmissionState { allowed_origins };

    Router::new()
        .route("/contact", post(submit_contact))
        // 旧フロントエンドが使っていたパス
        .route("/auth/contactus", post(submit_contact))
        .with_state(contact_state)
        .route("/cors-test", get(cors_test))
        .route("/health", get(health_check))
        .fallback(not_found)
        // ハンドラのパニックを 500 に変換する
        .layer(CatchPanicLayer::custom(
            move |panic: Box<dyn Any + Send + 'static>| panic_response(panic, diagnostics),
        ))
        // アドミッションゲート: OPTIONS はここで 204 を返し、ルーティングに渡さない
        .layer(from_fn_with_state(admission_state, admission_gate))
        .layer(from_fn(no_cache))
        // Request ID レイヤー（下に書いたものが外側）
        // 1. SetRequestIdLayer（最外）: UUID v7 を生成（またはクライアント提供値を使用）
        // 2. TraceLayer: スパンに request_id を含め、全ログに自動注入
        // 3. CanonicalLogLineLayer: リクエスト完了時に 1 行サマリログを出力
        // 4. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}

fn panic_response(panic: Box<dyn Any + Send + 'static>, diagnostics: DiagnosticsMode) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "不明なパニック".to_string()
    };

    ApiError::Internal {
        category: log_error::category::APPLICATION,
        kind: log_error::kind::INTERNAL,
        cause: format!("ハンドラがパニックしました: {detail}"),
        diagnostics,
    }
    .into_response()
}
