//! # お問い合わせハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /contact` - お問い合わせ受付
//! - `POST /auth/contactus` - 旧パス（同じハンドラ）

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use serde::Deserialize;
use toiawase_domain::contact::ContactForm;
use toiawase_shared::ApiResponse;

use crate::{
    error::{ApiError, DiagnosticsMode, INVALID_BODY_MESSAGE},
    usecase::ContactUseCaseImpl,
};

/// 受付成功時のメッセージ
pub const SUCCESS_MESSAGE: &str = "Message received successfully";

/// お問い合わせハンドラの共有状態
pub struct ContactState {
    pub usecase:     ContactUseCaseImpl,
    pub diagnostics: DiagnosticsMode,
}

/// お問い合わせリクエスト
///
/// 欠けたフィールドはデシリアライズ時点では許容し、検証で「必須」として扱う。
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactRequest {
    pub name:    Option<String>,
    pub email:   Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

impl From<ContactRequest> for ContactForm {
    fn from(req: ContactRequest) -> Self {
        Self {
            name:    req.name,
            email:   req.email,
            subject: req.subject,
            message: req.message,
        }
    }
}

/// POST /contact
///
/// 検証 → 保存（待たない）→ 運用者への通知 を行い、通知の成否で応答する。
pub async fn submit_contact(
    State(state): State<Arc<ContactState>>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!("リクエストボディを解釈できません: {}", rejection.body_text());
        ApiError::BadRequest(INVALID_BODY_MESSAGE.to_string())
    })?;

    state
        .usecase
        .submit(req.into())
        .await
        .map_err(|e| ApiError::from_submit_error(e, state.diagnostics))?;

    Ok(Json(ApiResponse::success(SUCCESS_MESSAGE)))
}
