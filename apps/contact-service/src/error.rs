//! # Contact Service エラー定義
//!
//! ハンドラで発生するエラーと、HTTP レスポンスへの変換を定義する。
//!
//! レスポンスは常に `{ "success": false, "message": "..." }` 形式。
//! 5xx の原因はログにのみ出力し、[`DiagnosticsMode::Exposed`] の場合に限り
//! `error` フィールドとしてクライアントにも返す。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use toiawase_shared::{ApiResponse, event_log::error as log_error};

use crate::usecase::contact::SubmitContactError;

/// サーバーエラー時の固定メッセージ
pub const SERVER_ERROR_MESSAGE: &str = "Something went wrong";
/// リクエストボディを解釈できない場合のメッセージ
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// サーバーエラーの診断情報をクライアントに返すか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticsMode {
    /// 返さない（staging / production）
    #[default]
    Hidden,
    /// 返す（development）
    Exposed,
}

/// Contact Service で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// 入力が不正（400）
    #[error("{0}")]
    BadRequest(String),

    /// ルートが存在しない（404）
    #[error("Not Found")]
    NotFound,

    /// サーバー側の失敗（500）
    #[error("サーバーエラー: {cause}")]
    Internal {
        /// `error.category` ログフィールドの値
        category:    &'static str,
        /// `error.kind` ログフィールドの値
        kind:        &'static str,
        cause:       String,
        diagnostics: DiagnosticsMode,
    },
}

impl ApiError {
    /// ユースケースのエラーを変換する
    pub fn from_submit_error(error: SubmitContactError, diagnostics: DiagnosticsMode) -> Self {
        match error {
            SubmitContactError::Validation(e) => Self::BadRequest(e.to_string()),
            SubmitContactError::Delivery(e) => Self::Internal {
                category: log_error::category::EXTERNAL_SERVICE,
                kind: log_error::kind::MAIL_DELIVERY,
                cause: e.to_string(),
                diagnostics,
            },
            SubmitContactError::Unexpected(cause) => Self::Internal {
                category: log_error::category::APPLICATION,
                kind: log_error::kind::INTERNAL,
                cause,
                diagnostics,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ApiResponse::failure(message))).into_response()
            }
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Json(ApiResponse::failure("Not Found"))).into_response()
            }
            ApiError::Internal {
                category,
                kind,
                cause,
                diagnostics,
            } => {
                tracing::error!(
                    error.category = category,
                    error.kind = kind,
                    "サーバーエラー: {}",
                    cause
                );
                let body = match diagnostics {
                    DiagnosticsMode::Exposed => {
                        ApiResponse::failure(SERVER_ERROR_MESSAGE).with_error(cause)
                    }
                    DiagnosticsMode::Hidden => ApiResponse::failure(SERVER_ERROR_MESSAGE),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
