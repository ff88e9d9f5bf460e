//! # API レスポンスエンベロープ
//!
//! 公開 API の統一レスポンス形式 `{ "success": bool, "message": string }` を提供する。
//! 開発環境のサーバーエラーに限り、診断用の `error` フィールドを付与する。

use serde::{Deserialize, Serialize};

/// 公開 API の統一レスポンス型
///
/// ## 使用例
///
/// ```
/// use toiawase_shared::ApiResponse;
///
/// let response = ApiResponse::success("Message received successfully");
/// assert!(response.success);
/// assert_eq!(response.error, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    /// 診断情報（開発環境のサーバーエラー時のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error:   Option<String>,
}

impl ApiResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error:   None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error:   None,
        }
    }

    /// 診断情報を付与する
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}
