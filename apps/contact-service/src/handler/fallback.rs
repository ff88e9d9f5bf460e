//! # 未定義ルート

use crate::error::ApiError;

/// どのルートにも一致しないリクエスト
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
