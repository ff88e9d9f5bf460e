//! # クロスオリジン許可リスト
//!
//! ブラウザからの呼び出しを許可するオリジンの集合。
//! 起動時に `ALLOWED_ORIGINS`（カンマ区切り）から一度だけ構築し、以後は読み取り専用。
//!
//! ## 正規化ルール
//!
//! - 各要素の前後の空白を除去する
//! - 末尾の `/` を 1 つ除去する
//! - 空要素は無視する
//! - 重複は最初の出現位置を残して除去する
//! - `http://` または `https://` で始まらない要素はエラー
//!
//! 照合は正規化後の文字列との完全一致（大文字小文字を区別する）。

use crate::DomainError;

/// 許可オリジンの集合（値オブジェクト）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedOriginSet {
    origins: Vec<String>,
}

impl AllowedOriginSet {
    /// カンマ区切りの文字列から集合を構築する
    ///
    /// # Errors
    ///
    /// スキームが `http://` / `https://` でない要素を含む場合
    /// [`DomainError::Validation`] を返す。
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        Self::from_origins(raw.split(','))
    }

    /// オリジンの列から集合を構築する
    pub fn from_origins<I, S>(origins: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();

        for origin in origins {
            let origin = origin.as_ref().trim();
            let origin = origin.strip_suffix('/').unwrap_or(origin);
            if origin.is_empty() {
                continue;
            }
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                return Err(DomainError::Validation(format!(
                    "許可オリジンは http:// または https:// で始まる必要があります: {origin}"
                )));
            }
            if !normalized.iter().any(|existing| existing == origin) {
                normalized.push(origin.to_string());
            }
        }

        Ok(Self {
            origins: normalized,
        })
    }

    /// オリジンが許可されているか
    pub fn contains(&self, origin: &str) -> bool {
        self.origins.iter().any(|allowed| allowed == origin)
    }

    /// 正規化済みのオリジン（設定順）
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.origins.iter().map(String::as_str)
    }
}
