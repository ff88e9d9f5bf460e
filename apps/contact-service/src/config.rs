//! # Contact Service 設定
//!
//! 環境変数からサーバーの設定を読み込む。起動時に一度だけ構築し、以後は不変。
//!
//! 読み込みはルックアップ関数経由で行うため、テストでは環境変数を汚さずに
//! [`ContactServiceConfig::from_lookup`] へ値を渡せる。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|-----------|------|
//! | `CONTACT_HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `PORT` | **Yes** | - | ポート番号 |
//! | `ENVIRONMENT` | No | `production` | `development` / `staging` / `production` |
//! | `DATABASE_URL` | **Yes** | - | PostgreSQL 接続 URL |
//! | `ALLOWED_ORIGINS` | **Yes** | - | 許可オリジン（カンマ区切り） |
//! | `NOTIFICATION_BACKEND` | No | `smtp` | `smtp` / `noop` |
//! | `SMTP_HOST` | smtp 時 | - | SMTP リレーのホスト |
//! | `SMTP_PORT` | No | `587` | SMTP リレーのポート |
//! | `SMTP_TLS` | No | `true` | STARTTLS を使うか |
//! | `SMTP_USERNAME` / `SMTP_PASSWORD` | No | - | SMTP 認証情報（両方設定するか両方未設定） |
//! | `OPERATOR_MAILBOX` | No | `SMTP_USERNAME` | お問い合わせの通知先 |
//! | `NOTIFICATION_FROM_ADDRESS` | No | 通知先と同じ | 通知メールの送信元 |
//! | `MAIL_SEND_TIMEOUT_SECS` | No | `30` | メール送信の待ち時間上限（秒） |

use std::{str::FromStr, time::Duration};

use thiserror::Error;
use toiawase_domain::{DomainError, contact::EmailAddress, origin::AllowedOriginSet};
use toiawase_infra::notification::{SmtpCredentials, SmtpSettings};

use crate::error::DiagnosticsMode;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_MAIL_SEND_TIMEOUT_SECS: u64 = 30;

/// 設定読み込みエラー
///
/// いずれも起動を中止する。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    #[error("{name} の値が不正です: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("ALLOWED_ORIGINS が不正です: {0}")]
    AllowedOrigins(#[from] DomainError),

    #[error("SMTP_USERNAME と SMTP_PASSWORD は両方設定するか、両方未設定にしてください")]
    PartialCredentials,
}

/// 実行環境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    Staging,
    #[default]
    Production,
}

impl Environment {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "development" => Some(Self::Development),
            "staging" => Some(Self::Staging),
            "production" => Some(Self::Production),
            _ => None,
        }
    }

    /// 開発環境でのみサーバーエラーの診断情報を返す
    pub fn diagnostics_mode(self) -> DiagnosticsMode {
        match self {
            Self::Development => DiagnosticsMode::Exposed,
            Self::Staging | Self::Production => DiagnosticsMode::Hidden,
        }
    }
}

/// Contact Service サーバーの設定
#[derive(Debug, Clone)]
pub struct ContactServiceConfig {
    pub host:            String,
    pub port:            u16,
    pub environment:     Environment,
    pub database_url:    String,
    pub allowed_origins: AllowedOriginSet,
    pub notification:    NotificationConfig,
}

/// 通知メールの送信バックエンド
#[derive(Debug, Clone)]
pub enum NotificationBackend {
    Smtp(SmtpSettings),
    /// 送信しない（ログ出力のみ）
    Noop,
}

/// 通知機能の設定
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub backend:          NotificationBackend,
    /// お問い合わせの通知先
    pub operator_mailbox: EmailAddress,
    pub send_timeout:     Duration,
}

impl ContactServiceConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// ルックアップ関数から設定を読み込む
    ///
    /// 空文字列（空白のみを含む）の値は未設定として扱う。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };

        let environment = match vars.optional("ENVIRONMENT") {
            Some(value) => Environment::parse(&value).ok_or(ConfigError::Invalid {
                name: "ENVIRONMENT",
                value,
            })?,
            None => Environment::default(),
        };

        Ok(Self {
            host: vars
                .optional("CONTACT_HOST")
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: vars.parse("PORT")?.ok_or(ConfigError::Missing("PORT"))?,
            environment,
            database_url: vars.required("DATABASE_URL")?,
            allowed_origins: AllowedOriginSet::parse(&vars.required("ALLOWED_ORIGINS")?)?,
            notification: NotificationConfig::from_vars(&vars)?,
        })
    }
}

impl NotificationConfig {
    fn from_vars<F>(vars: &Vars<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = vars.optional("SMTP_USERNAME");
        let password = vars.optional("SMTP_PASSWORD");

        let operator_mailbox = vars
            .optional("OPERATOR_MAILBOX")
            .or_else(|| username.clone())
            .ok_or(ConfigError::Missing("OPERATOR_MAILBOX"))?;
        let operator_mailbox =
            EmailAddress::parse(operator_mailbox.clone()).map_err(|_| ConfigError::Invalid {
                name:  "OPERATOR_MAILBOX",
                value: operator_mailbox,
            })?;

        let backend = match vars.optional("NOTIFICATION_BACKEND").as_deref() {
            None | Some("smtp") => {
                let credentials = match (username, password) {
                    (Some(username), Some(password)) => Some(SmtpCredentials { username, password }),
                    (None, None) => None,
                    _ => return Err(ConfigError::PartialCredentials),
                };
                NotificationBackend::Smtp(SmtpSettings {
                    host: vars.required("SMTP_HOST")?,
                    port: vars.parse("SMTP_PORT")?.unwrap_or(DEFAULT_SMTP_PORT),
                    tls: vars.parse("SMTP_TLS")?.unwrap_or(true),
                    credentials,
                    from_address: vars
                        .optional("NOTIFICATION_FROM_ADDRESS")
                        .unwrap_or_else(|| operator_mailbox.as_str().to_string()),
                })
            }
            Some("noop") => NotificationBackend::Noop,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name:  "NOTIFICATION_BACKEND",
                    value: other.to_string(),
                });
            }
        };

        let timeout_secs = vars
            .parse("MAIL_SEND_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_MAIL_SEND_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name:  "MAIL_SEND_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            backend,
            operator_mailbox,
            send_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::Missing(name))
    }

    fn parse<T: FromStr>(&self, name: &'static str) -> Result<Option<T>, ConfigError> {
        self.optional(name)
            .map(|value| {
                value
                    .parse()
                    .map_err(|_| ConfigError::Invalid { name, value })
            })
            .transpose()
    }
}
