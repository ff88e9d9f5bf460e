//! # アドミッションゲート（CORS・プリフライト）
//!
//! すべてのリクエストの最初の段で `Origin` ヘッダーを許可リストと照合し、
//! レスポンスに CORS ヘッダーを付与する。`OPTIONS` はルーティングに渡さず
//! その場で `204 No Content` を返す。
//!
//! ## 判定ルール
//!
//! | `Origin` | 判定 | 付与するヘッダー |
//! |----------|------|------------------|
//! | なし | 同一オリジン扱い | なし |
//! | 許可リストに含まれる | 許可 | `Access-Control-Allow-Origin: <そのオリジン>` + `Allow-Credentials` |
//! | 許可リストに含まれない | 拒否 | `Vary: Origin` のみ |
//!
//! 拒否してもリクエスト自体は処理する（ブラウザがレスポンスを読めないだけ）。
//! ワイルドカード `*` は出力しない。
//!
//! ## 設計方針
//!
//! - 判定は純粋関数 [`decide`] に分離し、ミドルウェア [`admission_gate`] は適用のみ行う
//! - 状態は起動時に構築した許可リストのみ（読み取り専用）

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use toiawase_domain::origin::AllowedOriginSet;

const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";
const EXPOSE_HEADERS: &str = "Content-Range, X-Content-Range";
const MAX_AGE_SECONDS: &str = "86400";

/// アドミッションゲートの状態
#[derive(Clone)]
pub struct AdmissionState {
    pub allowed_origins: Arc<AllowedOriginSet>,
}

/// `Origin` ヘッダーの判定結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginVerdict {
    /// `Origin` ヘッダーなし
    Absent,
    /// 許可リストに含まれる（ヘッダー値をそのまま返す）
    Allowed(HeaderValue),
    /// 許可リストに含まれない（ログ出力用の文字列）
    Denied(String),
}

/// リクエスト 1 件に対する判定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionDecision {
    pub origin:    OriginVerdict,
    /// `OPTIONS` リクエスト（ルーティングせずに 204 を返す）
    pub preflight: bool,
}

/// メソッドと `Origin` ヘッダーから判定する
pub fn decide(
    method: &Method,
    origin: Option<&HeaderValue>,
    allowed_origins: &AllowedOriginSet,
) -> AdmissionDecision {
    let origin = match origin {
        None => OriginVerdict::Absent,
        Some(value) => match value.to_str() {
            Ok(origin) if allowed_origins.contains(origin) => OriginVerdict::Allowed(value.clone()),
            Ok(origin) => OriginVerdict::Denied(origin.to_string()),
            // 非 UTF-8 は許可リストに含まれ得ない
            Err(_) => OriginVerdict::Denied(String::from_utf8_lossy(value.as_bytes()).into_owned()),
        },
    };

    AdmissionDecision {
        origin,
        preflight: method == Method::OPTIONS,
    }
}

impl AdmissionDecision {
    /// 判定に応じた CORS ヘッダーをレスポンスに付与する
    pub fn apply(&self, headers: &mut HeaderMap) {
        if self.origin == OriginVerdict::Absent {
            return;
        }
        headers.append(header::VARY, HeaderValue::from_static("Origin"));

        let OriginVerdict::Allowed(origin) = &self.origin else {
            return;
        };
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );

        if self.preflight {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOW_METHODS),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOW_HEADERS),
            );
            headers.insert(
                header::ACCESS_CONTROL_MAX_AGE,
                HeaderValue::from_static(MAX_AGE_SECONDS),
            );
        } else {
            headers.insert(
                header::ACCESS_CONTROL_EXPOSE_HEADERS,
                HeaderValue::from_static(EXPOSE_HEADERS),
            );
        }
    }
}

/// アドミッションゲートミドルウェア
///
/// `from_fn_with_state(AdmissionState, admission_gate)` として全ルートに適用する。
pub async fn admission_gate(
    State(state): State<AdmissionState>,
    request: Request,
    next: Next,
) -> Response {
    let decision = decide(
        request.method(),
        request.headers().get(header::ORIGIN),
        &state.allowed_origins,
    );

    if let OriginVerdict::Denied(origin) = &decision.origin {
        tracing::warn!(
            origin = %origin,
            method = %request.method(),
            path = %request.uri().path(),
            "許可されていないオリジンからのリクエスト"
        );
    }

    let mut response = if decision.preflight {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };
    decision.apply(response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{Router, body::Body, middleware::from_fn_with_state, routing::post};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tower::ServiceExt;

    use super::*;

    fn allowed() -> AllowedOriginSet {
        AllowedOriginSet::parse("https://example.com,http://localhost:3000").unwrap()
    }

    #[test]
    fn test_originがなければabsent() {
        let decision = decide(&Method::POST, None, &allowed());

        assert_eq!(
            decision,
            AdmissionDecision {
                origin:    OriginVerdict::Absent,
                preflight: false,
            }
        );
    }

    #[test]
    fn test_許可リストのoriginはallowed() {
        let origin = HeaderValue::from_static("http://localhost:3000");

        let decision = decide(&Method::POST, Some(&origin), &allowed());

        assert_eq!(decision.origin, OriginVerdict::Allowed(origin));
    }

    #[rstest]
    #[case::未登録("https://evil.example")]
    #[case::末尾スラッシュ付き("https://example.com/")]
    #[case::大文字小文字違い("https://EXAMPLE.com")]
    #[case::null("null")]
    fn test_許可リストにないoriginはdenied(#[case] origin: &'static str) {
        let decision = decide(
            &Method::POST,
            Some(&HeaderValue::from_static(origin)),
            &allowed(),
        );

        assert_eq!(decision.origin, OriginVerdict::Denied(origin.to_string()));
    }

    #[test]
    fn test_非utf8のoriginはdenied() {
        let origin = HeaderValue::from_bytes(b"https://\xffexample.com").unwrap();

        let decision = decide(&Method::POST, Some(&origin), &allowed());

        assert!(matches!(decision.origin, OriginVerdict::Denied(_)));
    }

    #[rstest]
    #[case(Method::OPTIONS, true)]
    #[case(Method::POST, false)]
    #[case(Method::GET, false)]
    fn test_optionsのみプリフライト扱い(#[case] method: Method, #[case] expected: bool) {
        assert_eq!(decide(&method, None, &allowed()).preflight, expected);
    }

    #[test]
    fn test_許可時のプリフライトヘッダー() {
        let decision = AdmissionDecision {
            origin:    OriginVerdict::Allowed(HeaderValue::from_static("https://example.com")),
            preflight: true,
        };
        let mut headers = HeaderMap::new();

        decision.apply(&mut headers);

        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://example.com");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], ALLOW_METHODS);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], ALLOW_HEADERS);
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "86400");
        assert_eq!(headers[header::VARY], "Origin");
        assert!(!headers.contains_key(header::ACCESS_CONTROL_EXPOSE_HEADERS));
    }

    #[test]
    fn test_許可時の通常リクエストヘッダー() {
        let decision = AdmissionDecision {
            origin:    OriginVerdict::Allowed(HeaderValue::from_static("https://example.com")),
            preflight: false,
        };
        let mut headers = HeaderMap::new();

        decision.apply(&mut headers);

        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://example.com");
        assert_eq!(headers[header::ACCESS_CONTROL_EXPOSE_HEADERS], EXPOSE_HEADERS);
        assert!(!headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    }

    #[test]
    fn test_拒否時はvaryのみ付与する() {
        let decision = AdmissionDecision {
            origin:    OriginVerdict::Denied("https://evil.example".to_string()),
            preflight: true,
        };
        let mut headers = HeaderMap::new();

        decision.apply(&mut headers);

        assert_eq!(headers.len(), 1);
        assert_eq!(headers[header::VARY], "Origin");
    }

    #[test]
    fn test_originなしではヘッダーを付与しない() {
        let decision = AdmissionDecision {
            origin:    OriginVerdict::Absent,
            preflight: false,
        };
        let mut headers = HeaderMap::new();

        decision.apply(&mut headers);

        assert!(headers.is_empty());
    }

    #[tokio::test]
    async fn test_optionsはハンドラに到達せず204を返す() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let app = Router::new()
            .route(
                "/contact",
                post(move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    "handled"
                }),
            )
            .layer(from_fn_with_state(
                AdmissionState {
                    allowed_origins: Arc::new(allowed()),
                },
                admission_gate,
            ));

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/contact")
                    .header(header::ORIGIN, "https://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }
}
