//! HTTP Routes
//!
//! API Endpoints:
//! - /                        GET   健康检查
//! - /api/ping                GET   版本探测
//! - /api/v1/tts/convert      POST  文本转语音，直接返回 MP3
//! - /api/v1/tts/audio/:id    GET   下载已生成的音频
//! - /api/v1/tts/languages    GET   支持的语言
//! - /api/v1/tts/voices       GET   各语言音色（可选 ?language=）

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::health))
        .nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/v1/tts", tts_routes())
}

/// TTS 路由
fn tts_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/convert", post(handlers::convert))
        .route("/audio/:artifact_id", get(handlers::get_audio))
        .route("/languages", get(handlers::list_languages))
        .route("/voices", get(handlers::list_voices))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        extract::ConnectInfo,
        http::{header, Request, StatusCode},
        Router,
    };
    use std::net::{IpAddr, SocketAddr};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    use crate::application::{ConvertConfig, RateLimiterPort};
    use crate::domain::rate_limit::RateLimitPolicy;
    use crate::domain::voice::VoiceCatalog;
    use crate::infrastructure::adapters::{FakeTtsClient, FileArtifactStore};
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::http::{AppState, HttpServer, ServerConfig};
    use crate::infrastructure::memory::InMemoryRateLimiter;

    struct TestApp {
        router: Router,
        limiter: Arc<InMemoryRateLimiter>,
        dir: TempDir,
    }

    async fn app(max_requests: u32) -> TestApp {
        app_with(max_requests, false).await
    }

    async fn app_with(max_requests: u32, trust_forwarded_for: bool) -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(SystemClock::new());
        let limiter =
            InMemoryRateLimiter::new(RateLimitPolicy::per_minute(max_requests).unwrap()).arc();
        let store = FileArtifactStore::new(dir.path().join("output"), clock.clone())
            .await
            .unwrap();

        let state = AppState::new(
            limiter.clone(),
            Arc::new(FakeTtsClient::with_defaults()),
            Arc::new(store),
            Arc::new(VoiceCatalog::builtin()),
            clock,
            ConvertConfig {
                max_text_length: 20,
                synthesis_timeout: Duration::from_secs(5),
                retention: Duration::from_secs(24 * 3600),
            },
        )
        .with_trust_forwarded_for(trust_forwarded_for);
        let router = HttpServer::new(ServerConfig::default(), state).router();

        TestApp {
            router,
            limiter,
            dir,
        }
    }

    /// 以 `ip` 作为对端地址的转换请求
    fn convert_request(body: &str, ip: &str) -> Request<Body> {
        let peer = SocketAddr::new(ip.parse::<IpAddr>().unwrap(), 4000);
        let mut request = Request::builder()
            .method("POST")
            .uri("/api/v1/tts/convert")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));
        request
    }

    fn forwarded(mut request: Request<Body>, forwarded_for: &str) -> Request<Body> {
        request
            .headers_mut()
            .insert("x-forwarded-for", forwarded_for.parse().unwrap());
        request
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_and_ping() {
        let app = app(5).await;

        let response = app.router.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "healthy");

        let response = app.router.oneshot(get("/api/ping")).await.unwrap();
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_convert_returns_audio_and_headers() {
        let app = app(5).await;

        let response = app
            .router
            .oneshot(convert_request(r#"{"text":"hello"}"#, "1.1.1.1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "audio/mpeg");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"speech.mp3\""
        );
        assert!(headers.contains_key("x-artifact-id"));
        assert_eq!(headers["x-ratelimit-limit"], "5");
        assert_eq!(headers["x-ratelimit-remaining"], "4");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(!bytes.is_empty());
    }

    #[tokio::test]
    async fn test_converted_audio_can_be_downloaded() {
        let app = app(5).await;

        let response = app
            .router
            .clone()
            .oneshot(convert_request(r#"{"text":"hello"}"#, "1.1.1.1"))
            .await
            .unwrap();
        let id = response.headers()["x-artifact-id"]
            .to_str()
            .unwrap()
            .to_string();
        let converted = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        let response = app
            .router
            .oneshot(get(&format!("/api/v1/tts/audio/{}", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
        let downloaded = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(downloaded, converted);
    }

    #[tokio::test]
    async fn test_expired_audio_is_not_served() {
        let app = app(5).await;

        let response = app
            .router
            .clone()
            .oneshot(convert_request(r#"{"text":"hello"}"#, "1.1.1.1"))
            .await
            .unwrap();
        let id = response.headers()["x-artifact-id"]
            .to_str()
            .unwrap()
            .to_string();

        let path = app.dir.path().join("output").join(format!("{}.mp3", id));
        std::fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(std::time::SystemTime::now() - Duration::from_secs(48 * 3600))
            .unwrap();

        let response = app
            .router
            .oneshot(get(&format!("/api/v1/tts/audio/{}", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_download_unknown_or_invalid_id() {
        let app = app(5).await;

        let response = app
            .router
            .clone()
            .oneshot(get("/api/v1/tts/audio/20240101T000000000-deadbeef"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .router
            .oneshot(get("/api/v1/tts/audio/..%2Fsecret"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_validation_errors_do_not_consume_quota() {
        let app = app(1).await;

        for body in [
            r#"{"text":"   "}"#,
            r#"{"text":"this text is far too long for the limit"}"#,
            r#"{"text":"hi","languageCode":"fr-FR"}"#,
            r#"{"text":"hi","voiceName":"cmn-CN-Standard-A"}"#,
            r#"{"text":"hi","speakingRate":9.0}"#,
            r#"{"nope":true}"#,
        ] {
            let response = app
                .router
                .clone()
                .oneshot(convert_request(body, "2.2.2.2"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
            assert_eq!(response.headers()["x-ratelimit-remaining"], "1");
            assert_eq!(json_body(response).await["errno"], 400);
        }

        assert_eq!(app.limiter.remaining("2.2.2.2", chrono::Utc::now()), 1);
    }

    #[tokio::test]
    async fn test_rate_limited_after_quota() {
        let app = app(2).await;

        for _ in 0..2 {
            let response = app
                .router
                .clone()
                .oneshot(convert_request(r#"{"text":"hello"}"#, "3.3.3.3"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .router
            .clone()
            .oneshot(convert_request(r#"{"text":"hello"}"#, "3.3.3.3"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let headers = response.headers();
        assert!(headers.contains_key(header::RETRY_AFTER));
        assert_eq!(headers["x-ratelimit-remaining"], "0");
        let body = json_body(response).await;
        assert_eq!(body["errno"], 429);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Too many requests"));

        // 其他客户端不受影响
        let response = app
            .router
            .oneshot(convert_request(r#"{"text":"hello"}"#, "4.4.4.4"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_forwarded_for_ignored_by_default() {
        let app = app(1).await;

        let mut statuses = Vec::new();
        for i in 0..5 {
            let request = forwarded(
                convert_request(r#"{"text":"hello"}"#, "10.0.0.1"),
                &format!("198.51.100.{}", i),
            );
            let response = app.router.clone().oneshot(request).await.unwrap();
            statuses.push(response.status());
        }

        assert_eq!(statuses[0], StatusCode::OK);
        assert!(statuses[1..]
            .iter()
            .all(|status| *status == StatusCode::TOO_MANY_REQUESTS));
        assert_eq!(app.limiter.tracked_clients(), 1);
        assert_eq!(app.limiter.remaining("10.0.0.1", chrono::Utc::now()), 0);
    }

    #[tokio::test]
    async fn test_forwarded_for_used_when_trusted() {
        let app = app_with(1, true).await;

        for i in 0..2 {
            let request = forwarded(
                convert_request(r#"{"text":"hello"}"#, "10.0.0.1"),
                &format!("198.51.100.{}, 10.0.0.1", i),
            );
            let response = app.router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        assert_eq!(app.limiter.tracked_clients(), 2);
        assert_eq!(app.limiter.remaining("198.51.100.0", chrono::Utc::now()), 0);
    }

    #[tokio::test]
    async fn test_languages_and_voices() {
        let app = app(5).await;

        let response = app
            .router
            .clone()
            .oneshot(get("/api/v1/tts/languages"))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["languages"][0]["code"], "en-GB");
        assert_eq!(body["data"]["languages"][1]["code"], "zh-CN");

        let response = app
            .router
            .clone()
            .oneshot(get("/api/v1/tts/voices?language=zh-CN"))
            .await
            .unwrap();
        let body = json_body(response).await;
        let voices = body["data"]["voices"].as_array().unwrap();
        assert_eq!(voices.len(), 1);
        assert_eq!(voices[0]["languageCode"], "zh-CN");
        assert_eq!(voices[0]["voices"][0]["name"], "cmn-CN-Standard-A");
        assert_eq!(voices[0]["voices"][0]["gender"], "FEMALE");

        let response = app
            .router
            .oneshot(get("/api/v1/tts/voices?language=xx-XX"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
