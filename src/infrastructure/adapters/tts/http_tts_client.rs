//! HTTP TTS Client - 调用远程语音合成服务
//!
//! 实现 TtsEnginePort trait
//!
//! 远程 API:
//! POST {base_url}/text:synthesize?key={api_key}
//! Request: {"input": {"text": "..."}, "voice": {...}, "audioConfig": {...}}  (JSON)
//! Response: {"audioContent": "<base64 mp3>"}

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{SynthesisRequest, TtsEnginePort, TtsError};

/// 合成请求体
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeBody<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
    speaking_rate: f32,
    pitch: f32,
}

/// 合成响应体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeReply {
    audio_content: Option<String>,
}

/// HTTP TTS 客户端配置
#[derive(Debug, Clone)]
pub struct HttpTtsClientConfig {
    /// 服务基础 URL
    pub base_url: String,
    /// API Key，作为 `key` 查询参数发送
    pub api_key: Option<String>,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpTtsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://texttospeech.googleapis.com/v1".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl HttpTtsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP TTS 客户端
pub struct HttpTtsClient {
    client: Client,
    config: HttpTtsClientConfig,
}

impl HttpTtsClient {
    /// 创建新的 HTTP TTS 客户端
    pub fn new(config: HttpTtsClientConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn synthesize_url(&self) -> String {
        format!("{}/text:synthesize", self.config.base_url.trim_end_matches('/'))
    }

    fn voices_url(&self) -> String {
        format!("{}/voices", self.config.base_url.trim_end_matches('/'))
    }

    fn key_query(&self) -> Vec<(&'static str, &str)> {
        self.config
            .api_key
            .as_deref()
            .map(|key| vec![("key", key)])
            .unwrap_or_default()
    }
}

fn map_send_error(e: reqwest::Error) -> TtsError {
    if e.is_timeout() {
        TtsError::Timeout
    } else if e.is_connect() {
        TtsError::NetworkError(format!("Cannot connect to TTS service: {}", e))
    } else {
        TtsError::NetworkError(e.to_string())
    }
}

#[async_trait]
impl TtsEnginePort for HttpTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, TtsError> {
        let body = SynthesizeBody {
            input: SynthesisInput {
                text: &request.text,
            },
            voice: VoiceSelection {
                language_code: &request.voice.language_code,
                name: &request.voice.voice_name,
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
                speaking_rate: request.voice.speaking_rate.value(),
                pitch: request.voice.pitch.value(),
            },
        };

        tracing::debug!(
            url = %self.synthesize_url(),
            text_len = request.text.len(),
            voice = %request.voice.voice_name,
            "Sending TTS synthesize request"
        );

        let response = self
            .client
            .post(self.synthesize_url())
            .query(&self.key_query())
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let reply: SynthesizeReply = response
            .json()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TtsError::Timeout
                } else {
                    TtsError::InvalidResponse(format!("Malformed body: {}", e))
                }
            })?;

        let encoded = reply
            .audio_content
            .filter(|content| !content.is_empty())
            .ok_or_else(|| TtsError::InvalidResponse("Missing audioContent".to_string()))?;

        let audio = STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| TtsError::InvalidResponse(format!("Invalid base64 audio: {}", e)))?;

        tracing::info!(
            voice = %request.voice.voice_name,
            audio_size = audio.len(),
            "TTS synthesis completed"
        );

        Ok(audio)
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.voices_url())
            .query(&self.key_query())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voice::{VoiceCatalog, VoiceOptions};
    use axum::{
        extract::Query,
        http::{StatusCode, Uri},
        routing::{get, post},
        Json, Router,
    };
    use std::collections::HashMap;

    fn request(text: &str) -> SynthesisRequest {
        let voice = VoiceCatalog::builtin()
            .resolve(&VoiceOptions::default())
            .unwrap();
        SynthesisRequest {
            text: text.to_string(),
            voice,
        }
    }

    /// 在随机端口启动一个模拟的合成服务
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: String) -> HttpTtsClient {
        HttpTtsClient::new(
            HttpTtsClientConfig::new(base_url)
                .with_api_key("test-key")
                .with_timeout(2),
        )
        .unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = HttpTtsClientConfig::default();
        assert_eq!(config.base_url, "https://texttospeech.googleapis.com/v1");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_body_shape() {
        let req = request("hello");
        let body = SynthesizeBody {
            input: SynthesisInput { text: &req.text },
            voice: VoiceSelection {
                language_code: &req.voice.language_code,
                name: &req.voice.voice_name,
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
                speaking_rate: 1.0,
                pitch: 0.0,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["input"]["text"], "hello");
        assert_eq!(json["voice"]["languageCode"], "en-GB");
        assert_eq!(json["voice"]["name"], "en-GB-Journey-D");
        assert_eq!(json["audioConfig"]["audioEncoding"], "MP3");
    }

    #[tokio::test]
    async fn test_synthesize_decodes_audio_content() {
        let router = Router::new().fallback(
            |uri: Uri,
             Query(params): Query<HashMap<String, String>>,
             Json(body): Json<serde_json::Value>| async move {
                assert_eq!(uri.path(), "/text:synthesize");
                assert_eq!(params.get("key").map(String::as_str), Some("test-key"));
                assert_eq!(body["input"]["text"], "hello");
                Json(serde_json::json!({ "audioContent": STANDARD.encode(b"ID3audio") }))
            },
        );
        let base_url = serve(router).await;

        let audio = client(base_url).synthesize(request("hello")).await.unwrap();
        assert_eq!(audio, b"ID3audio");
    }

    #[tokio::test]
    async fn test_upstream_error_status() {
        let router =
            Router::new().fallback(post(|| async { (StatusCode::FORBIDDEN, "API key not valid") }));
        let base_url = serve(router).await;

        let err = client(base_url).synthesize(request("hello")).await.unwrap_err();
        match err {
            TtsError::ServiceError(msg) => assert!(msg.contains("403")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_audio_content() {
        let router = Router::new().fallback(post(|| async { Json(serde_json::json!({})) }));
        let base_url = serve(router).await;

        let err = client(base_url).synthesize(request("hello")).await.unwrap_err();
        assert!(matches!(err, TtsError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let router = Router::new().fallback(post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(serde_json::json!({ "audioContent": "" }))
        }));
        let base_url = serve(router).await;

        let err = client(base_url).synthesize(request("hello")).await.unwrap_err();
        assert!(matches!(err, TtsError::Timeout));
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        // 绑定后立即释放，得到一个无人监听的端口
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{}", addr))
            .synthesize(request("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, TtsError::NetworkError(_)));
    }

    #[tokio::test]
    async fn test_health_check() {
        let router = Router::new().route("/voices", get(|| async { "{}" }));
        let base_url = serve(router).await;
        assert!(client(base_url).health_check().await);
    }
}
