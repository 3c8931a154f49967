//! Vocast - 文本转语音代理服务
//!
//! - Domain: rate_limit/, artifact/, voice/ (Bounded Contexts)
//! - Application: commands, queries, ports
//! - Infrastructure: http, memory, adapters, clock

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use vocast::application::{ArtifactStorePort, Clock, RateLimiterPort, TtsEnginePort};
use vocast::config::{load_config, print_config, AppConfig, TtsEngineKind};
use vocast::domain::voice::VoiceCatalog;
use vocast::infrastructure::adapters::{
    FakeTtsClient, FakeTtsClientConfig, FileArtifactStore, HttpTtsClient, HttpTtsClientConfig,
};
use vocast::infrastructure::clock::SystemClock;
use vocast::infrastructure::http::{AppState, HttpServer, ServerConfig};
use vocast::infrastructure::memory::InMemoryRateLimiter;

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},vocast={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_tts_engine(config: &AppConfig) -> anyhow::Result<Arc<dyn TtsEnginePort>> {
    let engine: Arc<dyn TtsEnginePort> = match config.tts.engine {
        TtsEngineKind::Http => {
            let mut tts_config = HttpTtsClientConfig::new(&config.tts.url)
                .with_timeout(config.tts.timeout_secs);
            tts_config.api_key = config.tts.api_key.clone();
            Arc::new(HttpTtsClient::new(tts_config)?)
        }
        TtsEngineKind::Fake => {
            tracing::warn!("Using fake TTS engine, responses contain fixed audio");
            Arc::new(FakeTtsClient::new(FakeTtsClientConfig {
                audio_file_path: config.tts.fake_audio_path.clone(),
                latency_ms: 0,
            })?)
        }
    };
    Ok(engine)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received shutdown signal"),
        Err(e) => {
            // 无法监听信号时保持运行
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Vocast - 文本转语音代理服务");
    print_config(&config);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());

    // 限流器
    let policy = config.rate_limit.policy()?;
    let rate_limiter = if config.rate_limit.enabled {
        let limiter = InMemoryRateLimiter::new(policy).arc();
        let _gc_task = limiter
            .clone()
            .spawn_gc(clock.clone(), config.rate_limit.gc_interval());
        limiter
    } else {
        tracing::warn!("Rate limiting is disabled");
        InMemoryRateLimiter::disabled(policy).arc()
    };

    // 产物存储，启动时先清理一次过期文件
    let artifact_store = FileArtifactStore::new(&config.storage.output_dir, clock.clone()).await?;
    artifact_store
        .cleanup_expired(clock.now(), config.storage.retention())
        .await;

    let tts_engine = build_tts_engine(&config)?;

    let state = AppState::new(
        rate_limiter as Arc<dyn RateLimiterPort>,
        tts_engine,
        Arc::new(artifact_store),
        Arc::new(VoiceCatalog::builtin()),
        clock,
        config.convert_config(),
    )
    .with_trust_forwarded_for(config.server.trust_forwarded_for);

    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_cors_origins(config.server.cors_origins.clone());
    let server = HttpServer::new(server_config, state);

    server.run_with_shutdown(shutdown_signal()).await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
