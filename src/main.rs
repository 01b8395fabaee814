use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use smartbiz::config::AppConfig;
use smartbiz::error::ChannelError;
use smartbiz::llm::create_fallback;
use smartbiz::store::{Database, LibSqlBackend};
use smartbiz::webhook::{self, MessageRouter};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Console logging, plus a daily rolling file when a log directory is set.
/// The returned guard flushes the file writer on drop.
fn init_tracing(log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "smartbiz.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()?;
    Ok(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    let config = AppConfig::from_env()?;
    let _log_guard = init_tracing(config.log_dir.as_deref())?;

    eprintln!("📱 SmartBiz v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Webhook: http://0.0.0.0:{}/webhook/whatsapp", config.port);
    eprintln!("   Health:  http://0.0.0.0:{}/health", config.port);

    // ── Database ─────────────────────────────────────────────────────────
    let db: Arc<dyn Database> = Arc::new(
        LibSqlBackend::new_local(&config.db_path)
            .await
            .with_context(|| format!("opening database at {}", config.db_path.display()))?,
    );

    // ── Router ───────────────────────────────────────────────────────────
    let mut router = MessageRouter::new(db.clone(), config.router.clone());
    match &config.fallback {
        Some(fallback) => {
            router = router.with_fallback(create_fallback(fallback)?);
        }
        None => {
            tracing::warn!("No LLM API key set; unmatched questions get the generic reply");
        }
    }

    let app = webhook::app(Arc::new(router), db);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .map_err(|e| ChannelError::StartupFailed {
            name: "whatsapp-webhook".to_string(),
            reason: format!("binding port {}: {e}", config.port),
        })?;
    tracing::info!(port = config.port, "SmartBiz webhook server started");
    axum::serve(listener, app).await?;
    Ok(())
}
