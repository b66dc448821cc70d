use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use optionhub_api::{
    app,
    config::ServerConfig,
    services::{telemetry_mirror, WebhookPublisher},
    AppState,
};
use optionhub_core::{defaults, EventBus, EventPublisher};
use optionhub_db::{log_pool_metrics, Database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "optionhub_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "optionhub_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Daily-rotated file output when LOG_FILE is set
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("optionhub-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
        None
    } else {
        let mut layer = tracing_subscriber::fmt::layer();
        if let Some(ansi) = log_ansi {
            layer = layer.with_ansi(ansi);
        }
        registry.with(layer).init();
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    let config = ServerConfig::from_env()?;

    // Connect to database
    info!(
        attempts = config.connect_attempts,
        retry_ms = config.connect_retry.as_millis() as u64,
        "Connecting to database..."
    );
    let db = Database::connect_with_config(&config.database_url, config.pool_config()).await?;
    info!("Database connected");

    if config.run_migrations {
        info!("Running database migrations...");
        db.migrate().await?;
        info!("Database migrations complete");
    }

    // Pool health logging
    let metrics_pool = db.pool().clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            log_pool_metrics(&metrics_pool);
        }
    });

    // Event sink: webhook when configured, otherwise the in-process bus
    let publisher: Arc<dyn EventPublisher> = match &config.events.webhook_url {
        Some(url) => {
            info!(
                url = %url,
                signed = config.events.webhook_secret.is_some(),
                topic = %config.events.topic,
                "Publishing attribute events to webhook"
            );
            Arc::new(WebhookPublisher::new(
                url.clone(),
                config.events.webhook_secret.clone(),
                config.events.timeout,
            )?)
        }
        None => {
            info!(topic = %config.events.topic, "Publishing attribute events to in-process bus");
            let bus = EventBus::new(defaults::EVENT_BUS_CAPACITY);
            tokio::spawn(telemetry_mirror(bus.subscribe()));
            Arc::new(bus)
        }
    };

    let state = AppState::new(
        Arc::new(db.vocabularies.clone()),
        Arc::new(db.attributes.clone()),
        Arc::new(db.option_requests.clone()),
        publisher,
    )
    .with_search_policy(config.search)
    .with_event_topic(config.events.topic.clone());

    let router = app(state);

    // Start server
    let addr: SocketAddr = config.bind_addr().parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
