use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use audube::application::services::ExtractionService;
use audube::infrastructure::observability::{TracingConfig, init_tracing};
use audube::infrastructure::persistence::MetadataRepositoryFactory;
use audube::infrastructure::storage::AudioStoreFactory;
use audube::infrastructure::transcoding::FfmpegTranscoder;
use audube::infrastructure::upstream::VideoInfoClient;
use audube::presentation::{AppState, Cli, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(anyhow::Error::msg)?;

    let mut settings = Settings::load(environment)?;
    if let Some(port) = cli.port {
        settings.server.port = port;
    }

    let tracing_config = TracingConfig {
        environment: environment.to_string(),
        json_format: settings.logging.json_format,
        verbose: false,
    }
    .with_verbose(cli.verbose || settings.logging.verbose);
    init_tracing(tracing_config, settings.server.port);

    let metadata_repository = MetadataRepositoryFactory::create(&settings.database).await?;
    let audio_store = AudioStoreFactory::create(&settings.storage)?;
    let resolver = Arc::new(VideoInfoClient::new(
        Some(settings.upstream.base_url.clone()),
        Some(settings.upstream.target_type.clone()),
    )?);
    let transcoder = Arc::new(FfmpegTranscoder::new(&settings.transcoder.ffmpeg_path));

    let extraction_service = Arc::new(ExtractionService::new(
        resolver,
        transcoder,
        metadata_repository,
        audio_store,
        Duration::from_secs(settings.extraction.deadline_secs),
    ));

    let router = create_router(AppState { extraction_service });

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
