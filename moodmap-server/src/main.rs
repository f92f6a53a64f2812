use std::sync::Arc;

use anyhow::{Context, Result};
use moodmap::{
    config::{ConfigBuilder, ConfigLoader},
    init, seed,
};
use moodmap_server::{
    AppState, cli::CliArgs, config::ServerConfig, create_router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    let filter = match cli_args.log_level.as_deref() {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    }
    .add_directive("surrealdb_core=warn".parse()?)
    .add_directive("surrealdb=warn".parse()?);

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting moodmap server v{}", moodmap::VERSION);

    let server_config = ServerConfig::from_cli_and_env(cli_args.clone())?;

    let moodmap_config = match &server_config.config_file_path {
        Some(path) => {
            info!("Loading moodmap configuration from {}", path.display());
            ConfigLoader::load_from(path)
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => ConfigLoader::load()?,
    };

    let mut builder = ConfigBuilder::from_config(moodmap_config);
    if cli_args.memory {
        builder = builder.with_memory_storage();
    } else if let Some(dir) = &cli_args.data_dir {
        builder = builder.with_data_dir(dir);
    }
    let moodmap_config = builder.build()?;

    let moodmap = init(moodmap_config).await?;

    let seed_config = &moodmap.config().seed;
    if seed_config.emotions_csv.is_some() || seed_config.locations_csv.is_some() {
        match seed::seed_all(
            moodmap.storage().as_ref(),
            seed_config.emotions_csv.as_deref(),
            seed_config.locations_csv.as_deref(),
        )
        .await
        {
            Ok(report) => info!(
                created = report.created,
                existing = report.existing,
                skipped = report.skipped,
                "Seeded tags"
            ),
            Err(e) => warn!("Failed to seed tags: {}. Continuing without them.", e),
        }
    }

    if !moodmap.places_configured() {
        warn!("No places API key configured; recommendation and search endpoints will answer 503");
    }
    if !moodmap.llm_configured() {
        warn!("No LLM API key configured; summaries fall back to defaults");
    }

    let app_state = Arc::new(AppState::new(moodmap, server_config.clone()));

    let mut app = create_router(app_state).layer(TraceLayer::new_for_http());
    if server_config.cors {
        app = app.layer(CorsLayer::permissive());
    }

    let addr = server_config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Server listening on {}", addr);
    info!("API documentation available at http://{}/docs", addr);
    if server_config.allow_signup {
        info!("User signup is enabled");
    } else {
        info!("User signup is disabled");
    }

    axum::serve(listener, app).await?;

    Ok(())
}
