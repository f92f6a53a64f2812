use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use moodmap_cli::commands::Commands;
use moodmap_cli::context::MoodmapCliContext;
use moodmap_cli::handlers::*;
use moodmap_cli::output::output_error_json;

#[derive(Parser)]
#[command(name = "moodmap-cli")]
#[command(about = "Moodmap recommendation CLI", long_about = None)]
#[command(version = moodmap::VERSION)]
struct Cli {
    /// Configuration file (defaults to ./moodmap.toml and the environment)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Custom data directory for storage
    #[arg(long, short, global = true)]
    data_dir: Option<PathBuf>,

    /// Use in-memory storage; nothing is persisted
    #[arg(long, global = true)]
    memory: bool,

    /// Output format (text, json) - use json for tool integration
    #[arg(long, short, default_value = "text", global = true, value_parser = ["text", "json"])]
    output: String,

    /// Verbose output (debug level logging)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::new(format!(
        "{},surrealdb=warn,surrealdb_core=warn",
        level.as_str().to_lowercase()
    ));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Commands::Version = cli.command {
        println!("moodmap-cli {}", moodmap::VERSION);
        return Ok(());
    }

    let ctx = match MoodmapCliContext::new(
        cli.config.as_deref(),
        cli.data_dir.as_deref(),
        cli.memory,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(e) => {
            output_error_json(&e, &cli.output);
            std::process::exit(1);
        }
    };

    let output = cli.output.as_str();
    let result = match cli.command {
        Commands::Version => Ok(()),
        Commands::Diagnose => handle_diagnose_command(&ctx, output).await.map(|_| ()),
        Commands::Seed(args) => handle_seed_command(args, &ctx, output).await.map(|_| ()),
        Commands::Tags(args) => handle_tags_command(args, &ctx, output).await.map(|_| ()),
        Commands::Similar(args) => handle_similar_command(args, &ctx, output)
            .await
            .map(|_| ()),
        Commands::Infer(args) => handle_infer_command(args, &ctx, output).await.map(|_| ()),
        Commands::Search(args) => handle_search_command(args, &ctx, output).await.map(|_| ()),
    };

    ctx.moodmap.metrics().log_summary().await;

    if let Err(e) = result {
        output_error_json(&e, output);
        std::process::exit(1);
    }

    Ok(())
}
