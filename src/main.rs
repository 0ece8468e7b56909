use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use proposal_deck::config::DeckConfig;
use proposal_deck::layout::assemble_deck;
use proposal_deck::models::{OutputFormat, ProposalData};
use proposal_deck::{api, render};

#[derive(Parser)]
#[command(name = "proposal-deck")]
#[command(about = "Lay out proposal slide decks for HTML preview and PPTX export")]
struct Cli {
    /// Load configuration from this file instead of the user config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port for HTTP API (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Export a proposal JSON file
    Export {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long, default_value = "pptx")]
        format: String,
    },
    /// Render an HTML preview of one slide, or of the whole deck
    Preview {
        #[arg(short, long)]
        input: PathBuf,
        /// 0-based slide index; omit for a full document
        #[arg(short, long)]
        slide: Option<usize>,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the computed deck geometry as JSON
    Layout {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Print a sample proposal as JSON
    Sample,
}

/// Initialize tracing. Logs go to stderr so commands that print JSON keep
/// stdout clean.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "proposal_deck=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<DeckConfig> {
    match path {
        Some(path) => {
            let mut config = DeckConfig::from_path(path)?;
            config.apply_overrides(|key| std::env::var(key).ok());
            Ok(config)
        }
        None => Ok(DeckConfig::load()),
    }
}

fn read_proposal(path: &Path) -> Result<ProposalData> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read proposal {}", path.display()))?;
    serde_json::from_str(&content).context("Failed to parse proposal JSON")
}

async fn serve(config: DeckConfig) -> Result<()> {
    let addr = config.server.bind_addr();
    tracing::info!("Starting proposal-deck server on {}", addr);

    let app = api::create_router(config);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("proposal-deck server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Serve { port }) => {
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await?;
        }
        Some(Commands::Export {
            input,
            output,
            format,
        }) => {
            let format = OutputFormat::from_str(&format)
                .with_context(|| format!("Unknown export format: {}", format))?;
            let proposal = read_proposal(&input)?;
            let bytes = render::export(&proposal, &config.layout, format)?;
            fs::write(&output, &bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!("Wrote {} ({} bytes)", output.display(), bytes.len());
        }
        Some(Commands::Preview {
            input,
            slide,
            output,
        }) => {
            let proposal = read_proposal(&input)?;
            let html = match slide {
                Some(index) => render::render_preview(&proposal, index, &config.layout)?,
                None => render::render_preview_document(&proposal, &config.layout),
            };
            fs::write(&output, html)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!("Wrote {}", output.display());
        }
        Some(Commands::Layout { input }) => {
            let proposal = read_proposal(&input)?;
            let deck = assemble_deck(&proposal, &config.layout);
            println!("{}", serde_json::to_string_pretty(&deck)?);
        }
        Some(Commands::Sample) => {
            println!("{}", serde_json::to_string_pretty(&ProposalData::sample())?);
        }
        None => {
            // Default: start server
            serve(config).await?;
        }
    }

    Ok(())
}
