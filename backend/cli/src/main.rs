mod analyze_cmd;
mod sectionize_cmd;
mod status_cmd;
mod terminal_output;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use soilcast_config::{config_file_path, ensure_valid, load_unchecked, redact, validate, SoilcastConfig};
use soilcast_gateway::{build_router, start_server, GatewayState};
use tracing::{debug, info};

use terminal_output::{note_error, note_success, note_warn};

#[derive(Parser)]
#[command(name = "soilcast")]
#[command(about = "Soilcast: soil report analysis with spoken advice")]
#[command(version)]
struct Cli {
    /// Config file (default: $SOILCAST_CONFIG, then ./soilcast.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind the HTTP server to
        #[arg(long)]
        bind: Option<String>,
    },
    /// Analyze a soil report image and narrate the answer
    Analyze {
        /// Image or PDF of the report
        image: PathBuf,
        /// Response language (English, Hindi, Punjabi, ...)
        #[arg(short, long, default_value = "English")]
        language: String,
        /// Print a readable listing instead of JSON
        #[arg(long)]
        text: bool,
    },
    /// Split a markdown document into sections (reads stdin without a file)
    Sectionize {
        file: Option<PathBuf>,
        /// Print a readable listing instead of JSON
        #[arg(long)]
        text: bool,
    },
    /// Show the health of a running server
    Status {
        /// Server base URL (default: local server on the configured port)
        #[arg(long)]
        url: Option<String>,
    },
    /// Print the effective configuration with secrets masked
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config_path = config_file_path(cli.config.as_deref());
    let config = load_unchecked(&config_path).await?;
    logging::init_logger(
        &config.logging.level,
        config.logging.json,
        config.logging.dir.as_deref(),
    );
    debug!(path = %config_path.display(), config = %redact(&config), "Configuration loaded");

    match cli.command {
        Commands::Serve { port, bind } => {
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            ensure_valid(&config)?;
            run_server(&config).await?;
        }
        Commands::Analyze {
            image,
            language,
            text,
        } => {
            ensure_valid(&config)?;
            analyze_cmd::run(&config, &image, &language, text).await?;
        }
        Commands::Status { url } => {
            let url = url.unwrap_or_else(|| format!("http://127.0.0.1:{}", config.server.port));
            status_cmd::run(&url).await?;
        }
        Commands::Config => show_config(&config, &config_path)?,
        Commands::Sectionize { file, text } => sectionize_cmd::run(file.as_deref(), text).await?,
    }

    Ok(())
}

async fn run_server(config: &SoilcastConfig) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid bind address {}:{}",
                config.server.bind_address, config.server.port
            )
        })?;

    info!(
        addr = %addr,
        vision = ?config.vision.provider,
        tts = ?config.tts.provider,
        "Starting Soilcast server"
    );

    let state = GatewayState::from_config(config).await?;
    let router = build_router(state, config.server.max_upload_bytes);
    start_server(addr, router).await
}

fn show_config(config: &SoilcastConfig, path: &Path) -> Result<()> {
    println!("# {}", path.display());
    println!("{}", serde_json::to_string_pretty(&redact(config))?);

    let report = validate(config);
    for warning in &report.warnings {
        note_warn(&warning.to_string());
    }
    for error in &report.errors {
        note_error(&error.to_string());
    }
    if report.is_valid() {
        note_success("Configuration is valid");
    }
    Ok(())
}
