use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use clap::Parser;
use log::{info, warn};

use crossword_maker::{
    config::{FillOptions, ServerConfig},
    create_router, AppState, Dictionary,
};

#[derive(Parser)]
#[command(name = "crossword-maker")]
#[command(about = "Fills crossword templates from a word corpus over HTTP", long_about = None)]
struct Args {
    /// Address to bind the HTTP server to
    #[arg(long, env = "CROSSWORD_BIND_ADDR", default_value = "0.0.0.0")]
    bind_addr: String,

    /// HTTP port
    #[arg(long, env = "CROSSWORD_PORT", default_value = "8890")]
    port: u16,

    /// Directory of wordset-style .json dictionary files
    #[arg(long, env = "CROSSWORD_DATA_DIR", default_value = "data/")]
    data_dir: PathBuf,

    /// Seconds to search before returning a partial board
    #[arg(long, env = "CROSSWORD_DEADLINE_SECS", default_value = "15")]
    deadline_secs: u64,

    /// Fixed RNG seed, for reproducible fills
    #[arg(long, env = "CROSSWORD_SEED")]
    seed: Option<u64>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<ServerConfig> {
        let bind_addr: SocketAddr = format!("{}:{}", self.bind_addr, self.port).parse()?;
        Ok(ServerConfig {
            bind_addr,
            data_dir: self.data_dir,
            fill: FillOptions {
                deadline: Duration::from_secs(self.deadline_secs),
                seed: self.seed,
            },
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    crossword_maker::logging::init_logger(args.verbose);
    let config = args.into_config()?;

    info!("Loading dictionary from {}", config.data_dir.display());
    let dictionary = Arc::new(Dictionary::load(&config.data_dir)?);
    info!("Fill deadline: {:?}", config.fill.deadline);

    let app = create_router(AppState {
        dictionary,
        options: config.fill,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received shutdown signal, gracefully shutting down"),
                Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
            }
        })
        .await?;

    Ok(())
}
