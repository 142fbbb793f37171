use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hanzi_lookup::auth::StaticTokenAuthenticator;
use hanzi_lookup::config::Config;
use hanzi_lookup::lookup::{Lookup, Query, Selection};
use hanzi_lookup::server::{self, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hanzi-lookup", version, about = "Chinese dictionary lookup service")]
struct Cli {
    /// Path to the JSON config file (default: config.json)
    #[arg(long, global = true, default_value = "")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Listen address, overrides `bind_addr` from the config
        #[arg(long)]
        bind: Option<String>,
    },
    /// Look up one query and print the JSON result
    Lookup {
        text: String,
        #[arg(long)]
        bkrs: bool,
        #[arg(long)]
        zhonga: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // 1. Load config
    let config = Config::load(&cli.config)?;
    config.validate().context("invalid configuration")?;

    // 2. Build source pipelines (blocking clients, outside any runtime)
    let lookup = Arc::new(Lookup::from_config(&config)?);

    match cli.command {
        Command::Serve { bind } => {
            let auth = StaticTokenAuthenticator::from_config(&config.auth);
            anyhow::ensure!(
                !auth.is_empty(),
                "auth.tokens is empty; every request would be rejected"
            );

            let addr = bind.unwrap_or_else(|| config.bind_addr.clone());
            let state = AppState {
                lookup: lookup.clone(),
                auth: Arc::new(auth),
            };

            // 3. Start server
            info!("Starting hanzi-lookup server...");
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("failed to build tokio runtime")?;
            runtime.block_on(server::serve(&addr, state))?;
        }
        Command::Lookup { text, bkrs, zhonga } => {
            let query = Query::new(&text, Selection { bkrs, zhonga })?;
            let result = lookup.run(&query);
            println!(
                "{}",
                serde_json::to_string_pretty(&result).context("failed to serialize result")?
            );
        }
    }

    Ok(())
}
