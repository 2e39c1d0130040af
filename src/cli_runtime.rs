use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use checklist::model::ClientConfig;
use checklist::remote::ApiClient;
use checklist::store::StateDir;

use crate::Commands;

#[derive(Parser)]
#[command(name = "checklist")]
#[command(about = "Hierarchical checklists backed by Smartsheet", long_about = None)]
pub(crate) struct Cli {
    /// Directory holding config.json and state.json
    #[arg(long, global = true, env = "CHECKLIST_HOME", value_name = "DIR")]
    home: Option<PathBuf>,

    /// Backend base URL, e.g. http://localhost:8000/api
    #[arg(long, global = true, env = "CHECKLIST_API_URL", value_name = "URL")]
    api_url: Option<String>,

    /// Log requests and token refreshes to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Everything a command handler needs: the state directory and a client
/// configured from it.
pub(crate) struct CliContext {
    pub(crate) state: StateDir,
    pub(crate) config: ClientConfig,
    api_url: Option<String>,
}

impl CliContext {
    /// `config.json` with `--api-url` applied on top.
    pub(crate) fn effective_config(&self) -> ClientConfig {
        let mut cfg = self.config.clone();
        if let Some(url) = &self.api_url {
            cfg.api_base = url.clone();
        }
        cfg
    }

    pub(crate) fn client(&self) -> Result<ApiClient> {
        ApiClient::from_config(&self.effective_config(), Arc::new(self.state.clone()))
    }
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let home = match cli.home {
        Some(home) => home,
        None => StateDir::default_root()?,
    };
    let state = StateDir::open_or_init(&home)?;
    let config = state.read_config()?;
    let ctx = CliContext {
        state,
        config,
        api_url: cli.api_url,
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start tokio runtime")?;
    runtime.block_on(crate::cli_exec::handle_command(&ctx, cli.command))
}

fn init_logging(verbose: bool) {
    let level = if verbose { "checklist=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
