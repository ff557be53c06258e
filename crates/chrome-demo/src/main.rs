#![warn(missing_docs)]

//! Entry point for the `chrome-demo` binary.

mod cli;
mod error;
mod scenarios;

use std::process;

use chrome_engine::{Shell, ShellContext};
use clap::Parser;
use config::{Config, load_from_path, resolve_config_path};
use tokio::runtime::Builder;
use tracing::{debug, error};

use crate::{
    cli::{Cli, Commands},
    error::Result,
};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, load config, and run the scenario.
fn run() -> Result<()> {
    let Cli {
        log,
        config,
        command,
    } = Cli::parse();
    logging::init(&log.spec());

    let config = match resolve_config_path(config.as_deref()) {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_from_path(&path)?
        }
        None => Config::default(),
    };

    let rt = Builder::new_current_thread().enable_all().build()?;
    rt.block_on(async move {
        let shell = Shell::new(ShellContext::builder(config).build()?);
        let result = match command {
            Commands::Notify(args) => scenarios::notify(&shell, &args).await,
            Commands::Dance(args) => scenarios::dance(&shell, &args).await,
            Commands::Drag(args) => scenarios::drag(&shell, &args).await,
            Commands::Close => scenarios::close(&shell).await,
        };
        shell.shutdown().await;
        result
    })
}
