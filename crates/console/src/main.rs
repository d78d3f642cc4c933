#![warn(missing_docs)]

//! Entry point for the `console` binary.

mod cli;
mod commands;
mod error;
mod export;
mod i18n;
mod loopback;
mod screen;

use std::{
    io::{self, Write},
    process,
    sync::Arc,
};

use clap::Parser;
use hotkeys::{BindingStore, InputSurface, JsonStore, RunControls, SchedulerClient, StoreGateway};
use logging::LogBuffer;
use tokio::runtime::Builder;
use tracing::{debug, error};

use crate::{
    cli::{Cli, Commands, RunArgs},
    error::Result,
    screen::{ProfileScreen, ScreenContext},
};

/// Lines kept in the session log.
const LOG_CAPACITY: usize = 2_000;

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and dispatch to the chosen subcommand.
fn run() -> Result<()> {
    let cli = Cli::parse();
    let log_spec = cli.log.spec();
    let log = LogBuffer::new(LOG_CAPACITY);
    if matches!(cli.command, Commands::Run(_)) {
        logging::init_buffered(&log_spec, &log);
    } else {
        logging::init(&log_spec);
    }

    let path = cli.store_path();
    debug!(store = %path.display(), "using hotkey store");
    let store = BindingStore::new(
        Arc::new(StoreGateway::new(JsonStore::new(path))),
        i18n::english(),
    );

    let rt = Builder::new_current_thread().enable_all().build()?;
    let mut out = io::stdout().lock();
    rt.block_on(async {
        match cli.command {
            Commands::Show => commands::show(&store, &mut out).await,
            Commands::Set { action, combo } => commands::set(&store, action, &combo, &mut out).await,
            Commands::Clear { action } => commands::clear(&store, action, &mut out).await,
            Commands::Reset => commands::reset(&store, &i18n::english(), &mut out).await,
            Commands::Normalize { combo } => commands::normalize(&combo, &mut out),
            Commands::Run(args) => {
                drop(out);
                run_screen(store, args, log).await
            }
        }
    })?;
    io::stdout().flush()?;
    Ok(())
}

/// Wire the profile screen to a loopback scheduler and run it.
async fn run_screen(store: BindingStore, args: RunArgs, log: LogBuffer) -> Result<()> {
    let (client, requests) = SchedulerClient::channel();
    let controls = RunControls::new(client, args.profile);
    let (notice_tx, notices) = screen::notice_channel();
    let scheduler = tokio::spawn(loopback::serve(requests, controls.clone(), notice_tx.clone()));

    let export_dir = args.export_dir.unwrap_or_else(|| ".".into());
    let ctx = ScreenContext::new(controls, log.clone(), export_dir);
    let screen = ProfileScreen::new(store, InputSurface::new(), ctx, notice_tx);
    let result = screen::run(screen, log, notices).await;
    scheduler.abort();
    result
}
