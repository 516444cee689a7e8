use anyhow::Result;
use bidlist::menu;
use clap::Parser;
use std::{
    io,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use tracing::Level;

/// Keep bids in a linked list: load them from CSV, enter, find and remove them
#[derive(Parser)]
#[command(name = "bidlist")]
struct Cli {
    /// CSV file to load bids from
    #[arg(default_value = menu::DEFAULT_CSV_PATH)]
    csv_path: PathBuf,

    /// Bid id to use when finding or removing without typing one
    #[arg(default_value = menu::DEFAULT_BID_KEY)]
    bid_key: String,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_writer(io::stderr)
        .init();

    let stop = Arc::new(AtomicBool::new(false));
    ctrlc::set_handler({
        let stop = stop.clone();
        move || {
            eprintln!("Stopping after the current command...");
            stop.store(true, Ordering::SeqCst);
        }
    })?;

    let config = menu::MenuConfig {
        csv_path: cli.csv_path,
        bid_key: cli.bid_key,
    };

    let stdin = io::stdin();
    menu::Menu::new(stdin.lock(), io::stdout(), config)
        .with_stop_flag(stop)
        .run()
}
