//! Tiered cache console binary.

use clap::Parser;
use console::banner::{BannerConfig, print_banner};
use console::config::{Config, DEFAULT_CONFIG};
use console::{logging, session};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tiered-cache")]
#[command(about = "Interactive multi-level key/value cache")]
struct Args {
    /// Path to configuration file
    config: Option<PathBuf>,

    /// Print default configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() {
    let args = Args::parse();

    if args.print_config {
        print!("{}", DEFAULT_CONFIG);
        return;
    }

    let config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load config: {}", e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    // Initialize logging first
    logging::init(&config.logging);

    let mut cache = match config.build_cache() {
        Ok(cache) => cache,
        Err(e) => {
            eprintln!("Failed to build cache: {}", e);
            std::process::exit(1);
        }
    };

    print_banner(&BannerConfig {
        version: env!("CARGO_PKG_VERSION"),
        levels: cache.levels(),
    });

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    if let Err(e) = session::run(&mut cache, stdin.lock(), &mut stdout) {
        tracing::error!(error = %e, "Console error");
        std::process::exit(1);
    }
}
