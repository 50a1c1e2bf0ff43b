use std::process::ExitCode;

use clap::Parser;
use horoscope_menu::{start, Args};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    config.logging.init();

    match start(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("horoscope menu stopped: {}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
