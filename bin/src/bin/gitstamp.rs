use clap::Parser;
use gitstamp_bin::{cli::Cli, commands};
use gitstamp_log::LogConfig;

fn main() {
    let cli = Cli::parse();

    let _log_guard = gitstamp_log::init(LogConfig {
        log_file_path: cli.log_file.clone(),
    })
    .map_err(|e| eprintln!("Warning: Failed to initialize logging: {e}"))
    .ok();

    if let Err(e) = commands::generate::handle(&cli, &mut std::io::stdout().lock()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
