use std::process::ExitCode;

use clap::Parser;

use plasma::config::{Args, PlasmaConfig};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PlasmaConfig::try_from(Args::parse()).unwrap_or_else(|e| e.exit());
    log::info!(
        "{:?} {}x{} scale {}",
        config.variant,
        config.width,
        config.height,
        config.scale
    );

    match plasma::window::run(config) {
        Ok(status) => ExitCode::from(status.code()),
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
