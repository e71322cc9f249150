mod app;
mod auth;
mod config;
mod error;
mod language;
mod recorder;
mod services;
mod text_tools;
mod ui;

use std::process::ExitCode;

use app::{AppState, Services};
use config::Config;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Voice Translator starting");

    let config = Config::load();
    if !Config::exists() {
        if let Err(e) = config.save() {
            log::warn!("Failed to write default config: {e}");
        }
    }
    let services = Services::from_config(&config);
    let mut state = match AppState::new(config, services) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to start: {e}");
            eprintln!("Failed to start: {e}");
            return ExitCode::FAILURE;
        }
    };
    match state.store.count() {
        Ok(n) => log::info!("{n} account(s) in {}", state.store.path().display()),
        Err(e) => log::warn!("Could not count accounts: {e}"),
    }

    let mut terminal = ui::Terminal::new();
    if let Err(e) = ui::pages::run(&mut state, &mut terminal) {
        log::error!("Console I/O failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
