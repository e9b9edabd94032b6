//! Autoclicker CLI
//!
//! Reads commands from stdin in place of a settings window. Press enter (or
//! the hotkey letter followed by enter) to toggle clicking.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use autoclicker::config::AppConfig;
use autoclicker::console::{self, ConsoleCommand, Outcome};
use autoclicker::input::Clicker;
use autoclicker::AutoClicker;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file; defaults are used when omitted or unreadable
    config: Option<PathBuf>,
}

#[cfg(feature = "desktop-input")]
fn clicker() -> impl Clicker + 'static {
    autoclicker::input::EnigoClicker::new()
}

#[cfg(not(feature = "desktop-input"))]
fn clicker() -> impl Clicker + 'static {
    log::warn!("Built without desktop-input; clicks are only logged (RUST_LOG=debug to see them)");
    autoclicker::input::DryRunClicker::new()
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match args.config {
        Some(path) => AppConfig::load_or_default(path),
        None => AppConfig::default(),
    };

    let mut app = match AutoClicker::new(&config, clicker()) {
        Ok(app) => app,
        Err(e) => {
            log::error!("Failed to start click engine: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Autoclicker");
    println!("===========");
    println!("{}", console::HELP);
    println!();
    println!("{}", app.panel().toggle_label());

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("Failed to read input: {}", e);
                break;
            }
        };

        let command = match ConsoleCommand::parse(&line, app.panel().hotkey()) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match console::execute(&mut app, command) {
            Outcome::Reply(reply) => println!("{}", reply),
            Outcome::Quit => break,
        }
        let _ = io::stdout().flush();
    }

    println!("Shutting down...");
    if let Err(e) = app.shutdown(SHUTDOWN_TIMEOUT) {
        log::error!("{}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
