//! StatusLight - reactive controller light bar
//!
//! CLI entry point for running the light bar loops and diagnosing setup.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use statuslight::cli::{Cli, Command};
use statuslight::config::Config;
use statuslight::device::{Device, SysfsDevice};
use statuslight::memory::{ProcessLocator, ProcessMemory, ProcfsLocator};
use statuslight::probe::{self, Reading};
use statuslight::supervisor::Supervisor;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("statuslight")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("statuslight.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None | Some(Command::Run) => cmd_run(&config).await,
        Some(Command::Check) => cmd_check(&config),
        Some(Command::Config) => cmd_config(&config),
    }
}

/// Drive the light bar until interrupted or the controller is lost
async fn cmd_run(config: &Config) -> Result<()> {
    debug!("cmd_run: called");
    let device: Arc<dyn Device> =
        Arc::new(SysfsDevice::discover(&config.device).context("Failed to initialize controller")?);

    let mut supervisor = Supervisor::start(config, device, ProcfsLocator::default());
    println!(
        "{} StatusLight running. Swipe left = {}, swipe right = {}. Flashes on alerts in {}.",
        "✓".green(),
        "Stealth".blue(),
        "Alert".red(),
        config.probe.process_name.cyan()
    );
    info!("Running. Press Ctrl+C to stop.");

    let failure = wait_for_shutdown(&mut supervisor).await?;

    println!("Stopping...");
    info!("Shutting down");
    supervisor.shutdown().await?;

    match failure {
        Some(report) => Err(report),
        None => Ok(()),
    }
}

/// Block until SIGINT/SIGTERM (returns `None`) or a loop failure (returns the report)
async fn wait_for_shutdown(supervisor: &mut Supervisor) -> Result<Option<eyre::Report>> {
    debug!("wait_for_shutdown: setting up signal handlers");
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => {
                warn!("SIGINT received");
                Ok(None)
            }
            _ = sigterm.recv() => {
                warn!("SIGTERM received");
                Ok(None)
            }
            report = supervisor.wait_for_failure() => {
                tracing::error!(error = %report, "Loop failed");
                Ok(Some(report))
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                warn!("Ctrl+C received");
                Ok(None)
            }
            report = supervisor.wait_for_failure() => {
                tracing::error!(error = %report, "Loop failed");
                Ok(Some(report))
            }
        }
    }
}

/// Report what discovery and a single candidate scan see
fn cmd_check(config: &Config) -> Result<()> {
    debug!("cmd_check: called");

    match SysfsDevice::discover(&config.device) {
        Ok(device) => {
            println!("{} Controller light bar: {}", "✓".green(), device.led_dir().display());
            device.release().context("Failed to release controller")?;
        }
        Err(e) => println!("{} Controller: {}", "✗".red(), e),
    }

    let locator = ProcfsLocator::default();
    let process = match locator.attach(&config.probe.process_name) {
        Ok(process) => process,
        Err(e) => {
            println!("{} Game process: {}", "✗".red(), e);
            return Ok(());
        }
    };
    println!(
        "{} Game process: {} (pid {})",
        "✓".green(),
        config.probe.process_name.cyan(),
        process.pid()
    );

    for entry in probe::inspect(&process, &config.probe) {
        let verdict = match entry.reading {
            Reading::Plausible(_) => "✓".green(),
            Reading::OutOfRange(_) => "~".yellow(),
            Reading::Failed(_) => "✗".red(),
        };
        println!("  {} {} {}", verdict, entry.candidate, entry.reading.to_string().dimmed());
    }

    Ok(())
}

/// Print the effective configuration
fn cmd_config(config: &Config) -> Result<()> {
    debug!("cmd_config: called");
    print!("{}", config.to_yaml()?);
    Ok(())
}
