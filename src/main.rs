//! # Analog Mouse Bridge
//!
//! Drive the host pointer from a two-axis analog joystick streamed over serial.
//!
//! This application reads `axis0,axis1` sample lines from the joystick board
//! and injects relative pointer motion through a uinput virtual mouse.

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal::unix::{signal, SignalKind};
use tokio::time::{sleep, Duration};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use analog_mouse_bridge::bridge::MotionBridge;
use analog_mouse_bridge::config::Config;
use analog_mouse_bridge::pointer::virtual_mouse::VirtualMouse;
use analog_mouse_bridge::serial::SampleSerial;

#[derive(Parser)]
#[command(name = "analog-mouse-bridge")]
#[command(about = "Move the mouse pointer with an analog joystick on a serial port")]
struct Cli {
    /// Config file path (built-in defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); overrides the config file
    #[arg(long)]
    log_level: Option<String>,
}

/// Main entry point for Analog Mouse Bridge
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration and set up logging
///    - Parse the response curve and build the sample loop
///    - Create the virtual mouse and open the serial port
///
/// 2. **Main Loop**
///    - Read one line, move the pointer, repeat
///    - `SIGUSR1` toggles pointer injection on and off
///    - Ctrl+C exits
///
/// # Errors
///
/// Returns error if:
/// - The configuration is invalid
/// - uinput is not accessible
/// - The serial port cannot be opened, fails, or closes
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    let _log_guard = init_logging(level, &config.logging.file)?;

    info!("Analog Mouse Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut bridge = MotionBridge::from_config(&config)?;
    let transform = bridge.transform();
    info!(
        "Curve {} at {} px/s, {:.2} px per sample at full deflection",
        transform.curve(),
        transform.velocity().max_speed(),
        transform.velocity().pixels_per_sample()
    );

    let mut mouse = VirtualMouse::new(&config.pointer.device_name)?;
    if let Some(path) = mouse.device_path() {
        info!("Virtual pointer at {}", path.display());
    }

    let serial = SampleSerial::open(&config.serial)?;
    info!("Serial port opened at: {}", serial.device_path());

    // Boards with USB CDC reset when the port opens; let them boot first
    if config.serial.settle_ms > 0 {
        sleep(Duration::from_millis(config.serial.settle_ms)).await;
    }

    let enabled = bridge.enabled_handle();
    let mut toggle = signal(SignalKind::user_defined1())?;
    tokio::spawn(async move {
        while toggle.recv().await.is_some() {
            let now_enabled = !enabled.fetch_xor(true, Ordering::Relaxed);
            info!("Pointer injection {}", if now_enabled { "enabled" } else { "disabled" });
        }
    });

    info!("Reading samples. Send SIGUSR1 to toggle, Ctrl+C to exit");

    tokio::select! {
        result = bridge.run(serial.into_reader(), &mut mouse) => {
            warn!("Sample loop stopped: {}", bridge_error_label(&result));
            result?;
        }

        // Handle Ctrl+C for graceful shutdown
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }

    info!("{}", bridge.stats());
    Ok(())
}

fn bridge_error_label(result: &analog_mouse_bridge::error::Result<()>) -> String {
    match result {
        Ok(()) => "finished".to_string(),
        Err(e) => e.to_string(),
    }
}

/// Set up the tracing subscriber
///
/// `RUST_LOG` takes precedence over `level`. When `file` is non-empty, logs
/// go to that file through a non-blocking writer whose guard must be kept
/// alive for the life of the program.
fn init_logging(level: &str, file: &str) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if file.is_empty() {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        return Ok(None);
    }

    let path = Path::new(file);
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", file))?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(Some(guard))
}
