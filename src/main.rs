//! Joystick Sounds
//!
//! Plays an animal sound for each direction of a Grove dual-axis joystick
//! attached to a Raspberry Pi Base Hat. Press Ctrl+C to exit.

use anyhow::{Context, Result};
use clap::Parser;
use linux_embedded_hal::I2cdev;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use joystick_sounds::audio::{RodioPlayback, SoundBank};
use joystick_sounds::input::GroveAdc;
use joystick_sounds::poll_loop::{LoopSettings, PollLoop};
use joystick_sounds::{AppConfig, ShutdownFlag};

const DEFAULT_CONFIG: &str = "config.yaml";

/// Joystick Sounds - play animal sounds from a Grove joystick
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (built-in defaults are used when the
    /// default file does not exist)
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level)?;

    info!("Starting Joystick Sounds v{}...", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args.config).await?;
    info!(
        "Joystick on channels X={} Y={}, threshold {}",
        config.x_channel, config.y_channel, config.threshold
    );

    let shutdown = ShutdownFlag::new();
    shutdown.listen_for_signals();

    // Hardware init failures are fatal: the loop is never entered
    let i2c = I2cdev::new(&config.adc.bus)
        .with_context(|| format!("Failed to open I2C bus {}", config.adc.bus.display()))?;
    let mut adc = GroveAdc::new(i2c, config.adc.address);
    adc.probe().with_context(|| {
        format!(
            "No ADC responding at 0x{:02X} on {}",
            config.adc.address,
            config.adc.bus.display()
        )
    })?;
    info!("ADC ready at 0x{:02X}", config.adc.address);

    let player = RodioPlayback::open_default().context("Failed to initialize audio output")?;
    let sounds = SoundBank::load(&config.sounds).await;

    let mut poll = PollLoop::new(
        LoopSettings::from_config(&config),
        adc,
        player,
        sounds,
        shutdown,
    );
    poll.run().await;

    // Closes the I2C handle and the audio output
    drop(poll);

    info!("Joystick Sounds shutdown complete");
    Ok(())
}

async fn load_config(path: &Path) -> Result<AppConfig> {
    if path == Path::new(DEFAULT_CONFIG) && !path.exists() {
        warn!("{} not found, using built-in defaults", DEFAULT_CONFIG);
        return Ok(AppConfig::default());
    }

    let config = AppConfig::load(path).await?;
    info!("Configuration loaded from {}", path.display());
    Ok(config)
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}
