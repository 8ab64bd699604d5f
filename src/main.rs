//! warp-starfield - headless warp starfield renderer
//!
//! Entry point for the renderer binary.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use warp_starfield::config::{Config, ConfigOverrides, LoggingConfig};
use warp_starfield::health::{HealthWidget, HttpHealthProbe};
use warp_starfield::host::StarfieldHost;

/// Command-line arguments for warp-starfield
#[derive(Parser, Debug)]
#[command(name = "warp-starfield")]
#[command(version, about = "Headless warp starfield renderer", long_about = None)]
pub struct Args {
    /// Configuration file path (defaults are used when omitted)
    #[arg(short, long, env = "STARFIELD_CONFIG")]
    pub config: Option<String>,

    /// Stop after this many frames
    #[arg(short = 'n', long, env = "STARFIELD_FRAMES")]
    pub frames: Option<u64>,

    /// Repaint rate in frames per second
    #[arg(long, env = "STARFIELD_FPS")]
    pub fps: Option<u32>,

    /// Logical surface width
    #[arg(long)]
    pub width: Option<u32>,

    /// Logical surface height
    #[arg(long)]
    pub height: Option<u32>,

    /// Device pixel ratio
    #[arg(long)]
    pub dpr: Option<f64>,

    /// Number of stars
    #[arg(long)]
    pub stars: Option<usize>,

    /// Fixed pointer X position (logical pixels)
    #[arg(long)]
    pub pointer_x: Option<f64>,

    /// RNG seed for reproducible output
    #[arg(long, env = "STARFIELD_SEED")]
    pub seed: Option<u64>,

    /// Write the last frame to this PNG file
    #[arg(short, long)]
    pub snapshot: Option<String>,

    /// Query the health endpoint and print its status
    #[arg(long)]
    pub health: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    pub print_default_config: bool,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log format (json|pretty|compact)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Write logs to file (in addition to stdout)
    #[arg(long)]
    pub log_file: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            width: self.width,
            height: self.height,
            device_pixel_ratio: self.dpr,
            target_fps: self.fps,
            max_frames: self.frames,
            star_count: self.stars,
            health: self.health,
            seed: self.seed,
            log_format: self.log_format.clone(),
            log_file: self.log_file.clone().map(PathBuf::from),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::default_config().to_toml()?);
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default_config(),
    };
    let config = config.with_overrides(&args.overrides());
    config.validate()?;

    let _log_guard = init_logging(args.verbose, &config.logging)?;

    info!("════════════════════════════════════════════════════════");
    info!("  warp-starfield v{}", env!("CARGO_PKG_VERSION"));
    info!("  Built: {} {}", env!("BUILD_DATE"), env!("BUILD_TIME"));
    info!("  Commit: {}", env!("GIT_HASH"));
    info!("  Profile: {}", if cfg!(debug_assertions) { "debug" } else { "release" });
    info!("════════════════════════════════════════════════════════");

    info!("Configuration loaded successfully");
    tracing::debug!("Config: {:?}", config);

    let health = if config.health.enabled {
        let probe = HttpHealthProbe::from_config(&config.health)?;
        info!("Health endpoint: {}", probe.url());
        Some(tokio::spawn(async move {
            let mut widget = HealthWidget::new(probe);
            widget.refresh().await;
            widget.display()
        }))
    } else {
        None
    };

    let (host, handle) = StarfieldHost::from_config(&config);
    if let Some(x) = args.pointer_x {
        handle.pointer_move(x, config.surface.height as f64 / 2.0);
    }

    if config.frame.frame_limit().is_none() {
        info!("Running until interrupted (Ctrl+C)");
    }

    let mut task = tokio::spawn(host.run());
    let report = tokio::select! {
        result = &mut task => result.context("Host task panicked")??,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, shutting down");
            handle.shutdown().await?;
            task.await.context("Host task panicked")??
        }
    };

    if let Some(health) = health {
        println!("{}", health.await.context("Health task panicked")?);
    }

    if let Some(path) = &args.snapshot {
        report.surface.save_png(path)?;
        info!("Snapshot written to {}", path);
    }

    println!("{}", serde_json::to_string_pretty(&report.stats)?);
    info!("Starfield stopped ({:?})", report.final_state);
    Ok(())
}

fn init_logging(verbose: u8, logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let log_level = match verbose {
        0 => logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let log_format = logging.format.as_str();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // reqwest/hyper connection chatter stays at info
        tracing_subscriber::EnvFilter::new(format!(
            "warp_starfield={level},reqwest=info,hyper=info,warn",
            level = log_level
        ))
    });

    // If log file is specified, write to both stdout and file
    if let Some(log_file_path) = &logging.log_file {
        let file = std::fs::File::create(log_file_path)
            .context(format!("Failed to create log file: {}", log_file_path.display()))?;
        let (writer, guard) = tracing_appender::non_blocking(file);

        match log_format {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(std::io::stdout),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(writer)
                            .with_ansi(false),
                    )
                    .init();
            }
            "compact" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(std::io::stdout),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(writer)
                            .with_ansi(false),
                    )
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_writer(std::io::stdout),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(writer)
                            .with_ansi(false),
                    )
                    .init();
            }
        }
        info!("Logging to file: {}", log_file_path.display());
        Ok(Some(guard))
    } else {
        // Stdout only
        match log_format {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().json())
                    .init();
            }
            "compact" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().compact())
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().pretty())
                    .init();
            }
        }
        Ok(None)
    }
}
