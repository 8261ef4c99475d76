//! hdmi-linkcheck - HDMI link capability checker
//!
//! Entry point for the CLI binary.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use hdmi_linkcheck::{config, config::Config, display, report, runner::LinkTester};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for hdmi-linkcheck
#[derive(Parser, Debug)]
#[command(name = "hdmi-linkcheck")]
#[command(version, about = "HDMI link capability checker", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Stability sampling duration in seconds
    #[arg(short, long, env = "HDMI_LINKCHECK_DURATION")]
    pub duration: Option<u32>,

    /// Skip the timed stability test
    #[arg(long)]
    pub skip_stability: bool,

    /// Save the JSON report after the run
    #[arg(short, long)]
    pub save: bool,

    /// Report file path (implies --save)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Console output format (text|json)
    ///
    /// Default is the human-readable report. Use json for machine parsing;
    /// the same structure is written by --save.
    #[arg(long, default_value = "text")]
    pub format: String,

    /// List the OS-reported mode catalog and exit
    ///
    /// Useful for debugging detection issues and seeing exactly which
    /// modes the probes evaluate.
    #[arg(long)]
    pub list_modes: bool,

    /// List connected display identities and exit
    #[arg(long)]
    pub list_displays: bool,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log format (json|pretty|compact)
    #[arg(long, default_value = "compact")]
    pub log_format: String,

    /// Write logs to file (in addition to the console)
    #[arg(long)]
    pub log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config::default_config_path().display().to_string());

    // Silently fall back to defaults if the config doesn't exist yet
    let config = Config::load(&config_path).unwrap_or_default();

    init_logging(&args, &config.logging)?;

    info!("hdmi-linkcheck v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Built: {} ({})",
        option_env!("BUILD_DATE").unwrap_or("unknown"),
        option_env!("GIT_HASH").unwrap_or("unknown")
    );

    let enumerator = display::detect_backend().await;

    if args.list_modes {
        return list_modes(enumerator.as_ref()).await;
    }
    if args.list_displays {
        return list_displays(enumerator.as_ref()).await;
    }

    let config = config.with_overrides(args.duration, args.skip_stability);
    config.validate()?;

    // Ctrl-C stops the stability loop early; partial samples are kept
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::broadcast::channel(1);
    let ctrl_c_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            warn!("Ctrl-C received, finishing with partial results");
            let _ = ctrl_c_tx.send(());
        }
    });

    let tester = LinkTester::new(config.clone());
    let link_report = tester.run(enumerator.as_ref(), &mut shutdown_rx).await;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&link_report)?),
        _ => println!("{}", report::render::format_text(&link_report)),
    }

    if args.save || args.output.is_some() || config.report.auto_save {
        let path = args.output.clone().unwrap_or_else(|| {
            let filename = report::default_report_filename(link_report.timestamp);
            match &config.report.output_dir {
                Some(dir) => dir.join(filename),
                None => filename,
            }
        });

        // Persistence failure is a status outcome, not a run failure
        match report::save(&link_report, &path) {
            Ok(saved) => println!("Report saved to: {}", saved.display()),
            Err(err) => {
                warn!(%err, "failed to save report");
                eprintln!("Failed to save report: {err:#}");
            }
        }
    }

    Ok(())
}

/// Print the raw mode catalog
async fn list_modes(enumerator: &dyn display::DisplayEnumerator) -> Result<()> {
    let modes = enumerator.list_available_modes().await?;
    if modes.is_empty() {
        println!("No display modes reported ({} backend)", enumerator.name());
        return Ok(());
    }

    println!("Available modes ({} backend):", enumerator.name());
    for mode in modes {
        println!("  {}x{} @ {}Hz", mode.width_px, mode.height_px, mode.refresh_hz);
    }
    Ok(())
}

/// Print connected display identities
async fn list_displays(enumerator: &dyn display::DisplayEnumerator) -> Result<()> {
    let displays = enumerator.list_connected_displays().await?;
    if displays.is_empty() {
        println!("No connected displays detected ({} backend)", enumerator.name());
        return Ok(());
    }

    println!("Connected displays ({} backend):", enumerator.name());
    for display in displays {
        print!("  {}", display.friendly_name);
        if !display.manufacturer.is_empty() {
            print!(" [{} {}]", display.manufacturer, display.product_code);
        }
        if display.is_primary == Some(true) {
            print!(" (primary)");
        }
        println!();
    }
    Ok(())
}

fn init_logging(args: &Args, logging_config: &config::LoggingConfig) -> Result<()> {
    use std::fs::{self, File};

    // CLI -v flag overrides config
    let log_level = if args.verbose > 0 {
        match args.verbose {
            1 => "debug",
            _ => "trace",
        }
    } else {
        match logging_config.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => logging_config.level.as_str(),
            _ => "info",
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("hdmi_linkcheck={log_level},warn")));

    // CLI --log-file overrides config.log_dir
    let log_file_path: Option<String> = if let Some(cli_path) = &args.log_file {
        Some(cli_path.clone())
    } else if logging_config.log_dir.is_some() {
        let log_dir = config::resolve_log_dir(&logging_config.log_dir);
        if let Err(err) = fs::create_dir_all(&log_dir) {
            eprintln!("Warning: Cannot create log directory {}: {err}", log_dir.display());
            None
        } else {
            let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
            Some(
                log_dir
                    .join(format!("hdmi-linkcheck-{timestamp}.log"))
                    .display()
                    .to_string(),
            )
        }
    } else {
        None
    };

    // Gracefully fall back to console-only if file creation fails
    let log_file = log_file_path.and_then(|path| match File::create(&path) {
        Ok(file) => Some((file, path)),
        Err(err) => {
            eprintln!("Warning: Cannot create log file {path:?}: {err} — logging to console only");
            None
        }
    });

    if let Some((file, path)) = log_file {
        match args.log_format.as_str() {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                    .with(tracing_subscriber::fmt::layer().json().with_writer(file).with_ansi(false))
                    .init();
            }
            "pretty" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                    .with(tracing_subscriber::fmt::layer().with_writer(file).with_ansi(false))
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
                    .with(tracing_subscriber::fmt::layer().compact().with_writer(file).with_ansi(false))
                    .init();
            }
        }
        info!("Logging to file: {path}");
    } else {
        match args.log_format.as_str() {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                    .init();
            }
            "pretty" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
                    .init();
            }
        }
    }

    Ok(())
}
