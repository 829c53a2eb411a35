//! DroidPulse - AI-assisted Android device health dashboard.
//!
//! Collects device telemetry over ADB, runs a health analysis (LLM-backed
//! with a deterministic fallback), and renders the verdict as a terminal
//! dashboard, JSON, or an HTML report.

mod dashboard;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};
use droidpulse_common::adb::Adb;
use droidpulse_common::error::PulseError;
use droidpulse_common::llm::LlmConfig;
use droidpulse_common::{analysis, collector, netdiag};
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(name = "droidpulse")]
#[command(about = "AI-assisted Android device health dashboard", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the device and show the health dashboard
    Scan {
        /// Target device ID (default: first found)
        #[arg(short, long)]
        device: Option<String>,

        /// Show raw collected data before the dashboard
        #[arg(short, long)]
        verbose: bool,

        /// Print machine-readable JSON only
        #[arg(long)]
        json: bool,

        /// Also write an HTML report
        #[arg(short, long)]
        report: bool,
    },

    /// Run network diagnostics against the device
    Diag {
        /// Target device ID (default: first found)
        #[arg(short, long)]
        device: Option<String>,
    },

    /// Switch the bridge to TCP mode and reconnect over the network
    Wireless {
        /// Target device ID (default: first found)
        #[arg(short, long)]
        device: Option<String>,

        /// TCP port to listen on
        #[arg(long, default_value_t = netdiag::DEFAULT_WIRELESS_PORT)]
        port: u16,
    },

    /// Revert the bridge to the direct USB link
    Wired {
        /// Target device ID (default: first found)
        #[arg(short, long)]
        device: Option<String>,
    },

    /// List connected devices
    Devices,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so --json output stays parseable.
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            device,
            verbose,
            json,
            report,
        } => scan(device, verbose, json, report).await,
        Commands::Diag { device } => diag(device).await,
        Commands::Wireless { device, port } => wireless(device, port).await,
        Commands::Wired { device } => wired(device).await,
        Commands::Devices => devices().await,
    }
}

/// Resolve the target device or fail with an operator checklist.
async fn resolve_device(requested: Option<String>) -> Result<String, PulseError> {
    let devices = Adb::list_devices().await;
    if devices.is_empty() {
        return Err(PulseError::NoDevices);
    }
    match requested {
        Some(id) if devices.contains(&id) => Ok(id),
        Some(id) => Err(PulseError::DeviceNotFound {
            requested: id,
            available: devices,
        }),
        None => Ok(devices[0].clone()),
    }
}

async fn scan(device: Option<String>, verbose: bool, json: bool, report: bool) -> Result<()> {
    let device = resolve_device(device).await?;
    let adb = Adb::new(Some(device));

    let record = collector::collect_all(&adb).await;

    let config = LlmConfig::from_env();
    let analysis = {
        let record = record.clone();
        tokio::task::spawn_blocking(move || analysis::run_analysis(&record, config)).await?
    };

    if json {
        let output = serde_json::json!({
            "device_data": record,
            "analysis": analysis,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if verbose {
        println!("\n=== RAW DEVICE DATA ===");
        println!("{}", serde_json::to_string_pretty(&record)?);
        println!("\n=== ANALYSIS ===");
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        println!("\n=== DASHBOARD ===");
        dashboard::render(&record, &analysis);
    } else {
        dashboard::render(&record, &analysis);
    }

    if report {
        let path = report::write_report(&record, &analysis)?;
        println!("\nHTML report saved: {}", path.display());
    }

    Ok(())
}

async fn diag(device: Option<String>) -> Result<()> {
    let device = resolve_device(device).await?;
    let adb = Adb::new(Some(device));
    let diagnostics = netdiag::collect_diagnostics(&adb).await;
    dashboard::render_diagnostics(&diagnostics);
    Ok(())
}

async fn wireless(device: Option<String>, port: u16) -> Result<()> {
    let device = resolve_device(device).await?;
    let adb = Adb::new(Some(device));
    let target = netdiag::switch_to_wireless(&adb, port).await?;
    println!("Connected wirelessly to {}", target);
    println!("You can now unplug the USB cable.");
    info!("Run further commands with -d {}", target);
    Ok(())
}

async fn wired(device: Option<String>) -> Result<()> {
    let device = resolve_device(device).await?;
    let adb = Adb::new(Some(device));
    let output = netdiag::switch_to_wired(&adb).await;
    if output.is_empty() {
        warn!("No response from the device; verify the link with 'adb devices'");
    } else {
        println!("USB mode: {}", output);
    }
    Ok(())
}

async fn devices() -> Result<()> {
    let devices = Adb::list_devices().await;
    if devices.is_empty() {
        return Err(PulseError::NoDevices.into());
    }
    for device in devices {
        println!("{}", device);
    }
    Ok(())
}
