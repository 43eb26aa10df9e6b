//! hid-replay - offline driver for the Wacom Bluetooth protocol crate
//!
//! Feeds captured or hand-typed reports through a [`TabletSession`] and prints
//! the decoded event stream, and exercises speed negotiation against a
//! simulated control channel.

#![deny(static_mut_refs)]

mod capture;
mod config;
mod output;
mod sim;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use opentablet_hid_common::HidDeviceInfo;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tablet_hid_wacom_bt_protocol::{
    ReportDisposition, SessionConfig, Speed, SpeedError, TabletSession, TabletVariant,
    WACOM_VENDOR_ID,
};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::capture::{CaptureFile, parse_hex_bytes, parse_hex_u16};
use crate::config::{OutputFormat, ReplayConfig};
use crate::output::{PrintSink, write_stats};
use crate::sim::SimulatedWriter;

#[derive(Parser)]
#[command(
    name = "hid-replay",
    about = "Replay Wacom Bluetooth HID reports through the protocol decoder"
)]
#[command(version)]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode every report of an hid-capture JSON file
    Replay {
        /// Capture file written by hid-capture
        capture: PathBuf,
        /// Product ID override (hex, e.g. 0x00BD)
        #[arg(long, value_parser = parse_hex_u16)]
        product: Option<u16>,
    },
    /// Decode a single report given as hex bytes
    Decode {
        /// Report bytes, e.g. 03 90 10 00 20 00 00 00
        #[arg(required = true, num_args = 1..)]
        bytes: Vec<String>,
        /// Product ID (hex, default: Graphire 0x0081)
        #[arg(long, value_parser = parse_hex_u16)]
        product: Option<u16>,
    },
    /// Negotiate reporting speed against a simulated tablet
    Speed {
        /// Requested speed: 0 (low) or 1 (high)
        value: String,
        /// Number of leading control writes the simulated tablet rejects
        #[arg(long, default_value = "0")]
        fail_writes: usize,
        /// Extra attempts per control write
        #[arg(long)]
        retries: Option<u8>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ReplayConfig::load(path)?,
        None => ReplayConfig::default(),
    };

    let log_level = match (cli.verbose, config.log_level.as_deref()) {
        (0, Some(level)) => level.to_string(),
        (0, None) => "warn".to_string(),
        (1, _) => "info".to_string(),
        (2, _) => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("hid_replay={0},tablet_hid_wacom_bt_protocol={0}", log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        config.output
    };

    match cli.command {
        Commands::Replay { capture, product } => replay(&capture, product, &config, format),
        Commands::Decode { bytes, product } => decode(&bytes, product, &config, format),
        Commands::Speed {
            value,
            fail_writes,
            retries,
        } => speed(&value, fail_writes, retries, &config, format),
    }
}

fn open_session(vendor_id: u16, product_id: u16, config: SessionConfig) -> Result<TabletSession> {
    let info = HidDeviceInfo::new(vendor_id, product_id);
    TabletSession::for_device(&info, config).context("Cannot decode reports for this device")
}

/// Pick the product id for a capture: explicit flag, then the capture's own
/// id when it is a supported tablet, then the config file.
fn resolve_product(flag: Option<u16>, captured: (u16, u16), config: &ReplayConfig) -> u16 {
    if let Some(pid) = flag {
        return pid;
    }
    let (vid, pid) = captured;
    if TabletVariant::from_ids(vid, pid).is_some() {
        return pid;
    }
    match config.product_id {
        Some(fallback) => {
            warn!(
                "Capture device {:04x}:{:04x} is not a supported tablet, using product {:04x} from config",
                vid, pid, fallback
            );
            fallback
        }
        None => pid,
    }
}

fn replay(
    path: &std::path::Path,
    product: Option<u16>,
    config: &ReplayConfig,
    format: OutputFormat,
) -> Result<()> {
    let file = CaptureFile::load(path)?;
    let captured = file.ids()?;
    let product_id = resolve_product(product, captured, config);
    let mut session = open_session(
        WACOM_VENDOR_ID,
        product_id,
        config.session.to_session_config(),
    )?;
    info!(
        "Replaying {} reports as {}",
        file.captures.len(),
        session.variant().name()
    );

    let stdout = std::io::stdout();
    let mut sink = PrintSink::new(stdout.lock(), format);
    for report in &file.captures {
        let data = report.bytes()?;
        if let ReportDisposition::Dropped(err) = session.handle_report(&data, &mut sink) {
            debug!(
                "t={}us report {:#04x} dropped: {}",
                report.timestamp_us, report.report_id, err
            );
        }
    }
    let mut out = sink.finish()?;
    write_stats(&mut out, format, session.variant().name(), session.stats())?;
    out.flush()?;
    Ok(())
}

fn decode(
    bytes: &[String],
    product: Option<u16>,
    config: &ReplayConfig,
    format: OutputFormat,
) -> Result<()> {
    let data = parse_hex_bytes(bytes.iter().flat_map(|b| b.split_whitespace()))?;
    let product_id = product
        .or(config.product_id)
        .unwrap_or(TabletVariant::Graphire.product_id());
    let mut session = open_session(
        WACOM_VENDOR_ID,
        product_id,
        config.session.to_session_config(),
    )?;

    let stdout = std::io::stdout();
    let mut sink = PrintSink::new(stdout.lock(), format);
    let disposition = session.handle_report(&data, &mut sink);
    let mut out = sink.finish()?;

    match disposition {
        ReportDisposition::Decoded { anomalies, .. } if anomalies > 0 => {
            warn!("{} sub-report(s) skipped", anomalies);
        }
        ReportDisposition::Decoded { .. } => {}
        ReportDisposition::Dropped(err) => bail!("Report not decoded: {err}"),
    }
    out.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct SpeedOutcome {
    requested: Speed,
    current: Speed,
    applied: bool,
    writes_attempted: usize,
    writes_accepted: usize,
    error: Option<String>,
}

fn speed(
    value: &str,
    fail_writes: usize,
    retries: Option<u8>,
    config: &ReplayConfig,
    format: OutputFormat,
) -> Result<()> {
    let mut session_config = config.session.to_session_config();
    if let Some(retries) = retries {
        session_config.max_retries = retries;
    }
    let mut session = TabletSession::new(TabletVariant::Graphire, session_config);
    let mut writer = SimulatedWriter::new(fail_writes);

    let (requested, error) = match session.store_speed(value, &mut writer) {
        Ok(speed) => (speed, None),
        Err(SpeedError::Control(e)) => {
            let requested = Speed::parse_attr(value)?;
            (requested, Some(e.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let outcome = SpeedOutcome {
        requested,
        current: session.speed(),
        applied: error.is_none(),
        writes_attempted: writer.attempts(),
        writes_accepted: writer.accepted().len(),
        error,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut out, &outcome)?;
            writeln!(out)?;
        }
        OutputFormat::Human => {
            writeln!(out, "Requested speed: {}", outcome.requested)?;
            writeln!(out, "Current speed:   {}", outcome.current)?;
            writeln!(
                out,
                "Control writes:  {} attempted, {} accepted",
                outcome.writes_attempted, outcome.writes_accepted
            )?;
            if let Some(err) = &outcome.error {
                writeln!(out, "Negotiation failed: {err}")?;
            }
        }
    }
    Ok(())
}
