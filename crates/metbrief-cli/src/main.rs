//! Thin driver around the decoding engine: read a raw report from a
//! file or stdin, decode it, print the interpretation as JSON.
//!
//! Decode failures are data, not process errors; the exit code is
//! non-zero only for I/O faults.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use metbrief_decoder::{MetarDecoder, RawReport, ReportKind, TafDecoder};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Metar,
    Taf,
}

impl From<Kind> for ReportKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Metar => ReportKind::Metar,
            Kind::Taf => ReportKind::Taf,
        }
    }
}

/// Decode raw METAR/TAF report text into a structured interpretation.
#[derive(Debug, Parser)]
#[command(name = "metbrief", version)]
struct Args {
    /// Report kind of the input text.
    #[arg(long, value_enum)]
    kind: Kind,

    /// Station identifier to attach to the report.
    #[arg(long, default_value = "ZZZZ")]
    station: String,

    /// File with the raw report body; stdin when omitted.
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let raw_text = read_input(args.file.as_deref())?;
    let report = RawReport::new(args.kind.into(), args.station, raw_text);

    tracing::info!(station = %report.station, kind = ?report.kind, "decoding report");

    let json = match report.kind {
        ReportKind::Metar => {
            let result = MetarDecoder::new().decode(&report.raw_text);
            serde_json::to_string_pretty(&result)?
        }
        ReportKind::Taf => {
            let result = TafDecoder::new().decode(&report.raw_text);
            serde_json::to_string_pretty(&result)?
        }
    };
    println!("{json}");

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(file: Option<&std::path::Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}
