//! Result and report types shared by the METAR and TAF decoders.
//!
//! All decoded fields are plain strings with explicit "not specified"
//! sentinels rather than `Option`s, so JSON consumers never have to
//! distinguish a missing key from an absent value.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel for fields the report simply does not carry.
pub const NOT_AVAILABLE: &str = "not available";
/// Sentinel for a change group without a wind token.
pub const WIND_NOT_SPECIFIED: &str = "wind not specified";
/// Sentinel for a change group without a visibility token.
pub const VISIBILITY_NOT_SPECIFIED: &str = "visibility not specified";
/// Sentinel for a change group without a period token.
pub const PERIOD_NOT_SPECIFIED: &str = "period not specified";
/// Sentinel when no phenomenon code matches.
pub const NO_SIGNIFICANT_WEATHER: &str = "no significant weather";
/// Sentinel when no cloud layer token is present.
pub const NO_SIGNIFICANT_CLOUDS: &str = "no significant clouds";

/// Kind of aviation weather report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportKind {
    Metar,
    Taf,
}

/// Raw report text as handed over by the retrieval layer.
///
/// Created once by the caller, consumed by a single decode call, never
/// mutated. The decoders place no constraints on how the text was fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawReport {
    pub kind: ReportKind,
    /// ICAO-like 4-letter station identifier. Not validated here.
    pub station: String,
    pub raw_text: String,
}

impl RawReport {
    pub fn new(kind: ReportKind, station: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            kind,
            station: station.into(),
            raw_text: raw_text.into(),
        }
    }
}

/// Classification of a TAF forecast block.
///
/// Block 0 of every TAF is `Principal`; all later blocks are change
/// groups introduced by one of the group keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    #[default]
    Principal,
    Fm,
    Becmg,
    Tempo,
    Prob30,
    Prob40,
    Prob30Tempo,
    Prob40Tempo,
}

impl BlockType {
    /// Classify a change-group block by its text.
    ///
    /// Combined probability groups must win over their parts, so the
    /// checks run longest-first: `PROB40 TEMPO` before `PROB40` before
    /// `TEMPO`. A block matching nothing stays `Principal`.
    pub fn classify(text: &str) -> Self {
        if text.contains("PROB40 TEMPO") {
            Self::Prob40Tempo
        } else if text.contains("PROB30 TEMPO") {
            Self::Prob30Tempo
        } else if text.contains("PROB40") {
            Self::Prob40
        } else if text.contains("PROB30") {
            Self::Prob30
        } else if text.contains("FM") {
            Self::Fm
        } else if text.contains("BECMG") {
            Self::Becmg
        } else if text.contains("TEMPO") {
            Self::Tempo
        } else {
            Self::Principal
        }
    }

    /// Human-readable label used in rendered interpretations.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Principal => "PRINCIPAL (main forecast)",
            Self::Fm => "FROM (from the given time)",
            Self::Becmg => "BECOMING (gradual change)",
            Self::Tempo => "TEMPORARY (temporary)",
            Self::Prob30 => "PROB30 (30% chance)",
            Self::Prob40 => "PROB40 (40% chance)",
            Self::Prob30Tempo => "PROB30 TEMPO (30% chance, temporary)",
            Self::Prob40Tempo => "PROB40 TEMPO (40% chance, temporary)",
        }
    }
}

/// One contiguous logical unit of TAF text, produced by segmentation and
/// consumed by field extraction. Ephemeral within a single decode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastBlock {
    pub block_type: BlockType,
    pub raw_text: String,
}

impl ForecastBlock {
    /// Build a block from its position in the segmented report. Index 0
    /// is always the header and therefore `Principal` regardless of its
    /// text; later blocks classify by content.
    pub fn from_segment(index: usize, raw_text: String) -> Self {
        let block_type = if index == 0 {
            BlockType::Principal
        } else {
            BlockType::classify(&raw_text)
        };
        Self { block_type, raw_text }
    }
}

/// Decoded fields of a single METAR observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetarFields {
    pub aerodrome: String,
    /// Raw DDHHMMZ observation time token.
    pub observed_at: String,
    pub wind: String,
    pub visibility: String,
    pub temperature: String,
    pub dew_point: String,
    pub qnh: String,
    pub conditions: String,
    pub clouds: String,
    pub cavok: bool,
}

/// Decoded fields of one TAF forecast block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TafForecast {
    pub block_type: BlockType,
    pub period: String,
    pub wind: String,
    pub visibility: String,
    pub conditions: String,
    pub clouds: String,
}

/// Top-level METAR decode result.
///
/// Decode failures never cross this boundary as errors: `success` is
/// false, `error` carries the message and `raw` keeps the original text
/// for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetarInterpretation {
    pub success: bool,
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<MetarFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MetarInterpretation {
    pub fn decoded(raw: &str, fields: MetarFields) -> Self {
        Self {
            success: true,
            raw: raw.to_string(),
            fields: Some(fields),
            error: None,
        }
    }

    pub fn failure(raw: &str, error: impl Into<String>) -> Self {
        Self {
            success: false,
            raw: raw.to_string(),
            fields: None,
            error: Some(error.into()),
        }
    }
}

/// Top-level TAF decode result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TafInterpretation {
    pub success: bool,
    pub raw: String,
    pub aerodrome: String,
    pub validity: String,
    pub forecasts: Vec<TafForecast>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TafInterpretation {
    pub fn failure(raw: &str, error: impl Into<String>) -> Self {
        Self {
            success: false,
            raw: raw.to_string(),
            aerodrome: NOT_AVAILABLE.to_string(),
            validity: NOT_AVAILABLE.to_string(),
            forecasts: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Errors raised inside the decode pipeline.
///
/// These never escape the public `decode` operations; they are folded
/// into the `success = false` result shape at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("empty report text")]
    EmptyReport,
}
