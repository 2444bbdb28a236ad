//! METAR/TAF decoding engine for MetBrief.
//!
//! Turns raw coded aviation weather reports into structured,
//! human-readable interpretations:
//! - [`MetarDecoder`] decodes a single-line observation into a flat
//!   field set,
//! - [`TafDecoder`] decodes a multi-line forecast into ordered change
//!   groups sharing the same field shape.
//!
//! Both decoders are pure and stateless aside from their static
//! phenomenon code tables; retrieval of the raw text is the caller's
//! concern. Decode failures never surface as errors: results carry a
//! `success` flag with the original text preserved for diagnostics, and
//! every result type serializes to JSON via serde.

pub mod codes;
pub mod metar;
pub mod taf;
pub mod token;
pub mod types;

pub use codes::PhenomenonTable;
pub use metar::MetarDecoder;
pub use taf::TafDecoder;
pub use types::{
    BlockType, DecodeError, ForecastBlock, MetarFields, MetarInterpretation, RawReport,
    ReportKind, TafForecast, TafInterpretation,
};

/// Decode a single METAR report with a one-shot decoder.
///
/// Callers decoding repeatedly should construct a [`MetarDecoder`] once
/// and reuse it.
pub fn decode_metar(raw_text: &str) -> MetarInterpretation {
    MetarDecoder::new().decode(raw_text)
}

/// Decode a single TAF report with a one-shot decoder.
///
/// Callers decoding repeatedly should construct a [`TafDecoder`] once
/// and reuse it.
pub fn decode_taf(raw_text: &str) -> TafInterpretation {
    TafDecoder::new().decode(raw_text)
}
