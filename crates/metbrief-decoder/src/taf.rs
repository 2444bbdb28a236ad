//! TAF decoder: a multi-line forecast into ordered change groups.
//!
//! Three stages, each testable on its own:
//! - line-join normalization, repairing the upstream wrap that splits a
//!   `PROB40` marker from its `TEMPO` group,
//! - block segmentation, one block per change-group keyword,
//! - per-block field extraction over classified tokens.
//!
//! Failures are all-or-nothing per decode call: a stage error discards
//! partial results and surfaces as `success = false` with the raw text
//! kept for diagnostics.

use tracing::debug;

use crate::codes::PhenomenonTable;
use crate::token::{self, ReportToken, TokenKind, WindUnit};
use crate::types::{
    DecodeError, ForecastBlock, TafForecast, TafInterpretation, NOT_AVAILABLE,
    NO_SIGNIFICANT_CLOUDS, NO_SIGNIFICANT_WEATHER, PERIOD_NOT_SPECIFIED,
    VISIBILITY_NOT_SPECIFIED, WIND_NOT_SPECIFIED,
};

const CAVOK_VISIBILITY: &str = "≥10 km (CAVOK)";
const CAVOK_CONDITIONS: &str = "CAVOK - ceiling and visibility OK";

/// Keywords that may open a continuation line split off by the feed.
const CONTINUATION_PREFIXES: [&str; 4] = ["TEMPO", "PROB", "BECMG", "FM"];
/// Probability markers a wrapped line can dangle on.
const PROBABILITY_ENDINGS: [&str; 3] = ["PROB40", "PROB30", "PROB"];
/// Change-group openers, the PROB family longest-first.
const BLOCK_PREFIXES: [&str; 6] = ["PROB40", "PROB30", "PROB", "FM", "BECMG", "TEMPO"];

/// Stateless TAF decoder holding only the static phenomenon table.
#[derive(Debug, Clone)]
pub struct TafDecoder {
    codes: PhenomenonTable,
}

impl Default for TafDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TafDecoder {
    pub fn new() -> Self {
        Self {
            codes: PhenomenonTable::taf(),
        }
    }

    /// Decode a raw TAF body into its interpretation. Never panics and
    /// never returns an error: failures fold into the result shape.
    pub fn decode(&self, raw_text: &str) -> TafInterpretation {
        match self.decode_inner(raw_text) {
            Ok(interpretation) => interpretation,
            Err(err) => {
                debug!(%err, "TAF decode failed");
                TafInterpretation::failure(raw_text, err.to_string())
            }
        }
    }

    fn decode_inner(&self, raw_text: &str) -> Result<TafInterpretation, DecodeError> {
        if raw_text.trim().is_empty() {
            return Err(DecodeError::EmptyReport);
        }

        let normalized = join_wrapped_lines(raw_text);
        let blocks = split_blocks(&normalized);
        let header = blocks.first().ok_or(DecodeError::EmptyReport)?;
        debug!(blocks = blocks.len(), "segmented TAF");

        let header_tokens = token::tokenize(&header.raw_text);
        let forecasts = blocks[1..]
            .iter()
            .map(|block| self.interpret_block(block))
            .collect();

        Ok(TafInterpretation {
            success: true,
            raw: raw_text.to_string(),
            aerodrome: extract_aerodrome(&header_tokens),
            validity: extract_validity(&header_tokens),
            forecasts,
            error: None,
        })
    }

    fn interpret_block(&self, block: &ForecastBlock) -> TafForecast {
        let tokens = token::tokenize(&block.raw_text);
        let cavok = tokens.iter().any(|t| matches!(t.kind, TokenKind::Cavok));

        let (visibility, conditions, clouds) = if cavok {
            (
                CAVOK_VISIBILITY.to_string(),
                CAVOK_CONDITIONS.to_string(),
                NO_SIGNIFICANT_CLOUDS.to_string(),
            )
        } else {
            (
                extract_visibility(&tokens, &block.raw_text),
                extract_conditions(&block.raw_text, self.codes),
                extract_clouds(&tokens),
            )
        };

        TafForecast {
            block_type: block.block_type,
            period: extract_period(&tokens),
            wind: extract_wind(&tokens),
            visibility,
            conditions,
            clouds,
        }
    }
}

/// Stage A: merge a continuation line into its predecessor when that
/// predecessor ends on a dangling probability marker. Each join consumes
/// exactly one lookahead line; everything else passes through unchanged.
pub(crate) fn join_wrapped_lines(text: &str) -> String {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;
    while i < lines.len() {
        let current = lines[i];
        if let Some(&next) = lines.get(i + 1) {
            let continues = CONTINUATION_PREFIXES.iter().any(|p| next.starts_with(p));
            let dangling = PROBABILITY_ENDINGS.iter().any(|s| current.ends_with(s));
            if continues && dangling {
                debug!(current, next, "joining wrapped TAF lines");
                out.push(format!("{current} {next}"));
                i += 2;
                continue;
            }
        }
        out.push(current.to_string());
        i += 1;
    }
    out.join("\n")
}

/// Stage B: a new block starts at every line opening with a change-group
/// keyword; other lines accumulate into the current block. Block 0 is
/// the header even when the report degenerately starts on a keyword.
pub(crate) fn split_blocks(text: &str) -> Vec<ForecastBlock> {
    let mut segments: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if BLOCK_PREFIXES.iter().any(|p| line.starts_with(p)) {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
            current.push(line);
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
        .into_iter()
        .enumerate()
        .map(|(index, lines)| ForecastBlock::from_segment(index, lines.join(" ")))
        .collect()
}

/// First isolated 4-uppercase-letter token of the header.
fn extract_aerodrome(tokens: &[ReportToken<'_>]) -> String {
    tokens
        .iter()
        .find(|t| matches!(t.kind, TokenKind::Icao))
        .map(|t| t.raw.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Overall validity window from the header's `DDHH/DDHH` token.
fn extract_validity(tokens: &[ReportToken<'_>]) -> String {
    tokens
        .iter()
        .find_map(|t| match t.kind {
            TokenKind::TimeRange { from, to } => Some(render_period(from, to)),
            _ => None,
        })
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Render a `DDHH/DDHH` pair, collapsing the day mention when both
/// halves fall on the same day.
pub(crate) fn render_period(from: &str, to: &str) -> String {
    let (day_from, hour_from) = from.split_at(2);
    let (day_to, hour_to) = to.split_at(2);
    if day_from == day_to {
        format!("from {hour_from}z to {hour_to}z (day {day_from})")
    } else {
        format!("from {hour_from}z (day {day_from}) to {hour_to}z (day {day_to})")
    }
}

/// Change-group period: a from-time wins over a validity range.
fn extract_period(tokens: &[ReportToken<'_>]) -> String {
    for t in tokens {
        if let TokenKind::FromTime { day, time } = t.kind {
            let (hh, mm) = time.split_at(2);
            return match day {
                Some(day) => format!("from {hh}:{mm}z (day {day})"),
                None => format!("from {hh}:{mm}z"),
            };
        }
    }
    for t in tokens {
        if let TokenKind::TimeRange { from, to } = t.kind {
            return render_period(from, to);
        }
    }
    PERIOD_NOT_SPECIFIED.to_string()
}

/// The TAF grammar only admits knot winds; `00000KT` is calm.
fn extract_wind(tokens: &[ReportToken<'_>]) -> String {
    for t in tokens {
        if let TokenKind::Wind(group) = t.kind {
            if group.unit != WindUnit::Knots {
                continue;
            }
            if group.is_calm() {
                return "calm wind".to_string();
            }
            return group.describe();
        }
    }
    WIND_NOT_SPECIFIED.to_string()
}

/// Visibility priority: standalone 4-digit meters, then statute miles,
/// then a literal `9999` anywhere. Wind, time and validity shapes carry
/// their own token kinds and can never be misread here.
fn extract_visibility(tokens: &[ReportToken<'_>], text: &str) -> String {
    for t in tokens {
        if let TokenKind::Visibility(meters) = t.kind {
            return format!("{meters} meters");
        }
    }
    for t in tokens {
        if let TokenKind::StatuteMiles(miles) = t.kind {
            return format!("{miles} miles");
        }
    }
    if text.contains("9999") {
        return "≥10 km".to_string();
    }
    VISIBILITY_NOT_SPECIFIED.to_string()
}

/// All phenomenon matches over the block text, in report order.
fn extract_conditions(text: &str, codes: PhenomenonTable) -> String {
    let found = codes.matches_in(text);
    if found.is_empty() {
        NO_SIGNIFICANT_WEATHER.to_string()
    } else {
        found.join(", ")
    }
}

/// Every cloud-layer token with a height, hundreds of feet scaled out.
fn extract_clouds(tokens: &[ReportToken<'_>]) -> String {
    let layers: Vec<String> = tokens
        .iter()
        .filter_map(|t| match t.kind {
            TokenKind::CloudLayer {
                cover,
                height: Some(height),
            } => Some(format!("{} at {} ft", cover.description(), height * 100)),
            _ => None,
        })
        .collect();
    if layers.is_empty() {
        NO_SIGNIFICANT_CLOUDS.to_string()
    } else {
        layers.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BlockType;

    #[test]
    fn test_join_wrapped_prob_line() {
        let raw = "TAF KXYZ 101100Z 1012/1112 18012KT 9999 FEW045\nPROB40\nTEMPO 1014/1016 4000 TSRA";
        let joined = join_wrapped_lines(raw);
        assert_eq!(
            joined,
            "TAF KXYZ 101100Z 1012/1112 18012KT 9999 FEW045\nPROB40 TEMPO 1014/1016 4000 TSRA"
        );
    }

    #[test]
    fn test_join_is_idempotent() {
        let raw = "TAF KXYZ 101100Z 1012/1112 18012KT\nPROB40\nTEMPO 1014/1016 4000 TSRA";
        let once = join_wrapped_lines(raw);
        let twice = join_wrapped_lines(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_join_leaves_regular_lines_alone() {
        let raw = "TAF KXYZ 101100Z 1012/1112 18012KT\nBECMG 1016/1018 25010KT\nTEMPO 1018/1020 4000";
        assert_eq!(join_wrapped_lines(raw), raw);
    }

    #[test]
    fn test_split_blocks_by_keyword() {
        let text = "TAF KXYZ 101100Z 1012/1112 18012KT 9999 FEW045\nBECMG 1016/1018 25010KT\nTEMPO 1018/1020 4000 -RA";
        let blocks = split_blocks(text);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].block_type, BlockType::Principal);
        assert_eq!(blocks[1].block_type, BlockType::Becmg);
        assert_eq!(blocks[2].block_type, BlockType::Tempo);
        assert_eq!(blocks[1].raw_text, "BECMG 1016/1018 25010KT");
    }

    #[test]
    fn test_split_accumulates_continuation_lines() {
        let text = "TAF KXYZ 101100Z 1012/1112\n18012KT 9999 FEW045\nBECMG 1016/1018\n25010KT";
        let blocks = split_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].raw_text, "TAF KXYZ 101100Z 1012/1112 18012KT 9999 FEW045");
        assert_eq!(blocks[1].raw_text, "BECMG 1016/1018 25010KT");
    }

    #[test]
    fn test_render_period_across_days() {
        assert_eq!(render_period("1012", "1112"), "from 12z (day 10) to 12z (day 11)");
    }

    #[test]
    fn test_render_period_same_day_collapses() {
        assert_eq!(render_period("1006", "1006"), "from 06z to 06z (day 10)");
    }

    #[test]
    fn test_block_calm_wind() {
        let decoder = TafDecoder::new();
        let block = ForecastBlock::from_segment(1, "BECMG 1016/1018 00000KT".to_string());
        let forecast = decoder.interpret_block(&block);
        assert_eq!(forecast.wind, "calm wind");
    }

    #[test]
    fn test_block_fm_period_styles() {
        let decoder = TafDecoder::new();

        let block = ForecastBlock::from_segment(1, "FM1200 20008KT 9999".to_string());
        let forecast = decoder.interpret_block(&block);
        assert_eq!(forecast.period, "from 12:00z");

        let block = ForecastBlock::from_segment(1, "FM101800 20008KT 9999".to_string());
        let forecast = decoder.interpret_block(&block);
        assert_eq!(forecast.period, "from 18:00z (day 10)");
    }

    #[test]
    fn test_fm_time_never_misread_as_visibility() {
        // The from-time is typed by the tokenizer, so its digits cannot
        // be taken for a 4-digit visibility.
        let decoder = TafDecoder::new();
        let block = ForecastBlock::from_segment(1, "FM1200 20008KT".to_string());
        let forecast = decoder.interpret_block(&block);
        assert_eq!(forecast.visibility, VISIBILITY_NOT_SPECIFIED);
    }

    #[test]
    fn test_block_visibility_priority() {
        let decoder = TafDecoder::new();

        let block = ForecastBlock::from_segment(1, "TEMPO 1014/1016 4000 TSRA".to_string());
        assert_eq!(decoder.interpret_block(&block).visibility, "4000 meters");

        let block = ForecastBlock::from_segment(1, "TEMPO 1014/1016 1.5SM -RA".to_string());
        assert_eq!(decoder.interpret_block(&block).visibility, "1.5 miles");

        let block = ForecastBlock::from_segment(1, "BECMG 1016/1018 25010KT".to_string());
        assert_eq!(
            decoder.interpret_block(&block).visibility,
            VISIBILITY_NOT_SPECIFIED
        );
    }

    #[test]
    fn test_block_cloud_layers_scaled_to_feet() {
        let decoder = TafDecoder::new();
        let block = ForecastBlock::from_segment(1, "BECMG 1016/1018 FEW020 SCT100".to_string());
        assert_eq!(
            decoder.interpret_block(&block).clouds,
            "few clouds (1-2 oktas) at 2000 ft, scattered clouds (3-4 oktas) at 10000 ft"
        );
    }

    #[test]
    fn test_block_cavok_canned_fields() {
        let decoder = TafDecoder::new();
        let block = ForecastBlock::from_segment(1, "BECMG 1016/1018 21005KT CAVOK".to_string());
        let forecast = decoder.interpret_block(&block);
        assert_eq!(forecast.visibility, "≥10 km (CAVOK)");
        assert_eq!(forecast.conditions, "CAVOK - ceiling and visibility OK");
        assert_eq!(forecast.clouds, NO_SIGNIFICANT_CLOUDS);
        assert_eq!(forecast.wind, "wind from 210° at 5 kt");
    }

    #[test]
    fn test_block_conditions_collects_all_matches() {
        let decoder = TafDecoder::new();
        let block =
            ForecastBlock::from_segment(1, "TEMPO 1014/1016 4000 TSRA BR".to_string());
        assert_eq!(
            decoder.interpret_block(&block).conditions,
            "thunderstorm with rain, mist"
        );
    }

    #[test]
    fn test_empty_report_fails_with_raw_preserved() {
        let result = TafDecoder::new().decode("");
        assert!(!result.success);
        assert_eq!(result.raw, "");
        assert!(result.forecasts.is_empty());
        assert_eq!(result.error.as_deref(), Some("empty report text"));
    }

    #[test]
    fn test_header_extraction() {
        let result = TafDecoder::new().decode("TAF KXYZ 101100Z 1012/1112 18012KT 9999 FEW045");
        assert!(result.success);
        assert_eq!(result.aerodrome, "KXYZ");
        assert_eq!(result.validity, "from 12z (day 10) to 12z (day 11)");
        // A single-block TAF has no change groups.
        assert!(result.forecasts.is_empty());
    }
}
