//! One-pass tokenizer for the coded report grammar.
//!
//! Aviation report tokens overlap heavily on digit-count patterns: a
//! 4-digit group can be a visibility, half of a validity window, or the
//! tail of a from-time. Classifying each whitespace-delimited token by
//! shape in a single pass resolves those ambiguities up front, so the
//! decoders never have to strip "confusing" substrings before matching.
//!
//! Classification is purely structural; phenomenon codes stay `Unknown`
//! here and are resolved against the code tables by the decoders.

/// Wind direction: a 3-digit bearing or the literal `VRB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindDirection {
    Degrees(u16),
    Variable,
}

/// Unit suffix of a wind group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindUnit {
    Knots,
    MetersPerSecond,
    KilometersPerHour,
}

impl WindUnit {
    /// Split a wind token into its unit suffix and body.
    fn detect(raw: &str) -> Option<(WindUnit, &str)> {
        if let Some(body) = raw.strip_suffix("KT") {
            Some((WindUnit::Knots, body))
        } else if let Some(body) = raw.strip_suffix("MPS") {
            Some((WindUnit::MetersPerSecond, body))
        } else if let Some(body) = raw.strip_suffix("KMH") {
            Some((WindUnit::KilometersPerHour, body))
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WindUnit::Knots => "kt",
            WindUnit::MetersPerSecond => "m/s",
            WindUnit::KilometersPerHour => "km/h",
        }
    }
}

/// Parsed wind group: direction, speed, optional gust, unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindGroup {
    pub direction: WindDirection,
    pub speed: u16,
    pub gust: Option<u16>,
    pub unit: WindUnit,
}

impl WindGroup {
    /// Parse the body of a wind token (unit suffix already removed).
    /// Shape: `ddd` or `VRB`, then 2-3 digit speed, then optional
    /// `G` + 2-3 digit gust.
    fn parse(body: &str, unit: WindUnit) -> Option<WindGroup> {
        let (direction, rest) = if let Some(rest) = body.strip_prefix("VRB") {
            (WindDirection::Variable, rest)
        } else if body.len() >= 5 && all_digits(&body[..3]) {
            (WindDirection::Degrees(body[..3].parse().ok()?), &body[3..])
        } else {
            return None;
        };

        let (speed, gust) = match rest.split_once('G') {
            Some((speed, gust)) => (speed, Some(gust)),
            None => (rest, None),
        };
        if !(2..=3).contains(&speed.len()) || !all_digits(speed) {
            return None;
        }
        let gust = match gust {
            Some(g) if (2..=3).contains(&g.len()) && all_digits(g) => Some(g.parse().ok()?),
            Some(_) => return None,
            None => None,
        };

        Some(WindGroup {
            direction,
            speed: speed.parse().ok()?,
            gust,
            unit,
        })
    }

    /// Literal `00000KT`: no direction, no speed, no gusts.
    pub fn is_calm(&self) -> bool {
        self.direction == WindDirection::Degrees(0) && self.speed == 0 && self.gust.is_none()
    }

    /// Render the group as descriptive text.
    pub fn describe(&self) -> String {
        let unit = self.unit.label();
        match (self.direction, self.gust) {
            (WindDirection::Variable, None) => {
                format!("variable wind at {} {unit}", self.speed)
            }
            (WindDirection::Variable, Some(gust)) => {
                format!("variable wind at {} {unit} with gusts of {gust} {unit}", self.speed)
            }
            (WindDirection::Degrees(dir), None) => {
                format!("wind from {dir:03}° at {} {unit}", self.speed)
            }
            (WindDirection::Degrees(dir), Some(gust)) => {
                format!(
                    "wind from {dir:03}° at {} {unit} with gusts of {gust} {unit}",
                    self.speed
                )
            }
        }
    }
}

/// Cloud cover code of a layer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudCover {
    Few,
    Sct,
    Bkn,
    Ovc,
    Vv,
}

impl CloudCover {
    /// Match a cover prefix, returning the remainder of the token.
    fn strip(raw: &str) -> Option<(CloudCover, &str)> {
        if let Some(rest) = raw.strip_prefix("FEW") {
            Some((CloudCover::Few, rest))
        } else if let Some(rest) = raw.strip_prefix("SCT") {
            Some((CloudCover::Sct, rest))
        } else if let Some(rest) = raw.strip_prefix("BKN") {
            Some((CloudCover::Bkn, rest))
        } else if let Some(rest) = raw.strip_prefix("OVC") {
            Some((CloudCover::Ovc, rest))
        } else if let Some(rest) = raw.strip_prefix("VV") {
            Some((CloudCover::Vv, rest))
        } else {
            None
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CloudCover::Few => "few clouds (1-2 oktas)",
            CloudCover::Sct => "scattered clouds (3-4 oktas)",
            CloudCover::Bkn => "broken clouds (5-7 oktas)",
            CloudCover::Ovc => "overcast (8 oktas)",
            CloudCover::Vv => "vertical visibility obscured",
        }
    }
}

/// Shape classification of a single report token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    /// `DDHHMMZ` observation time.
    ObservationTime,
    Wind(WindGroup),
    /// `DDHH/DDHH` validity window or change period.
    TimeRange { from: &'a str, to: &'a str },
    /// `FM` + `HHMM` (or the long `DDHHMM` form, day first).
    FromTime { day: Option<&'a str>, time: &'a str },
    /// Standalone 4-digit horizontal visibility in meters.
    Visibility(&'a str),
    /// `N[.N]SM` statute-mile visibility.
    StatuteMiles(&'a str),
    /// Cover prefix + 3-digit height in hundreds of feet. Height is
    /// `None` for degenerate groups such as `VV///`.
    CloudLayer {
        cover: CloudCover,
        height: Option<u32>,
    },
    /// `dd/dd` temperature / dew point, both in whole °C.
    TempDew {
        temperature: &'a str,
        dew_point: &'a str,
    },
    /// `Q` + 4-digit QNH in hectopascals.
    Pressure(&'a str),
    Cavok,
    /// Isolated 4-uppercase-letter word, ICAO-shaped.
    Icao,
    Unknown,
}

/// A whitespace-delimited token together with its classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportToken<'a> {
    pub raw: &'a str,
    pub kind: TokenKind<'a>,
}

/// Split report text on whitespace and classify every token.
pub fn tokenize(text: &str) -> Vec<ReportToken<'_>> {
    text.split_whitespace()
        .map(|raw| ReportToken {
            raw,
            kind: classify(raw),
        })
        .collect()
}

/// Classify one token by shape. First matching rule wins; the rule order
/// mirrors the extraction priority of the decoders (wind before validity
/// before visibility, probability keywords never ICAO).
fn classify(raw: &str) -> TokenKind<'_> {
    if !raw.is_ascii() {
        return TokenKind::Unknown;
    }

    if raw == "CAVOK" {
        return TokenKind::Cavok;
    }

    // DDHHMMZ
    if raw.len() == 7 && raw.ends_with('Z') && all_digits(&raw[..6]) {
        return TokenKind::ObservationTime;
    }

    if let Some((unit, body)) = WindUnit::detect(raw) {
        if let Some(group) = WindGroup::parse(body, unit) {
            return TokenKind::Wind(group);
        }
        return TokenKind::Unknown;
    }

    // DDHH/DDHH
    if raw.len() == 9
        && raw.as_bytes()[4] == b'/'
        && all_digits(&raw[..4])
        && all_digits(&raw[5..])
    {
        return TokenKind::TimeRange {
            from: &raw[..4],
            to: &raw[5..],
        };
    }

    // dd/dd
    if raw.len() == 5 && raw.as_bytes()[2] == b'/' && all_digits(&raw[..2]) && all_digits(&raw[3..])
    {
        return TokenKind::TempDew {
            temperature: &raw[..2],
            dew_point: &raw[3..],
        };
    }

    // Qdddd
    if raw.len() == 5 && raw.starts_with('Q') && all_digits(&raw[1..]) {
        return TokenKind::Pressure(&raw[1..]);
    }

    // FMHHMM / FMDDHHMM: typed here so a from-time can never be misread
    // as a 4-digit visibility downstream.
    if let Some(body) = raw.strip_prefix("FM") {
        if body.len() == 4 && all_digits(body) {
            return TokenKind::FromTime { day: None, time: body };
        }
        if body.len() == 6 && all_digits(body) {
            return TokenKind::FromTime {
                day: Some(&body[..2]),
                time: &body[2..],
            };
        }
    }

    if let Some((cover, rest)) = CloudCover::strip(raw) {
        let height = if rest.len() >= 3
            && all_digits(&rest[..3])
            && rest[3..].chars().all(|c| c.is_ascii_uppercase())
        {
            rest[..3].parse().ok()
        } else {
            None
        };
        return TokenKind::CloudLayer { cover, height };
    }

    if let Some(body) = raw.strip_suffix("SM") {
        if is_decimal_number(body) {
            return TokenKind::StatuteMiles(body);
        }
    }

    if raw.len() == 4 && all_digits(raw) {
        return TokenKind::Visibility(raw);
    }

    if raw.len() == 4 && raw.chars().all(|c| c.is_ascii_uppercase()) && !is_group_keyword(raw) {
        return TokenKind::Icao;
    }

    TokenKind::Unknown
}

/// Keywords that introduce TAF change groups; shared with the line-join
/// and segmentation stages.
pub(crate) fn is_group_keyword(raw: &str) -> bool {
    matches!(raw, "FM" | "BECMG" | "TEMPO" | "PROB" | "PROB30" | "PROB40")
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// `N` or `N.N`, digits only around a single dot.
fn is_decimal_number(s: &str) -> bool {
    match s.split_once('.') {
        Some((whole, frac)) => all_digits(whole) && all_digits(frac),
        None => all_digits(s),
    }
}
