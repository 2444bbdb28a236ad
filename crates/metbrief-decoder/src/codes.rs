//! Static weather-phenomenon code tables.
//!
//! Two variants exist: the METAR table covers present-weather codes seen
//! in observations; the TAF table additionally carries the thunderstorm
//! composites (`TSSN`, `TSGR`, ...) that only appear in forecasts. Both
//! are append-only static data, built once per decoder.
//!
//! Lookup is exact per whitespace-delimited token. That enforces the
//! word-boundary contract: a code never matches as a substring of an
//! unrelated longer token (`TSRA` does not match inside `XTSRAX`).

/// A phenomenon lookup table mapping report codes to descriptions.
#[derive(Debug, Clone, Copy)]
pub struct PhenomenonTable {
    entries: &'static [(&'static str, &'static str)],
}

const METAR_PHENOMENA: &[(&str, &str)] = &[
    ("RA", "rain"),
    ("-RA", "light rain"),
    ("+RA", "heavy rain"),
    ("DZ", "drizzle"),
    ("-DZ", "light drizzle"),
    ("+DZ", "heavy drizzle"),
    ("SN", "snow"),
    ("SG", "snow grains"),
    ("PL", "ice pellets"),
    ("GS", "small hail"),
    ("BR", "mist"),
    ("FG", "fog"),
    ("HZ", "haze"),
    ("FU", "smoke"),
    ("VA", "volcanic ash"),
    ("DU", "widespread dust"),
    ("SA", "sand"),
    ("PY", "spray"),
    ("PO", "dust whirls"),
    ("SQ", "squalls"),
    ("FC", "funnel cloud"),
    ("TS", "thunderstorm"),
    ("TSRA", "thunderstorm with rain"),
    ("-TSRA", "thunderstorm with light rain"),
    ("+TSRA", "thunderstorm with heavy rain"),
    ("SH", "showers"),
    ("VCTS", "thunderstorm in the vicinity"),
    ("BC", "fog patches"),
    ("BL", "blowing"),
    ("VCSH", "showers in the vicinity"),
    ("SHRA", "rain showers"),
    ("+SHRA", "heavy rain showers"),
    ("-SHRA", "light rain showers"),
];

const TAF_PHENOMENA: &[(&str, &str)] = &[
    // Composites first; the forecast grammar produces these fused codes.
    ("TSRA", "thunderstorm with rain"),
    ("-TSRA", "thunderstorm with light rain"),
    ("+TSRA", "thunderstorm with heavy rain"),
    ("TSSN", "thunderstorm with snow"),
    ("TSGR", "thunderstorm with hail"),
    ("TSGS", "thunderstorm with small hail"),
    ("TSPL", "thunderstorm with ice pellets"),
    ("TSDS", "thunderstorm with dust storm"),
    ("TSPO", "thunderstorm with dust whirls"),
    ("RA", "rain"),
    ("-RA", "light rain"),
    ("+RA", "heavy rain"),
    ("SN", "snow"),
    ("-SN", "light snow"),
    ("+SN", "heavy snow"),
    ("SG", "snow grains"),
    ("PL", "ice pellets"),
    ("GS", "small hail"),
    ("DZ", "drizzle"),
    ("-DZ", "light drizzle"),
    ("+DZ", "heavy drizzle"),
    ("UP", "unknown precipitation"),
    ("BR", "mist"),
    ("FG", "fog"),
    ("FU", "smoke"),
    ("VA", "volcanic ash"),
    ("DU", "widespread dust"),
    ("SA", "sand"),
    ("HZ", "haze"),
    ("PY", "spray"),
    ("PO", "dust whirls"),
    ("SQ", "squalls"),
    ("FC", "funnel cloud"),
    ("SH", "showers"),
    ("-SH", "light showers"),
    ("+SH", "heavy showers"),
    ("SHRA", "rain showers"),
    ("+SHRA", "heavy rain showers"),
    ("-SHRA", "light rain showers"),
    ("BC", "fog patches"),
    ("BL", "blowing"),
    ("VC", "in the vicinity"),
    ("VCSH", "showers in the vicinity"),
    ("VCTS", "thunderstorm in the vicinity"),
    ("TS", "thunderstorm"),
];

impl PhenomenonTable {
    /// Table for METAR observations.
    pub fn metar() -> Self {
        Self {
            entries: METAR_PHENOMENA,
        }
    }

    /// Table for TAF forecasts.
    pub fn taf() -> Self {
        Self {
            entries: TAF_PHENOMENA,
        }
    }

    /// Exact lookup of a single token.
    pub fn lookup(&self, token: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(code, _)| *code == token)
            .map(|(_, description)| *description)
    }

    /// Scan whole block text token by token, returning every matching
    /// description in report order.
    pub fn matches_in(&self, text: &str) -> Vec<&'static str> {
        text.split_whitespace()
            .filter_map(|token| self.lookup(token))
            .collect()
    }
}
