///! Satellite data structures - NORAD ID based records
///!
///! Rows from the AMSAT frequency list and the SatNOGS satellite list,
///! plus the parsed frequency representation shared by both.

use serde::Deserialize;

/// NORAD ID type (satellite unique identifier)
pub type NoradId = u32;

/// Parsed frequency value in MHz
///
/// A missing or unparseable cell is represented as `Option::<Frequency>::None`,
/// never as NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frequency {
    /// Single frequency (e.g., "145.800")
    Single(f64),

    /// Frequency range (e.g., "145.850-145.950"), endpoints as listed
    Range { start: f64, stop: f64 },
}

impl Frequency {
    /// Parse a frequency cell from the AMSAT CSV
    ///
    /// Examples:
    /// - "145.800"          → Single(145.800)
    /// - "145.825*"         → Single(145.825)
    /// - "145.850-145.950"  → Range(145.850, 145.950)
    /// - "145.8/145.9*"     → Single(145.9) (the option marked active)
    /// - "435.400/436.210"  → None (no active option)
    /// - ""                 → None
    pub fn parse_cell(cell: &str) -> Option<Self> {
        if cell.trim().is_empty() {
            return None;
        }

        // Range (e.g. a linear transponder passband)
        if let Some((a, b)) = cell.split_once('-') {
            return match (parse_mhz(a), parse_mhz(b)) {
                (Some(start), Some(stop)) => Some(Frequency::Range { start, stop }),
                _ => {
                    tracing::warn!("Unable to parse frequency: {:?}, ignoring", cell);
                    None
                }
            };
        }

        let options: Vec<&str> = cell.split('/').collect();
        let selection = if options.len() == 1 {
            options[0]
        } else {
            // A trailing '*' marks the currently active alternative
            match options.iter().find(|o| o.ends_with('*')) {
                Some(option) => *option,
                None => {
                    tracing::debug!("No active frequency marked in {:?}", cell);
                    return None;
                }
            }
        };
        let selection = selection.strip_suffix('*').unwrap_or(selection);

        match parse_mhz(selection) {
            Some(freq) => Some(Frequency::Single(freq)),
            None => {
                tracing::warn!("Unable to parse frequency: {:?}, ignoring", selection);
                None
            }
        }
    }
}

/// Parse a number of MHz, ignoring surrounding whitespace and rejecting NaN
fn parse_mhz(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|f| !f.is_nan())
}

/// CSV row from the AMSAT frequency database
///
/// Columns not listed here are ignored; missing columns read as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AmsatCsvRow {
    pub name: String,
    pub norad_id: String,
    pub uplink: String,
    pub downlink: String,
    pub beacon: String,
    pub mode: String,
    pub status: String,
    pub satnogs_id: String,
}

impl AmsatCsvRow {
    /// Parse NORAD ID, accepting "25544" as well as "25544.0"
    pub fn parse_norad_id(&self) -> Option<NoradId> {
        let s = self.norad_id.trim();
        if let Ok(id) = s.parse::<NoradId>() {
            return Some(id);
        }
        s.parse::<f64>()
            .ok()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= NoradId::MAX as f64)
            .map(|f| f as NoradId)
    }

    /// Convert to a record, parsing each frequency column
    pub fn into_record(self) -> SatelliteRecord {
        SatelliteRecord {
            norad_id: self.parse_norad_id(),
            uplink: Frequency::parse_cell(&self.uplink),
            downlink: Frequency::parse_cell(&self.downlink),
            beacon: Frequency::parse_cell(&self.beacon),
            name: self.name,
            satnogs_id: non_empty(self.satnogs_id),
            status: non_empty(self.status),
            mode: non_empty(self.mode),
        }
    }
}

/// CSV row from the SatNOGS satellite list
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SatnogsCsvRow {
    pub sat_id: String,
    pub status: String,
}

impl SatnogsCsvRow {
    pub fn into_record(self) -> LivenessRecord {
        LivenessRecord {
            sat_id: non_empty(self.sat_id),
            status: non_empty(self.status),
        }
    }
}

/// Blank cells are missing; other text is kept verbatim
fn non_empty(s: String) -> Option<String> {
    (!s.trim().is_empty()).then_some(s)
}

/// One transponder/beacon row of the AMSAT database
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SatelliteRecord {
    /// Common name (e.g., "ISS", "AO-91")
    pub name: String,

    pub norad_id: Option<NoradId>,

    /// SatNOGS cross-reference ID (e.g., "XSKZ-5603-1870-9019-3066")
    pub satnogs_id: Option<String>,

    /// Operating status (e.g., "active", "operational", "inactive")
    pub status: Option<String>,

    /// Mode description (e.g., "FM tone 67.0Hz", "1200bps AFSK Digipeater")
    pub mode: Option<String>,

    pub uplink: Option<Frequency>,
    pub downlink: Option<Frequency>,
    pub beacon: Option<Frequency>,
}

impl SatelliteRecord {
    /// Check if any frequency column is listed
    pub fn has_frequency(&self) -> bool {
        self.uplink.is_some() || self.downlink.is_some() || self.beacon.is_some()
    }

    /// Check if the AMSAT status marks the satellite as working
    pub fn is_operational(&self) -> bool {
        matches!(self.status.as_deref(), Some("active" | "operational"))
    }

    /// Check if the mode text contains any of the given keywords (case-sensitive)
    pub fn mode_contains_any(&self, keywords: &[&str]) -> bool {
        self.mode
            .as_deref()
            .is_some_and(|mode| keywords.iter().any(|kw| mode.contains(kw)))
    }
}

/// One row of the SatNOGS satellite list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LivenessRecord {
    pub sat_id: Option<String>,
    pub status: Option<String>,
}

impl LivenessRecord {
    pub fn is_alive(&self) -> bool {
        self.status.as_deref() == Some("alive")
    }
}
