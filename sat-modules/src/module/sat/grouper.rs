///! Mode grouping - beacons, FM repeaters, digital/APRS
///!
///! Groupings are independent and may overlap: a row with mode text
///! "FM/Digipeater" belongs to both the repeater and the digital group.

use super::band::is_vu;
use super::types::{NoradId, SatelliteRecord};
use std::collections::HashSet;

const FM_KEYWORDS: &[&str] = &["FM"];
const DIGI_KEYWORDS: &[&str] = &["APRS", "Digipeater"];

/// Satellite grouping produced from the active set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeGroup {
    /// Beacon in the 2m or 70cm band
    Beacons,
    /// FM voice repeaters
    Repeaters,
    /// APRS / packet digipeaters
    Digital,
}

impl ModeGroup {
    pub const ALL: [ModeGroup; 3] = [
        ModeGroup::Beacons,
        ModeGroup::Repeaters,
        ModeGroup::Digital,
    ];

    /// Gpredict module name for this group
    pub fn module_name(&self) -> &'static str {
        match self {
            ModeGroup::Beacons => "AMSAT_All_Beacons",
            ModeGroup::Repeaters => "AMSAT_All_Repeaters",
            ModeGroup::Digital => "AMSAT_All_Digi",
        }
    }

    pub fn matches(&self, record: &SatelliteRecord) -> bool {
        match self {
            ModeGroup::Beacons => is_vu(record.beacon),
            ModeGroup::Repeaters => record.mode_contains_any(FM_KEYWORDS),
            ModeGroup::Digital => record.mode_contains_any(DIGI_KEYWORDS),
        }
    }

    /// NORAD IDs of matching rows, deduplicated in first-seen order
    pub fn select(&self, active: &[SatelliteRecord]) -> Vec<NoradId> {
        unique_ids(active.iter().filter(|r| self.matches(r)).map(|r| r.norad_id))
    }
}

/// Drop missing IDs and duplicates, keeping first-seen order
pub fn unique_ids(ids: impl IntoIterator<Item = Option<NoradId>>) -> Vec<NoradId> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .flatten()
        .filter(|id| seen.insert(*id))
        .collect()
}
