///! Active-satellite filter
///!
///! Joins the AMSAT rows with the SatNOGS liveness list.

use super::types::{LivenessRecord, SatelliteRecord};
use std::collections::HashSet;

/// SatNOGS IDs whose status is "alive"
pub fn alive_ids(liveness: &[LivenessRecord]) -> HashSet<&str> {
    liveness
        .iter()
        .filter(|record| record.is_alive())
        .filter_map(|record| record.sat_id.as_deref())
        .collect()
}

/// Select AMSAT rows that are active/operational, alive on SatNOGS, and list
/// at least one frequency
pub fn active_satellites(
    satellites: &[SatelliteRecord],
    liveness: &[LivenessRecord],
) -> Vec<SatelliteRecord> {
    let alive = alive_ids(liveness);

    let active: Vec<SatelliteRecord> = satellites
        .iter()
        .filter(|sat| sat.is_operational())
        .filter(|sat| {
            sat.satnogs_id
                .as_deref()
                .is_some_and(|id| alive.contains(id))
        })
        .filter(|sat| sat.has_frequency())
        .cloned()
        .collect();

    tracing::info!(
        "{} of {} AMSAT rows are active ({} SatNOGS IDs alive)",
        active.len(),
        satellites.len(),
        alive.len()
    );

    active
}
