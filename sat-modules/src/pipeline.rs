///! Fetch → filter → group → write

use crate::module::gpredict::GpredictModule;
use crate::module::sat::{
    active_satellites, fetch_datasets, CsvSource, DatasetUrls, ModeGroup, SatelliteRecord,
};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Outcome of one run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Rows remaining after the active-satellite filter
    pub active_rows: usize,
    /// Written module files, one per group
    pub written: Vec<(ModeGroup, PathBuf)>,
}

/// Build one module per mode group from the active set
pub fn build_modules(
    active: &[SatelliteRecord],
    qth_file: &str,
) -> Vec<(ModeGroup, GpredictModule)> {
    ModeGroup::ALL
        .iter()
        .map(|group| {
            let module = GpredictModule::new(group.module_name(), group.select(active))
                .with_qth_file(qth_file);
            (*group, module)
        })
        .collect()
}

/// Run the whole pipeline; `module_dir` must exist
pub async fn run(
    source: &dyn CsvSource,
    urls: &DatasetUrls,
    module_dir: &Path,
    qth_file: &str,
) -> Result<RunReport> {
    let datasets = fetch_datasets(source, urls).await?;
    let active = active_satellites(&datasets.satellites, &datasets.liveness);

    let mut written = Vec::new();
    for (group, module) in build_modules(&active, qth_file) {
        let path = module.save(module_dir).await?;
        written.push((group, path));
    }

    Ok(RunReport {
        active_rows: active.len(),
        written,
    })
}
