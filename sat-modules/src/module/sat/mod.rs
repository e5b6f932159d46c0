///! Satellite data module
///!
///! ## Pipeline
///! - `fetcher`: downloads the AMSAT and SatNOGS CSV files (through `cache`)
///! - `filter`: keeps active, alive satellites that list a frequency
///! - `grouper`: beacon / FM repeater / digital groupings

// ============ Core Data Structures ============
mod types;
pub use types::*;

pub mod band;
pub use band::{is_2m, is_70cm, is_vu, range_within_band};

// ============ Data Source Management ============
mod cache;
pub use cache::{CachedResponse, ResponseCache, DEFAULT_EXPIRY_HOURS};

mod fetcher;
pub use fetcher::{
    fetch_datasets, parse_amsat_csv, parse_satnogs_csv, CachedHttpSource, CsvSource,
    DatasetUrls, Datasets, FetchError, AMSAT_CSV_URL, DEFAULT_USER_AGENT, SATNOGS_CSV_URL,
};

// ============ Filtering and Grouping ============
mod filter;
pub use filter::{active_satellites, alive_ids};

mod grouper;
pub use grouper::{unique_ids, ModeGroup};
