///! Dataset fetcher - downloads and parses the AMSAT and SatNOGS CSV files
///!
///! Source: https://github.com/palewire/amateur-satellite-database

use super::cache::ResponseCache;
use super::types::{AmsatCsvRow, LivenessRecord, SatelliteRecord, SatnogsCsvRow};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

pub const AMSAT_CSV_URL: &str = concat!(
    "https://raw.githubusercontent.com/palewire/amateur-satellite-database/refs/heads/main/data",
    "/amsat-all-frequencies.csv"
);
pub const SATNOGS_CSV_URL: &str = concat!(
    "https://raw.githubusercontent.com/palewire/amateur-satellite-database/refs/heads/main/data",
    "/satnogs.csv"
);

/// Identifies this tool and a contact point to the upstream host
pub const DEFAULT_USER_AGENT: &str = concat!(
    "sat-modules/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/K9API/logbook)"
);

/// Fatal retrieval failures
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Anything that can produce the text body of a CSV resource
#[async_trait]
pub trait CsvSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// HTTP source backed by the on-disk response cache
pub struct CachedHttpSource {
    client: reqwest::Client,
    cache: ResponseCache,
}

impl CachedHttpSource {
    pub fn new(cache: ResponseCache, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, cache })
    }

    async fn download(&self, url: &str) -> Result<String, FetchError> {
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        response.text().await.map_err(request_error)
    }
}

#[async_trait]
impl CsvSource for CachedHttpSource {
    async fn fetch(&self, url: &str) -> Result<String> {
        if let Some(body) = self.cache.get(url).await {
            tracing::info!("Using cached copy of {}", url);
            return Ok(body);
        }

        tracing::info!("Downloading {}", url);
        let body = self.download(url).await?;

        if let Err(e) = self.cache.store(url, &body).await {
            tracing::warn!("Failed to cache response for {}: {:#}", url, e);
        }

        Ok(body)
    }
}

/// Locations of the two upstream datasets
#[derive(Debug, Clone)]
pub struct DatasetUrls {
    pub amsat: String,
    pub satnogs: String,
}

impl Default for DatasetUrls {
    fn default() -> Self {
        Self {
            amsat: AMSAT_CSV_URL.to_string(),
            satnogs: SATNOGS_CSV_URL.to_string(),
        }
    }
}

/// Both parsed tables of one run
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    /// AMSAT rows with parsed frequency columns
    pub satellites: Vec<SatelliteRecord>,

    /// SatNOGS liveness rows
    pub liveness: Vec<LivenessRecord>,
}

/// Fetch and parse both datasets; any retrieval failure aborts
pub async fn fetch_datasets(source: &dyn CsvSource, urls: &DatasetUrls) -> Result<Datasets> {
    let amsat_csv = source
        .fetch(&urls.amsat)
        .await
        .context("Failed to fetch AMSAT frequency database")?;
    let satellites = parse_amsat_csv(&amsat_csv);

    let satnogs_csv = source
        .fetch(&urls.satnogs)
        .await
        .context("Failed to fetch SatNOGS satellite list")?;
    let liveness = parse_satnogs_csv(&satnogs_csv);

    tracing::info!(
        "Loaded {} AMSAT rows and {} SatNOGS rows",
        satellites.len(),
        liveness.len()
    );

    Ok(Datasets {
        satellites,
        liveness,
    })
}

/// Parse the AMSAT frequency CSV
pub fn parse_amsat_csv(content: &str) -> Vec<SatelliteRecord> {
    parse_rows::<AmsatCsvRow>(content, "AMSAT")
        .into_iter()
        .map(AmsatCsvRow::into_record)
        .collect()
}

/// Parse the SatNOGS satellite CSV
pub fn parse_satnogs_csv(content: &str) -> Vec<LivenessRecord> {
    parse_rows::<SatnogsCsvRow>(content, "SatNOGS")
        .into_iter()
        .map(SatnogsCsvRow::into_record)
        .collect()
}

fn parse_rows<T: DeserializeOwned>(content: &str, label: &str) -> Vec<T> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // Allow variable number of fields
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    let mut error_count = 0;

    for (index, result) in reader.deserialize().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                error_count += 1;
                tracing::warn!("Error parsing {} CSV row {}: {}", label, index + 1, e);
            }
        }
    }

    tracing::debug!(
        "Processed {} {} CSV rows, {} errors",
        rows.len() + error_count,
        label,
        error_count
    );

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::sat::types::Frequency;
    use std::collections::HashMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const SAMPLE_AMSAT: &str = r#"name,norad_id,uplink,downlink,beacon,mode,callsign,satnogs_id,status
ISS,25544,,145.800,,SSTV,,XSKZ-5603-1870-9019-3066,active
ISS,25544,145.825,145.825,,1200bps AFSK Digipeater,RS0ISS ARISS,XSKZ-5603-1870-9019-3066,active
AO-91,43017,435.250,145.960,145.960,FM* CTCSS 67.0Hz/200bps DUV,,PMAW-9203-2442-8666-3249,inactive
AO-7,7530,145.850-145.950,29.400-29.500,29.502,A,,HHSS-6325-1344-4603-7774,operational"#;

    const SAMPLE_SATNOGS: &str = r#"sat_id,norad_cat_id,name,status
XSKZ-5603-1870-9019-3066,25544,ISS,alive
PMAW-9203-2442-8666-3249,43017,AO-91,dead"#;

    struct FakeSource(HashMap<String, String>);

    #[async_trait]
    impl CsvSource for FakeSource {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.0
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("HTTP error 404 Not Found for {}", url))
        }
    }

    #[test]
    fn test_parse_amsat_csv() {
        let records = parse_amsat_csv(SAMPLE_AMSAT);
        assert_eq!(records.len(), 4);

        let iss = &records[1];
        assert_eq!(iss.norad_id, Some(25544));
        assert_eq!(iss.uplink, Some(Frequency::Single(145.825)));
        assert_eq!(iss.status.as_deref(), Some("active"));

        let ao7 = &records[3];
        assert_eq!(ao7.uplink, Some(Frequency::Range { start: 145.850, stop: 145.950 }));
        assert_eq!(ao7.beacon, Some(Frequency::Single(29.502)));
    }

    #[test]
    fn test_parse_amsat_csv_missing_columns() {
        let records = parse_amsat_csv("name,norad_id,downlink\nFO-29,24278,435.850\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].downlink, Some(Frequency::Single(435.850)));
        assert_eq!(records[0].status, None);
        assert_eq!(records[0].satnogs_id, None);
    }

    #[test]
    fn test_parse_satnogs_csv() {
        let records = parse_satnogs_csv(SAMPLE_SATNOGS);
        assert_eq!(records.len(), 2);
        assert!(records[0].is_alive());
        assert!(!records[1].is_alive());
        assert_eq!(records[1].sat_id.as_deref(), Some("PMAW-9203-2442-8666-3249"));
    }

    #[tokio::test]
    async fn test_fetch_datasets() {
        let urls = DatasetUrls::default();
        let source = FakeSource(HashMap::from([
            (urls.amsat.clone(), SAMPLE_AMSAT.to_string()),
            (urls.satnogs.clone(), SAMPLE_SATNOGS.to_string()),
        ]));

        let datasets = fetch_datasets(&source, &urls).await.unwrap();
        assert_eq!(datasets.satellites.len(), 4);
        assert_eq!(datasets.liveness.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_datasets_fails_when_a_source_fails() {
        let urls = DatasetUrls::default();
        let source = FakeSource(HashMap::from([(urls.amsat.clone(), SAMPLE_AMSAT.to_string())]));

        let err = fetch_datasets(&source, &urls).await.unwrap_err();
        assert!(format!("{:#}", err).contains("SatNOGS"));
    }

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Status {
            url: SATNOGS_CSV_URL.to_string(),
            status: reqwest::StatusCode::NOT_FOUND,
        };
        assert_eq!(err.to_string(), format!("HTTP error 404 Not Found for {}", SATNOGS_CSV_URL));
    }

    /// Answer one connection per canned response; yields the raw requests
    async fn serve(responses: Vec<&'static str>) -> (String, tokio::task::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for response in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                let mut buf = vec![0u8; 8192];
                let n = stream.read(&mut buf).await.unwrap();
                requests.push(String::from_utf8_lossy(&buf[..n]).to_string());
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
            requests
        });

        (base, handle)
    }

    #[tokio::test]
    async fn test_http_source_status_and_caching() {
        let (base, server) = serve(vec![
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            concat!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/csv\r\nContent-Length: 4\r\n",
                "Connection: close\r\n\r\na,b\n"
            ),
        ])
        .await;
        let url = format!("{}/amsat.csv", base);

        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path(), chrono::Duration::hours(24));
        let source = CachedHttpSource::new(cache.clone(), DEFAULT_USER_AGENT).unwrap();

        let err = source.fetch(&url).await.unwrap_err();
        match err.downcast_ref::<FetchError>() {
            Some(FetchError::Status { status, .. }) => {
                assert_eq!(*status, reqwest::StatusCode::INTERNAL_SERVER_ERROR)
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(cache.get(&url).await, None);

        assert_eq!(source.fetch(&url).await.unwrap(), "a,b\n");
        assert_eq!(cache.get(&url).await.as_deref(), Some("a,b\n"));

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 2);
        for request in &requests {
            let expected = format!("user-agent: {}", DEFAULT_USER_AGENT).to_lowercase();
            assert!(request.to_lowercase().contains(&expected), "{}", request);
        }
    }

    #[tokio::test]
    async fn test_cached_source_serves_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path(), chrono::Duration::hours(24));
        // Unroutable URL: only a cache hit can satisfy it
        let url = "http://127.0.0.1:9/amsat.csv";
        cache.store(url, SAMPLE_AMSAT).await.unwrap();

        let source = CachedHttpSource::new(cache, DEFAULT_USER_AGENT).unwrap();
        assert_eq!(source.fetch(url).await.unwrap(), SAMPLE_AMSAT);
    }
}
