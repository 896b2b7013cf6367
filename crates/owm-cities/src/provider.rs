//! Acquisition of the bulk city list.
//!
//! The list is downloaded only when `city.list.json` is absent from the data
//! directory. The gzip archive is kept next to the decompressed file.

use flate2::read::GzDecoder;
use owm_core::{CitiesConfig, CityDataError, ReqwestErrorExt};
use reqwest::Client;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::instrument;

use crate::types::CityRecord;

pub const CITY_LIST_FILE: &str = "city.list.json";
pub const CITY_ARCHIVE_FILE: &str = "city.list.json.gz";

const DOWNLOAD_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct CityListProvider {
    client: Client,
    data_dir: PathBuf,
    source_url: String,
}

impl CityListProvider {
    /// # Errors
    /// Fails if the HTTP client cannot be created.
    pub fn new(config: &CitiesConfig) -> Result<Self, CityDataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .build()
            .map_err(|e| CityDataError::Download(e.to_string()))?;

        Ok(Self {
            client,
            data_dir: config.data_dir.clone(),
            source_url: config.source_url.clone(),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn list_path(&self) -> PathBuf {
        self.data_dir.join(CITY_LIST_FILE)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.data_dir.join(CITY_ARCHIVE_FILE)
    }

    pub fn is_present(&self) -> bool {
        self.list_path().is_file()
    }

    /// Download and decompress the list if it is not present locally.
    ///
    /// Returns `true` if a download took place.
    ///
    /// # Errors
    /// Fails on network, decompression or file system errors. A failed
    /// refresh leaves no partial `city.list.json` behind.
    #[instrument(skip(self), fields(url = %self.source_url), level = "info")]
    pub async fn refresh_if_missing(&self) -> Result<bool, CityDataError> {
        if self.is_present() {
            tracing::debug!("City list present at {}", self.list_path().display());
            return Ok(false);
        }

        tracing::info!("Downloading city list, please wait...");
        let archive = self.download().await?;

        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| CityDataError::Io(e.to_string()))?;
        tokio::fs::write(self.archive_path(), &archive)
            .await
            .map_err(|e| CityDataError::Io(e.to_string()))?;

        let json = decompress(&archive)?;

        let staging = self.data_dir.join(format!("{}.part", CITY_LIST_FILE));
        tokio::fs::write(&staging, json.as_bytes())
            .await
            .map_err(|e| CityDataError::Io(e.to_string()))?;
        tokio::fs::rename(&staging, self.list_path())
            .await
            .map_err(|e| CityDataError::Io(e.to_string()))?;

        tracing::info!("City list saved to {}", self.list_path().display());
        Ok(true)
    }

    async fn download(&self) -> Result<Vec<u8>, CityDataError> {
        let response = self
            .client
            .get(&self.source_url)
            .send()
            .await
            .map_err(|e| CityDataError::Download(e.into_network_error().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CityDataError::Download(format!(
                "{} returned {}",
                self.source_url, status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CityDataError::Download(e.into_network_error().to_string()))?;
        tracing::debug!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }

    /// Read and parse the local list.
    ///
    /// # Errors
    /// Fails if the file is missing, unreadable or not a JSON array of cities.
    pub fn load(&self) -> Result<Vec<CityRecord>, CityDataError> {
        let path = self.list_path();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| CityDataError::Io(format!("{}: {}", path.display(), e)))?;
        let cities: Vec<CityRecord> = serde_json::from_str(&contents)?;
        tracing::info!("Loaded names and locations for {} cities", cities.len());
        Ok(cities)
    }
}

fn decompress(archive: &[u8]) -> Result<String, CityDataError> {
    let mut decoder = GzDecoder::new(archive);
    let mut json = String::new();
    decoder
        .read_to_string(&mut json)
        .map_err(|e| CityDataError::Decompress(e.to_string()))?;
    Ok(json)
}
