//! Static data export (SDE) reference tables.
//!
//! Downloads the fuzzwork CSV dumps once, caches the decompressed files on
//! disk, and loads them into an immutable [`StaticData`] context. Nothing
//! loads implicitly: construction is explicit and the tables are passed by
//! reference to whatever needs lookups.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bzip2::read::BzDecoder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Default fuzzwork dump location.
const DEFAULT_DUMP_URL: &str = "https://www.fuzzwork.co.uk/dump/latest";

/// Dump files the toolkit needs.
const INV_TYPES_FILE: &str = "invTypes.csv";
const MAP_REGIONS_FILE: &str = "mapRegions.csv";
const MAP_SOLAR_SYSTEMS_FILE: &str = "mapSolarSystems.csv";

/// Errors from loading the static dumps.
#[derive(Debug, Error)]
pub enum SdeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("dump download failed with status {status}: {url}")]
    Download { status: u16, url: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

/// Row of the `invTypes` dump. Columns the toolkit does not use are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InvType {
    #[serde(rename = "typeID")]
    pub type_id: i32,
    #[serde(rename = "groupID")]
    pub group_id: i32,
    #[serde(rename = "typeName")]
    pub type_name: String,
}

/// Row of the `mapRegions` dump.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Region {
    #[serde(rename = "regionID")]
    pub region_id: i32,
    #[serde(rename = "regionName")]
    pub region_name: String,
}

/// Row of the `mapSolarSystems` dump.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SolarSystem {
    #[serde(rename = "regionID")]
    pub region_id: i32,
    #[serde(rename = "solarSystemID")]
    pub solar_system_id: i32,
    #[serde(rename = "solarSystemName")]
    pub solar_system_name: String,
    #[serde(rename = "security")]
    pub security: f64,
}

/// Configuration for the static dump loader.
#[derive(Debug, Clone)]
pub struct SdeConfig {
    /// Base URL serving the `.csv.bz2` dumps.
    pub dump_url: String,
    /// Directory where decompressed CSV files are cached.
    pub cache_dir: PathBuf,
    /// Download timeout (the type dump is tens of megabytes).
    pub request_timeout: Duration,
}

impl SdeConfig {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            dump_url: DEFAULT_DUMP_URL.to_string(),
            cache_dir: cache_dir.into(),
            request_timeout: Duration::from_secs(120),
        }
    }
}

/// Immutable reference tables loaded from the static dumps.
///
/// Build once per process with [`StaticData::fetch`] (download missing dumps,
/// then load) or [`StaticData::load_from_dir`] (cache only), then share by
/// reference. Lookups over the tables live in [`crate::lookup`].
#[derive(Debug)]
pub struct StaticData {
    pub(crate) types: Vec<InvType>,
    pub(crate) regions: Vec<Region>,
    pub(crate) systems: Vec<SolarSystem>,
    pub(crate) type_by_id: HashMap<i32, usize>,
    pub(crate) type_by_name: HashMap<String, usize>,
    pub(crate) types_by_group: HashMap<i32, Vec<usize>>,
    pub(crate) region_by_id: HashMap<i32, usize>,
    pub(crate) region_by_name: HashMap<String, usize>,
    pub(crate) system_by_id: HashMap<i32, usize>,
    pub(crate) system_by_name: HashMap<String, usize>,
}

impl StaticData {
    /// Download any missing dumps into the cache directory, then load.
    ///
    /// Cached files are reused as-is; delete them to force a re-download.
    pub async fn fetch(config: &SdeConfig) -> Result<Self, SdeError> {
        fs::create_dir_all(&config.cache_dir)?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to create HTTP client");

        for file in [INV_TYPES_FILE, MAP_REGIONS_FILE, MAP_SOLAR_SYSTEMS_FILE] {
            let target = config.cache_dir.join(file);
            if target.exists() {
                debug!(file, "Using cached dump");
                continue;
            }

            let url = format!("{}/{}.bz2", config.dump_url, file);
            info!(url = %url, "Downloading static dump");
            let response = http.get(&url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(SdeError::Download {
                    status: status.as_u16(),
                    url,
                });
            }

            let compressed = response.bytes().await?;
            let mut decoder = BzDecoder::new(compressed.as_ref());
            let mut csv_bytes = Vec::new();
            decoder.read_to_end(&mut csv_bytes)?;
            fs::write(&target, &csv_bytes)?;
        }

        Self::load_from_dir(&config.cache_dir)
    }

    /// Load previously cached dumps without touching the network.
    pub fn load_from_dir(dir: &Path) -> Result<Self, SdeError> {
        let types: Vec<InvType> = read_csv(&dir.join(INV_TYPES_FILE))?;
        let regions: Vec<Region> = read_csv(&dir.join(MAP_REGIONS_FILE))?;
        let systems: Vec<SolarSystem> = read_csv(&dir.join(MAP_SOLAR_SYSTEMS_FILE))?;
        info!(
            types = types.len(),
            regions = regions.len(),
            systems = systems.len(),
            "Loaded static data"
        );
        Ok(Self::from_rows(types, regions, systems))
    }

    /// Build the context from in-memory rows (tests, embedded tables).
    pub fn from_rows(types: Vec<InvType>, regions: Vec<Region>, systems: Vec<SolarSystem>) -> Self {
        let mut type_by_id = HashMap::with_capacity(types.len());
        let mut type_by_name = HashMap::with_capacity(types.len());
        let mut types_by_group: HashMap<i32, Vec<usize>> = HashMap::new();
        for (idx, row) in types.iter().enumerate() {
            type_by_id.insert(row.type_id, idx);
            type_by_name.insert(row.type_name.clone(), idx);
            types_by_group.entry(row.group_id).or_default().push(idx);
        }

        let mut region_by_id = HashMap::with_capacity(regions.len());
        let mut region_by_name = HashMap::with_capacity(regions.len());
        for (idx, row) in regions.iter().enumerate() {
            region_by_id.insert(row.region_id, idx);
            region_by_name.insert(row.region_name.clone(), idx);
        }

        let mut system_by_id = HashMap::with_capacity(systems.len());
        let mut system_by_name = HashMap::with_capacity(systems.len());
        for (idx, row) in systems.iter().enumerate() {
            system_by_id.insert(row.solar_system_id, idx);
            system_by_name.insert(row.solar_system_name.clone(), idx);
        }

        Self {
            types,
            regions,
            systems,
            type_by_id,
            type_by_name,
            types_by_group,
            region_by_id,
            region_by_name,
            system_by_id,
            system_by_name,
        }
    }

    pub fn types(&self) -> &[InvType] {
        &self.types
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn systems(&self) -> &[SolarSystem] {
        &self.systems
    }
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SdeError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StaticData {
        StaticData::from_rows(
            vec![
                InvType {
                    type_id: 34,
                    group_id: 18,
                    type_name: "Tritanium".to_string(),
                },
                InvType {
                    type_id: 35,
                    group_id: 18,
                    type_name: "Pyerite".to_string(),
                },
            ],
            vec![Region {
                region_id: 10000002,
                region_name: "The Forge".to_string(),
            }],
            vec![SolarSystem {
                region_id: 10000002,
                solar_system_id: 30000142,
                solar_system_name: "Jita".to_string(),
                security: 0.9459,
            }],
        )
    }

    #[test]
    fn test_from_rows_builds_indices() {
        let sde = sample();
        assert_eq!(sde.types().len(), 2);
        assert_eq!(sde.type_by_id[&34], 0);
        assert_eq!(sde.type_by_name["Pyerite"], 1);
        assert_eq!(sde.types_by_group[&18], vec![0, 1]);
        assert_eq!(sde.region_by_name["The Forge"], 0);
        assert_eq!(sde.system_by_id[&30000142], 0);
    }

    #[test]
    fn test_sde_config_defaults() {
        let config = SdeConfig::new("cache");
        assert_eq!(config.dump_url, DEFAULT_DUMP_URL);
        assert_eq!(config.cache_dir, PathBuf::from("cache"));
    }
}
