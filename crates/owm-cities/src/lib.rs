//! City reference data for OpenWeatherMap queries.
//!
//! Resolves city names to ids and coordinates using the bulk
//! `city.list.json.gz` published by OpenWeatherMap.

pub mod lookup;
pub mod provider;
pub mod types;

pub use lookup::{CityIndex, CityLookup};
pub use provider::{CityListProvider, CITY_ARCHIVE_FILE, CITY_LIST_FILE};
pub use types::{CityRecord, Coord};
