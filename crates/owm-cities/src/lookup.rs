use owm_core::CityDataError;
use std::fmt;

use crate::provider::CityListProvider;
use crate::types::CityRecord;

/// In-memory city table with name search.
#[derive(Debug, Clone, Default)]
pub struct CityIndex {
    cities: Vec<CityRecord>,
    /// Lowercased names, parallel to `cities`
    folded: Vec<String>,
}

impl CityIndex {
    pub fn new(cities: Vec<CityRecord>) -> Self {
        let folded = cities.iter().map(|c| c.name.to_lowercase()).collect();
        Self { cities, folded }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn cities(&self) -> &[CityRecord] {
        &self.cities
    }

    /// Cities whose name starts with `pattern`, ignoring case, optionally
    /// restricted to a country code. An empty country means no filter.
    pub fn search(&self, pattern: &str, country: Option<&str>) -> Vec<&CityRecord> {
        let needle = pattern.to_lowercase();
        self.filter(|name| name.starts_with(&needle), country)
    }

    /// Like [`search`](Self::search) but matches `pattern` anywhere in the name.
    pub fn search_containing(&self, pattern: &str, country: Option<&str>) -> Vec<&CityRecord> {
        let needle = pattern.to_lowercase();
        self.filter(|name| name.contains(&needle), country)
    }

    fn filter<F>(&self, matches: F, country: Option<&str>) -> Vec<&CityRecord>
    where
        F: Fn(&str) -> bool,
    {
        let country = country.map(str::trim).filter(|c| !c.is_empty());
        self.cities
            .iter()
            .zip(&self.folded)
            .filter(|(city, name)| {
                matches(name.as_str())
                    && country.map_or(true, |code| city.country.eq_ignore_ascii_case(code))
            })
            .map(|(city, _)| city)
            .collect()
    }

    pub fn get(&self, id: u64) -> Option<&CityRecord> {
        self.cities.iter().find(|c| c.id == id)
    }

    /// Sorted, de-duplicated country codes.
    pub fn country_list(&self) -> Vec<&str> {
        let mut countries: Vec<&str> = self.cities.iter().map(|c| c.country.as_str()).collect();
        countries.sort_unstable();
        countries.dedup();
        countries
    }
}

impl fmt::Display for CityIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total cities in API: {}", self.len())
    }
}

/// City lookup service backed by the bulk list.
///
/// Initialization never fails: if the list cannot be refreshed or read, the
/// error is logged and kept, and the lookup answers from an empty table.
#[derive(Debug)]
pub struct CityLookup {
    index: CityIndex,
    last_error: Option<CityDataError>,
}

impl CityLookup {
    pub async fn initialize(provider: &CityListProvider) -> Self {
        let loaded = match provider.refresh_if_missing().await {
            Ok(_) => provider.load(),
            Err(e) => Err(e),
        };

        match loaded {
            Ok(cities) => Self {
                index: CityIndex::new(cities),
                last_error: None,
            },
            Err(e) => {
                tracing::warn!("City list unavailable: {}", e);
                Self {
                    index: CityIndex::empty(),
                    last_error: Some(e),
                }
            }
        }
    }

    pub fn from_index(index: CityIndex) -> Self {
        Self {
            index,
            last_error: None,
        }
    }

    pub fn index(&self) -> &CityIndex {
        &self.index
    }

    /// The refresh or load failure from initialization, if any.
    pub fn last_error(&self) -> Option<&CityDataError> {
        self.last_error.as_ref()
    }

    pub fn search(&self, pattern: &str, country: Option<&str>) -> Vec<&CityRecord> {
        self.index.search(pattern, country)
    }

    pub fn country_list(&self) -> Vec<&str> {
        self.index.country_list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coord;

    fn city(id: u64, name: &str, country: &str) -> CityRecord {
        CityRecord {
            id,
            name: name.to_string(),
            state: String::new(),
            country: country.to_string(),
            coord: Coord { lon: 0.0, lat: 0.0 },
        }
    }

    fn index() -> CityIndex {
        CityIndex::new(vec![
            city(569696, "Cheboksary", "RU"),
            city(569665, "Cheboksarskiy Rayon", "RU"),
            city(1, "Cheboksary", "US"),
            city(524901, "Moscow", "RU"),
            city(5601538, "Moscow", "US"),
            city(2643743, "London", "GB"),
        ])
    }

    #[test]
    fn test_prefix_search_ignores_case() {
        let idx = index();
        let found: Vec<u64> = idx.search("chebok", None).iter().map(|c| c.id).collect();
        assert_eq!(found, vec![569696, 569665, 1]);
    }

    #[test]
    fn test_search_with_country() {
        let idx = index();
        let found = idx.search("Cheboksar", Some("RU"));
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|c| c.country == "RU"));

        let found = idx.search("Cheboksary", Some("RU"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 569696);

        let found = idx.search("moscow", Some("us"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 5601538);
    }

    #[test]
    fn test_empty_country_means_no_filter() {
        let idx = index();
        assert_eq!(idx.search("Moscow", Some("")).len(), 2);
    }

    #[test]
    fn test_prefix_does_not_match_inside_name() {
        let idx = index();
        assert!(idx.search("ondon", None).is_empty());
        assert_eq!(idx.search_containing("ondon", None).len(), 1);
    }

    #[test]
    fn test_country_list_sorted_unique() {
        assert_eq!(index().country_list(), vec!["GB", "RU", "US"]);
    }

    #[test]
    fn test_display_and_get() {
        let idx = index();
        assert_eq!(idx.to_string(), "Total cities in API: 6");
        assert_eq!(idx.get(2643743).map(|c| c.name.as_str()), Some("London"));
        assert!(idx.get(42).is_none());
    }

    #[test]
    fn test_empty_lookup() {
        let lookup = CityLookup::from_index(CityIndex::empty());
        assert!(lookup.search("a", None).is_empty());
        assert!(lookup.country_list().is_empty());
        assert!(lookup.last_error().is_none());
    }
}
