use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic coordinates as published in the city list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lon: f64,
    pub lat: f64,
}

/// One row of `city.list.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub state: String,
    pub country: String,
    pub coord: Coord,
}

impl CityRecord {
    pub fn latitude(&self) -> f64 {
        self.coord.lat
    }

    pub fn longitude(&self) -> f64 {
        self.coord.lon
    }
}

impl fmt::Display for CityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.name)?;
        if !self.state.is_empty() {
            write!(f, ", {}", self.state)?;
        }
        write!(f, ", {} ({}, {})", self.country, self.coord.lat, self.coord.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_bulk_row() {
        let json = r#"{"id": 569696, "name": "Cheboksary", "state": "", "country": "RU",
                       "coord": {"lon": 47.251942, "lat": 56.132221}}"#;
        let city: CityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(city.id, 569696);
        assert_eq!(city.country, "RU");
        assert_eq!(city.latitude(), 56.132221);
        assert_eq!(city.longitude(), 47.251942);
    }

    #[test]
    fn test_missing_state_defaults_to_empty() {
        let json = r#"{"id": 1, "name": "X", "country": "US", "coord": {"lon": 0.0, "lat": 0.0}}"#;
        let city: CityRecord = serde_json::from_str(json).unwrap();
        assert!(city.state.is_empty());
    }

    #[test]
    fn test_display() {
        let city = CityRecord {
            id: 4180439,
            name: "Atlanta".into(),
            state: "GA".into(),
            country: "US".into(),
            coord: Coord { lon: -84.38, lat: 33.75 },
        };
        assert_eq!(city.to_string(), "4180439 Atlanta, GA, US (33.75, -84.38)");
    }
}
