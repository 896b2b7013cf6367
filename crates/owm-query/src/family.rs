use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BuildError;

/// Category of API endpoints a query belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryFamily {
    CurrentWeather,
    FiveDayForecast,
    UvIndex,
}

impl QueryFamily {
    pub const ALL: [QueryFamily; 3] = [
        QueryFamily::CurrentWeather,
        QueryFamily::FiveDayForecast,
        QueryFamily::UvIndex,
    ];

    /// Legacy numeric id (0: current weather, 1: 5-day forecast, 2: UV index).
    pub fn id(&self) -> u8 {
        match self {
            Self::CurrentWeather => 0,
            Self::FiveDayForecast => 1,
            Self::UvIndex => 2,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }

    /// Canonical snake_case key, as used in catalog documents.
    pub fn key(&self) -> &'static str {
        match self {
            Self::CurrentWeather => "current_weather",
            Self::FiveDayForecast => "five_day_forecast",
            Self::UvIndex => "uv_index",
        }
    }
}

impl fmt::Display for QueryFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CurrentWeather => "CurrentWeather",
            Self::FiveDayForecast => "FiveDayForecast",
            Self::UvIndex => "UVIndex",
        };
        f.write_str(name)
    }
}

impl FromStr for QueryFamily {
    type Err = BuildError;

    /// Accepts the snake_case key, the display name (any case, `_`/`-`
    /// ignored) or the legacy numeric id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(id) = trimmed.parse::<u8>() {
            return Self::from_id(id).ok_or_else(|| BuildError::InvalidFamily(s.to_string()));
        }

        let folded: String = trimmed
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        match folded.as_str() {
            "currentweather" | "current" | "weather" => Ok(Self::CurrentWeather),
            "fivedayforecast" | "5dayforecast" | "forecast" => Ok(Self::FiveDayForecast),
            "uvindex" | "uv" | "uvi" => Ok(Self::UvIndex),
            _ => Err(BuildError::InvalidFamily(s.to_string())),
        }
    }
}
