//! The registry of query templates, partitioned by family.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::error::{BuildError, CatalogError};
use crate::family::QueryFamily;
use crate::template::QueryTemplate;

/// A catalog entry in its textual form.
#[derive(Debug, Clone, Copy)]
pub struct EntrySpec<'a> {
    pub family: QueryFamily,
    pub name: &'a str,
    pub required: &'a str,
    pub optional: &'a [&'a str],
}

const fn entry<'a>(
    family: QueryFamily,
    name: &'a str,
    required: &'a str,
    optional: &'a [&'a str],
) -> EntrySpec<'a> {
    EntrySpec {
        family,
        name,
        required,
        optional,
    }
}

use crate::family::QueryFamily::{CurrentWeather, FiveDayForecast, UvIndex};

/// OpenWeatherMap free-tier endpoints.
pub const STANDARD_ENTRIES: &[EntrySpec<'static>] = &[
    entry(CurrentWeather, "by_city_name", "api.openweathermap.org/data/2.5/weather?q={PARAM1}", &[",{PARAM2}"]),
    entry(CurrentWeather, "by_city_ID", "api.openweathermap.org/data/2.5/weather?id={PARAM1}", &[]),
    entry(CurrentWeather, "by_geog_coord", "api.openweathermap.org/data/2.5/weather?lat={PARAM1}&lon={PARAM2}", &[]),
    entry(CurrentWeather, "by_zip_code", "api.openweathermap.org/data/2.5/weather?zip={PARAM1}", &[",{PARAM2}"]),
    entry(CurrentWeather, "by_circle", "api.openweathermap.org/data/2.5/find?lat={PARAM1}&lon={PARAM2}&cnt={PARAM3}", &[]),
    entry(FiveDayForecast, "by_city_name", "api.openweathermap.org/data/2.5/forecast?q={PARAM1}", &[",{PARAM2}"]),
    entry(FiveDayForecast, "by_city_ID", "api.openweathermap.org/data/2.5/forecast?id={PARAM1}", &[]),
    entry(FiveDayForecast, "by_geog_coord", "api.openweathermap.org/data/2.5/forecast?lat={PARAM1}&lon={PARAM2}", &[]),
    entry(FiveDayForecast, "by_zip_code", "api.openweathermap.org/data/2.5/forecast?zip={PARAM1}", &[",{PARAM2}"]),
    entry(UvIndex, "for_one_location", "api.openweathermap.org/data/2.5/uvi?lat={PARAM1}&lon={PARAM2}", &[]),
    entry(UvIndex, "forecast_one_location", "api.openweathermap.org/data/2.5/uvi/forecast?lat={PARAM1}&lon={PARAM2}&cnt={PARAM3}", &[]),
    entry(UvIndex, "historical_uv_location", "api.openweathermap.org/data/2.5/uvi/history?lat={PARAM1}&lon={PARAM2}&cnt={PARAM3}&start={PARAM4}&end={PARAM5}", &[]),
];

static STANDARD: LazyLock<Result<Catalog, CatalogError>> =
    LazyLock::new(|| Catalog::from_entries(STANDARD_ENTRIES));

/// All templates of one family, keyed by query name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    family: QueryFamily,
    templates: BTreeMap<String, QueryTemplate>,
}

impl Partition {
    fn new(family: QueryFamily) -> Self {
        Self {
            family,
            templates: BTreeMap::new(),
        }
    }

    pub fn family(&self) -> QueryFamily {
        self.family
    }

    pub fn get(&self, name: &str) -> Option<&QueryTemplate> {
        self.templates.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn templates(&self) -> impl Iterator<Item = &QueryTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Immutable (family, name) → template registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    partitions: BTreeMap<QueryFamily, Partition>,
}

#[derive(Debug, Deserialize)]
struct EntryDoc {
    required: String,
    #[serde(default)]
    optional: Vec<String>,
}

impl Catalog {
    /// The built-in OpenWeatherMap catalog, constructed on first use.
    ///
    /// # Errors
    /// Returns the validation error if a built-in template is malformed.
    pub fn standard() -> Result<&'static Catalog, CatalogError> {
        match &*STANDARD {
            Ok(catalog) => Ok(catalog),
            Err(e) => Err(e.clone()),
        }
    }

    /// Build a catalog from textual entries, validating every template.
    ///
    /// # Errors
    /// Fails on the first malformed template or duplicated name.
    pub fn from_entries(entries: &[EntrySpec<'_>]) -> Result<Self, CatalogError> {
        let mut catalog = Self {
            partitions: BTreeMap::new(),
        };
        for spec in entries {
            let template = QueryTemplate::new(spec.name, spec.required, spec.optional)?;
            catalog.insert(spec.family, template)?;
        }
        tracing::debug!(
            "Query catalog built with {} templates",
            catalog.partitions.values().map(Partition::len).sum::<usize>()
        );
        Ok(catalog)
    }

    /// Build a catalog from a TOML document of the form
    ///
    /// ```toml
    /// [current_weather.by_city_name]
    /// required = "api.openweathermap.org/data/2.5/weather?q={PARAM1}"
    /// optional = [",{PARAM2}"]
    /// ```
    ///
    /// # Errors
    /// Fails on malformed TOML, unknown family keys or invalid templates.
    pub fn from_toml_str(doc: &str) -> Result<Self, CatalogError> {
        let raw: BTreeMap<String, BTreeMap<String, EntryDoc>> = toml::from_str(doc)?;

        let mut catalog = Self {
            partitions: BTreeMap::new(),
        };
        for (family_key, entries) in raw {
            let family: QueryFamily = family_key
                .parse()
                .map_err(|e: BuildError| CatalogError::Parse(e.to_string()))?;
            for (name, entry) in entries {
                let template = QueryTemplate::new(name, &entry.required, entry.optional.as_slice())?;
                catalog.insert(family, template)?;
            }
        }
        Ok(catalog)
    }

    fn insert(&mut self, family: QueryFamily, template: QueryTemplate) -> Result<(), CatalogError> {
        let partition = self
            .partitions
            .entry(family)
            .or_insert_with(|| Partition::new(family));
        if partition.templates.contains_key(template.name()) {
            return Err(CatalogError::DuplicateName {
                family: family.to_string(),
                name: template.name().to_string(),
            });
        }
        partition
            .templates
            .insert(template.name().to_string(), template);
        Ok(())
    }

    /// Templates of `family`, or `None` if the catalog has none for it.
    pub fn lookup(&self, family: QueryFamily) -> Option<&Partition> {
        self.partitions.get(&family)
    }

    /// Like [`lookup`](Self::lookup) but takes the family as text or a
    /// legacy numeric id.
    ///
    /// # Errors
    /// `InvalidFamily` if the key does not name a family present in the catalog.
    pub fn lookup_key(&self, family_key: &str) -> Result<&Partition, BuildError> {
        let family: QueryFamily = family_key.parse()?;
        self.lookup(family)
            .ok_or_else(|| BuildError::InvalidFamily(family_key.to_string()))
    }

    pub fn families(&self) -> impl Iterator<Item = QueryFamily> + '_ {
        self.partitions.keys().copied()
    }

    pub fn partitions(&self) -> impl Iterator<Item = &Partition> {
        self.partitions.values()
    }
}
