use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Partition};
use crate::error::{BuildError, CatalogError};
use crate::family::QueryFamily;
use crate::param::QueryParam;

/// What to do with parameters beyond the last optional suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExcessPolicy {
    /// Drop them silently.
    #[default]
    Ignore,
    /// Fail with [`BuildError::TooManyParameters`].
    Reject,
}

/// Resolves (family, name, parameters) into a query path.
///
/// The path has no scheme and no API key; the request executor adds both.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<'c> {
    catalog: &'c Catalog,
    excess: ExcessPolicy,
}

impl QueryBuilder<'static> {
    /// Builder over the built-in catalog.
    ///
    /// # Errors
    /// Fails if the built-in catalog does not validate.
    pub fn standard() -> Result<Self, CatalogError> {
        Ok(Self::new(Catalog::standard()?))
    }
}

impl<'c> QueryBuilder<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            excess: ExcessPolicy::default(),
        }
    }

    pub fn with_excess_policy(mut self, excess: ExcessPolicy) -> Self {
        self.excess = excess;
        self
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn excess_policy(&self) -> ExcessPolicy {
        self.excess
    }

    /// Resolve a query.
    ///
    /// # Errors
    /// `InvalidFamily` if the catalog has no partition for `family`,
    /// `InvalidQueryName` if `name` is not in it, `InsufficientParameters`
    /// if fewer values than required placeholders are given, and
    /// `TooManyParameters` for surplus values under [`ExcessPolicy::Reject`].
    pub fn build(
        &self,
        family: QueryFamily,
        name: &str,
        params: &[QueryParam],
    ) -> Result<String, BuildError> {
        let partition = self
            .catalog
            .lookup(family)
            .ok_or_else(|| BuildError::InvalidFamily(family.to_string()))?;
        self.build_in(partition, name, params)
    }

    /// Like [`build`](Self::build) with the family given as text or a legacy
    /// numeric id (`0`, `1`, `2`).
    ///
    /// # Errors
    /// Same as [`build`](Self::build).
    pub fn build_by_key(
        &self,
        family_key: &str,
        name: &str,
        params: &[QueryParam],
    ) -> Result<String, BuildError> {
        let partition = self.catalog.lookup_key(family_key)?;
        self.build_in(partition, name, params)
    }

    fn build_in(
        &self,
        partition: &Partition,
        name: &str,
        params: &[QueryParam],
    ) -> Result<String, BuildError> {
        let template = partition
            .get(name)
            .ok_or_else(|| BuildError::InvalidQueryName {
                family: partition.family().to_string(),
                name: name.to_string(),
            })?;

        let required = template.required_count();
        if params.len() < required {
            return Err(BuildError::InsufficientParameters {
                required,
                provided: params.len(),
            });
        }

        let max = template.max_params();
        if params.len() > max {
            match self.excess {
                ExcessPolicy::Reject => {
                    return Err(BuildError::TooManyParameters {
                        max,
                        provided: params.len(),
                    });
                }
                ExcessPolicy::Ignore => {
                    tracing::debug!(
                        "Ignoring {} extra parameters for {}/{}",
                        params.len() - max,
                        partition.family(),
                        name
                    );
                }
            }
        }

        let (query, appended) = template.render(params);
        tracing::debug!(
            "Built {}/{} with {} optional suffixes: {}",
            partition.family(),
            name,
            appended,
            query
        );
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EntrySpec;
    use crate::params;

    fn builder() -> QueryBuilder<'static> {
        QueryBuilder::standard().unwrap()
    }

    #[test]
    fn test_by_city_id() {
        let q = builder()
            .build(QueryFamily::CurrentWeather, "by_city_ID", &params![2960561])
            .unwrap();
        assert_eq!(q, "api.openweathermap.org/data/2.5/weather?id=2960561");
    }

    #[test]
    fn test_by_city_name_with_country() {
        let q = builder()
            .build(QueryFamily::CurrentWeather, "by_city_name", &params!["Cheboksary", "RU"])
            .unwrap();
        assert_eq!(q, "api.openweathermap.org/data/2.5/weather?q=Cheboksary,RU");
    }

    #[test]
    fn test_by_city_name_without_country() {
        let q = builder()
            .build(QueryFamily::CurrentWeather, "by_city_name", &params!["Cheboksary"])
            .unwrap();
        assert_eq!(q, "api.openweathermap.org/data/2.5/weather?q=Cheboksary");
    }

    #[test]
    fn test_uv_for_one_location() {
        let q = builder()
            .build(QueryFamily::UvIndex, "for_one_location", &params![56.13, 47.25])
            .unwrap();
        assert_eq!(q, "api.openweathermap.org/data/2.5/uvi?lat=56.13&lon=47.25");
    }

    #[test]
    fn test_whole_float_coordinates_keep_decimal_point() {
        let q = builder()
            .build(QueryFamily::UvIndex, "for_one_location", &params![56.0, 47.0])
            .unwrap();
        assert_eq!(q, "api.openweathermap.org/data/2.5/uvi?lat=56.0&lon=47.0");
    }

    #[test]
    fn test_name_not_in_family() {
        let err = builder()
            .build(QueryFamily::FiveDayForecast, "by_circle", &params![1, 2, 3])
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::InvalidQueryName {
                family: "FiveDayForecast".to_string(),
                name: "by_circle".to_string(),
            }
        );
    }

    #[test]
    fn test_insufficient_parameters() {
        let err = builder()
            .build(QueryFamily::CurrentWeather, "by_geog_coord", &params![56.13])
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::InsufficientParameters {
                required: 2,
                provided: 1
            }
        );
    }

    #[test]
    fn test_excess_ignored_by_default() {
        let q = builder()
            .build(QueryFamily::CurrentWeather, "by_zip_code", &params!["94040", "us", "extra"])
            .unwrap();
        assert_eq!(q, "api.openweathermap.org/data/2.5/weather?zip=94040,us");
    }

    #[test]
    fn test_excess_rejected_when_strict() {
        let err = builder()
            .with_excess_policy(ExcessPolicy::Reject)
            .build(QueryFamily::CurrentWeather, "by_city_ID", &params![1, 2])
            .unwrap_err();
        assert_eq!(err, BuildError::TooManyParameters { max: 1, provided: 2 });

        // Values that fit the optional suffixes are still accepted.
        let q = builder()
            .with_excess_policy(ExcessPolicy::Reject)
            .build(QueryFamily::FiveDayForecast, "by_city_name", &params!["Kazan", "RU"])
            .unwrap();
        assert_eq!(q, "api.openweathermap.org/data/2.5/forecast?q=Kazan,RU");
    }

    #[test]
    fn test_build_by_key() {
        let b = builder();
        assert_eq!(
            b.build_by_key("0", "by_city_ID", &params![524901]).unwrap(),
            "api.openweathermap.org/data/2.5/weather?id=524901"
        );
        assert_eq!(
            b.build_by_key("9", "by_city_ID", &params![524901]),
            Err(BuildError::InvalidFamily("9".to_string()))
        );
    }

    #[test]
    fn test_family_missing_from_custom_catalog() {
        let catalog = Catalog::from_entries(&[EntrySpec {
            family: QueryFamily::UvIndex,
            name: "only",
            required: "x?lat={PARAM1}",
            optional: &[],
        }])
        .unwrap();
        let err = QueryBuilder::new(&catalog)
            .build(QueryFamily::CurrentWeather, "by_city_ID", &params![1])
            .unwrap_err();
        assert_eq!(err, BuildError::InvalidFamily("CurrentWeather".to_string()));
    }

    #[test]
    fn test_historical_uv() {
        let q = builder()
            .build(
                QueryFamily::UvIndex,
                "historical_uv_location",
                &params![37.75, -122.37, 5, 1498049953, 1498481991],
            )
            .unwrap();
        assert_eq!(
            q,
            "api.openweathermap.org/data/2.5/uvi/history?lat=37.75&lon=-122.37&cnt=5&start=1498049953&end=1498481991"
        );
    }
}
