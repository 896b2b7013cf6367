//! OpenWeatherMap request executor.

use owm_core::{ApiConfig, NetworkError, ReqwestErrorExt};
use owm_query::{params, QueryBuilder, QueryFamily, QueryParam};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::instrument;

use crate::error::ClientError;

/// Error body returned by the API, e.g. `{"cod": 401, "message": "Invalid API key"}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Builds query paths and issues them against the API.
#[derive(Debug, Clone)]
pub struct WeatherClient<'c> {
    client: Client,
    api_key: String,
    scheme: String,
    host_override: Option<String>,
    builder: QueryBuilder<'c>,
}

impl<'c> WeatherClient<'c> {
    /// # Errors
    /// Fails if the HTTP client cannot be created.
    pub fn new(config: &ApiConfig, builder: QueryBuilder<'c>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Transport(e.into_network_error()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            scheme: config.scheme.clone(),
            host_override: config.host_override.clone(),
            builder,
        })
    }

    pub fn builder(&self) -> &QueryBuilder<'c> {
        &self.builder
    }

    /// Full request URL for a query path: `{scheme}://{path}&appid={key}`.
    pub fn url_for(&self, path: &str) -> String {
        let path = match &self.host_override {
            Some(host) => match path.find('/') {
                Some(i) => format!("{}{}", host, &path[i..]),
                None => host.clone(),
            },
            None => path.to_string(),
        };
        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{}://{}{}appid={}", self.scheme, path, separator, self.api_key)
    }

    /// Issue a GET for an already built query path.
    ///
    /// # Errors
    /// `Transport` on connection failures, non-200 answers (with the upstream
    /// status and message) and undecodable bodies.
    #[instrument(skip(self), level = "info")]
    pub async fn execute(&self, path: &str) -> Result<Value, ClientError> {
        let response = self
            .client
            .get(self.url_for(path))
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or(body);
            tracing::warn!("Unable to execute query. API reports: {} ({})", message, status);
            return Err(NetworkError::ServerError {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let value = response
            .json::<Value>()
            .await
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;
        Ok(value)
    }

    /// Build a query from the catalog and execute it.
    ///
    /// # Errors
    /// `Query` if the query cannot be built (nothing is sent), otherwise as
    /// [`execute`](Self::execute).
    pub async fn query(
        &self,
        family: QueryFamily,
        name: &str,
        params: &[QueryParam],
    ) -> Result<Value, ClientError> {
        let path = self.builder.build(family, name, params)?;
        self.execute(&path).await
    }

    /// Like [`query`](Self::query) with the family given as text or legacy id.
    ///
    /// # Errors
    /// Same as [`query`](Self::query).
    pub async fn query_by_key(
        &self,
        family_key: &str,
        name: &str,
        params: &[QueryParam],
    ) -> Result<Value, ClientError> {
        let path = self.builder.build_by_key(family_key, name, params)?;
        self.execute(&path).await
    }

    /// # Errors
    /// As [`query`](Self::query).
    pub async fn current_by_city_id(&self, id: u64) -> Result<Value, ClientError> {
        self.query(QueryFamily::CurrentWeather, "by_city_ID", &params![id])
            .await
    }

    /// # Errors
    /// As [`query`](Self::query).
    pub async fn current_by_city_name(
        &self,
        name: &str,
        country: Option<&str>,
    ) -> Result<Value, ClientError> {
        self.query(QueryFamily::CurrentWeather, "by_city_name", &name_params(name, country))
            .await
    }

    /// # Errors
    /// As [`query`](Self::query).
    pub async fn current_by_coords(&self, lat: f64, lon: f64) -> Result<Value, ClientError> {
        self.query(QueryFamily::CurrentWeather, "by_geog_coord", &params![lat, lon])
            .await
    }

    /// # Errors
    /// As [`query`](Self::query).
    pub async fn forecast_by_city_id(&self, id: u64) -> Result<Value, ClientError> {
        self.query(QueryFamily::FiveDayForecast, "by_city_ID", &params![id])
            .await
    }

    /// # Errors
    /// As [`query`](Self::query).
    pub async fn forecast_by_city_name(
        &self,
        name: &str,
        country: Option<&str>,
    ) -> Result<Value, ClientError> {
        self.query(QueryFamily::FiveDayForecast, "by_city_name", &name_params(name, country))
            .await
    }

    /// # Errors
    /// As [`query`](Self::query).
    pub async fn uv_for_location(&self, lat: f64, lon: f64) -> Result<Value, ClientError> {
        self.query(QueryFamily::UvIndex, "for_one_location", &params![lat, lon])
            .await
    }
}

fn name_params(name: &str, country: Option<&str>) -> Vec<QueryParam> {
    let mut values = params![name];
    if let Some(code) = country.filter(|c| !c.is_empty()) {
        values.push(code.into());
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(host_override: Option<&str>) -> ApiConfig {
        ApiConfig {
            api_key: "KEY".to_string(),
            scheme: "https".to_string(),
            timeout_secs: 5,
            host_override: host_override.map(str::to_string),
        }
    }

    #[test]
    fn test_url_for_appends_key() {
        let client = WeatherClient::new(&config(None), QueryBuilder::standard().unwrap()).unwrap();
        assert_eq!(
            client.url_for("api.openweathermap.org/data/2.5/weather?id=2960561"),
            "https://api.openweathermap.org/data/2.5/weather?id=2960561&appid=KEY"
        );
    }

    #[test]
    fn test_url_for_without_query_string() {
        let client = WeatherClient::new(&config(None), QueryBuilder::standard().unwrap()).unwrap();
        assert_eq!(
            client.url_for("api.example.org/ping"),
            "https://api.example.org/ping?appid=KEY"
        );
    }

    #[test]
    fn test_url_for_host_override() {
        let client = WeatherClient::new(
            &config(Some("127.0.0.1:8080")),
            QueryBuilder::standard().unwrap(),
        )
        .unwrap();
        assert_eq!(
            client.url_for("api.openweathermap.org/data/2.5/uvi?lat=1&lon=2"),
            "https://127.0.0.1:8080/data/2.5/uvi?lat=1&lon=2&appid=KEY"
        );
    }

    #[test]
    fn test_name_params() {
        assert_eq!(name_params("Kazan", None), params!["Kazan"]);
        assert_eq!(name_params("Kazan", Some("")), params!["Kazan"]);
        assert_eq!(name_params("Kazan", Some("RU")), params!["Kazan", "RU"]);
    }
}
