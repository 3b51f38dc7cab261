//! Weather provider implementations for fetching hourly forecasts.

use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, instrument};

use forecast_common::{Coordinate, ForecastBatch, LoaderError, LoaderResult};

/// Sections of the One Call response we never use.
const EXCLUDED_SECTIONS: &str = "current,minutely,daily,alerts";

/// Trait for providers that return an hourly forecast for a coordinate.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn fetch_forecast(&self, coordinate: Coordinate) -> LoaderResult<ForecastBatch>;
}

/// Connection settings for the OpenWeather One Call API.
#[derive(Debug, Clone)]
pub struct OpenWeatherConfig {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout: Duration,
}

/// OpenWeather One Call client, metric units, hourly data only.
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl OpenWeatherClient {
    pub fn new(config: &OpenWeatherConfig) -> LoaderResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LoaderError::Config(
                "missing API key for forecast provider".to_string(),
            ));
        }

        let base_url = Url::parse(&config.base_url).map_err(|e| LoaderError::InvalidBaseUrl {
            url: config.base_url.clone(),
            message: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LoaderError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url,
        })
    }

    /// Full request URL for a coordinate. Query parameters already present
    /// on the base URL are kept.
    pub fn request_url(&self, coordinate: Coordinate) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("appid", &self.api_key)
            .append_pair("lat", &coordinate.lat.to_string())
            .append_pair("lon", &coordinate.lon.to_string())
            .append_pair("units", "metric")
            .append_pair("exclude", EXCLUDED_SECTIONS);
        url
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherClient {
    #[instrument(skip(self), fields(lat = coordinate.lat, lon = coordinate.lon))]
    async fn fetch_forecast(&self, coordinate: Coordinate) -> LoaderResult<ForecastBatch> {
        let url = self.request_url(coordinate);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoaderError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoaderError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LoaderError::Decode(format!("failed to read response body: {}", e)))?;

        let batch: ForecastBatch =
            serde_json::from_slice(&body).map_err(|e| LoaderError::Decode(e.to_string()))?;

        debug!(hours = batch.hourly.len(), "Fetched hourly forecast");
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(base_url: &str) -> OpenWeatherConfig {
        OpenWeatherConfig {
            api_key: "secret".to_string(),
            base_url: base_url.to_string(),
            request_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_request_url_parameters() {
        let client =
            OpenWeatherClient::new(&config("https://api.openweathermap.org/data/2.5/onecall"))
                .unwrap();
        let url = client.request_url(Coordinate::new(47.6, -122.25));

        assert_eq!(url.path(), "/data/2.5/onecall");
        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(query["appid"], "secret");
        assert_eq!(query["lat"], "47.6");
        assert_eq!(query["lon"], "-122.25");
        assert_eq!(query["units"], "metric");
        assert_eq!(query["exclude"], "current,minutely,daily,alerts");
    }

    #[test]
    fn test_whole_degrees_formatted_without_fraction() {
        let client = OpenWeatherClient::new(&config("http://localhost/onecall")).unwrap();
        let url = client.request_url(Coordinate::new(1.0, 0.0));
        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(query["lat"], "1");
        assert_eq!(query["lon"], "0");
    }

    #[test]
    fn test_base_url_query_kept() {
        let client = OpenWeatherClient::new(&config("http://localhost/onecall?lang=de")).unwrap();
        let url = client.request_url(Coordinate::new(0.0, 0.0));
        assert!(url.query().unwrap().starts_with("lang=de&appid=secret"));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = OpenWeatherClient::new(&config("not a url"));
        assert!(matches!(result, Err(LoaderError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_missing_api_key() {
        let mut cfg = config("http://localhost/onecall");
        cfg.api_key = "  ".to_string();
        let result = OpenWeatherClient::new(&cfg);
        assert!(matches!(result, Err(LoaderError::Config(_))));
    }
}
