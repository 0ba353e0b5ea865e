//! Cached lookup of current weather conditions.
//!
//! Successful lookups are cached per city for a configurable time; failed
//! lookups are never cached, so the next request for that city retries.

pub mod transport;

use std::{sync::Arc, time::Duration};

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::WeatherConfig;
pub use transport::{HttpWeatherTransport, WeatherTransport};

/// Current conditions for a city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub temperature: i32,
    pub feels_like: i32,
    pub descriptions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    #[error("City must not be empty")]
    EmptyCity,
    #[error("Weather request failed: {0}")]
    Request(String),
    #[error("Weather provider answered with status {0}")]
    Status(u16),
    #[error("Weather provider reported an error: {0}")]
    Provider(String),
    #[error("Malformed weather response: {0}")]
    Decode(String),
}

#[derive(Clone, Debug)]
pub struct WeatherService {
    transport: Arc<dyn WeatherTransport>,
    cache: Cache<String, WeatherObservation>,
}

impl WeatherService {
    pub fn new(transport: Arc<dyn WeatherTransport>, ttl: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(max_capacity)
            .build();

        Self { transport, cache }
    }

    /// Service backed by the weatherstack HTTP API.
    pub fn from_config(config: &WeatherConfig) -> Result<Self, reqwest::Error> {
        let transport = HttpWeatherTransport::new(config)?;

        Ok(Self::new(
            Arc::new(transport),
            Duration::from_secs(config.cache_ttl_seconds),
            config.cache_max_capacity,
        ))
    }

    /// Current weather for `city`, served from the cache when possible.
    ///
    /// Cities are keyed case-insensitively. Concurrent misses for the same
    /// city share a single upstream request.
    pub async fn get_weather(&self, city: &str) -> Result<WeatherObservation, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::EmptyCity);
        }

        let result = self
            .cache
            .try_get_with(city.to_lowercase(), async {
                debug!(city, "Weather cache miss");
                self.transport.current(city).await
            })
            .await
            .map_err(|e| (*e).clone());

        if let Err(e) = &result {
            warn!(city, "Error fetching weather: {}", e);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::transport::mock::MockWeatherTransport;
    use super::*;

    fn observation(temperature: i32) -> WeatherObservation {
        WeatherObservation {
            temperature,
            feels_like: temperature - 2,
            descriptions: vec!["Partly cloudy".to_string()],
        }
    }

    fn service(transport: &Arc<MockWeatherTransport>) -> WeatherService {
        WeatherService::new(transport.clone(), Duration::from_secs(60), 100)
    }

    #[tokio::test]
    async fn test_second_lookup_is_served_from_cache() {
        let transport = Arc::new(MockWeatherTransport::new());
        transport.push_response(Ok(observation(18)));
        let weather = service(&transport);

        let first = weather.get_weather("London").await;
        let second = weather.get_weather("London").await;

        assert_eq!(first, Ok(observation(18)));
        assert_eq!(second, first);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let transport = Arc::new(MockWeatherTransport::new());
        transport.push_response(Err(WeatherError::Status(500)));
        transport.push_response(Ok(observation(21)));
        let weather = service(&transport);

        assert_eq!(
            weather.get_weather("London").await,
            Err(WeatherError::Status(500))
        );
        assert_eq!(weather.get_weather("London").await, Ok(observation(21)));
        assert_eq!(weather.get_weather("London").await, Ok(observation(21)));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_city_key_ignores_case_and_whitespace() {
        let transport = Arc::new(MockWeatherTransport::always(observation(5)));
        let weather = service(&transport);

        weather.get_weather("Oslo").await.expect("Expected weather");
        weather.get_weather("  oslo ").await.expect("Expected weather");
        weather.get_weather("OSLO").await.expect("Expected weather");

        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_each_city_is_cached_separately() {
        let transport = Arc::new(MockWeatherTransport::new());
        transport.push_response(Ok(observation(30)));
        transport.push_response(Ok(observation(12)));
        let weather = service(&transport);

        assert_eq!(weather.get_weather("Mumbai").await, Ok(observation(30)));
        assert_eq!(weather.get_weather("Berlin").await, Ok(observation(12)));
        assert_eq!(weather.get_weather("Mumbai").await, Ok(observation(30)));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_city_is_rejected_without_a_request() {
        let transport = Arc::new(MockWeatherTransport::always(observation(5)));
        let weather = service(&transport);

        assert_eq!(weather.get_weather("   ").await, Err(WeatherError::EmptyCity));
        assert_eq!(transport.calls(), 0);
    }
}
