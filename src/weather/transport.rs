use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{WeatherError, WeatherObservation};
use crate::config::WeatherConfig;

/// Fetches the current weather for a city from an upstream provider.
#[async_trait]
pub trait WeatherTransport: Send + Sync + Debug {
    async fn current(&self, city: &str) -> Result<WeatherObservation, WeatherError>;
}

/// weatherstack client over reqwest.
#[derive(Debug, Clone)]
pub struct HttpWeatherTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpWeatherTransport {
    pub fn new(config: &WeatherConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct WeatherstackResponse {
    current: Option<Current>,
    error: Option<WeatherstackError>,
}

#[derive(Debug, Deserialize)]
struct Current {
    temperature: i32,
    #[serde(default)]
    weather_descriptions: Vec<String>,
    feelslike: i32,
}

#[derive(Debug, Deserialize)]
struct WeatherstackError {
    #[serde(default)]
    info: String,
}

#[async_trait]
impl WeatherTransport for HttpWeatherTransport {
    async fn current(&self, city: &str) -> Result<WeatherObservation, WeatherError> {
        debug!(city, "Requesting current weather");

        let response = self
            .client
            .get(format!("{}/current", self.base_url))
            .query(&[("access_key", self.api_key.as_str()), ("query", city)])
            .send()
            .await
            .map_err(|e| WeatherError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::Request(e.to_string()))?;

        // weatherstack reports failures with a 200 and an `error` object
        let parsed: WeatherstackResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Decode(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(WeatherError::Provider(error.info));
        }

        let current = parsed
            .current
            .ok_or_else(|| WeatherError::Decode("missing `current` object".to_string()))?;

        Ok(WeatherObservation {
            temperature: current.temperature,
            feels_like: current.feelslike,
            descriptions: current.weather_descriptions,
        })
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::{
        collections::VecDeque,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex, MutexGuard, PoisonError,
        },
    };

    use super::*;

    /// Transport that replays queued responses and counts invocations.
    ///
    /// Once the queue is drained it answers with the fallback observation, or
    /// with a request error when there is none.
    #[derive(Debug, Default)]
    pub struct MockWeatherTransport {
        responses: Mutex<VecDeque<Result<WeatherObservation, WeatherError>>>,
        fallback: Option<WeatherObservation>,
        calls: AtomicUsize,
    }

    impl MockWeatherTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn always(observation: WeatherObservation) -> Self {
            Self {
                fallback: Some(observation),
                ..Self::default()
            }
        }

        /// Mild conditions used by the test application.
        pub fn default_observation() -> WeatherObservation {
            WeatherObservation {
                temperature: 24,
                feels_like: 26,
                descriptions: vec!["Sunny".to_string()],
            }
        }

        fn queue(&self) -> MutexGuard<'_, VecDeque<Result<WeatherObservation, WeatherError>>> {
            self.responses.lock().unwrap_or_else(PoisonError::into_inner)
        }

        pub fn push_response(&self, response: Result<WeatherObservation, WeatherError>) {
            self.queue().push_back(response);
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherTransport for MockWeatherTransport {
        async fn current(&self, _city: &str) -> Result<WeatherObservation, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(response) = self.queue().pop_front() {
                return response;
            }

            self.fallback
                .clone()
                .ok_or_else(|| WeatherError::Request("no response queued".to_string()))
        }
    }
}
