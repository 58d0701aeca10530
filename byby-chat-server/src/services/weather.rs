use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::{Secret, WeatherSettings};
use crate::services::ServiceError;

/// Answer used whenever the current weather cannot be obtained.
pub const WEATHER_FALLBACK: &str = "Sorry, the weather service is unavailable right now.";

/// OpenWeatherMap current-weather client.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    endpoint: String,
    api_key: Option<Secret>,
}

impl WeatherClient {
    pub fn new(client: Client, settings: &WeatherSettings) -> Self {
        Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
        }
    }

    /// One sentence describing the weather in `city`, or [`WEATHER_FALLBACK`].
    pub async fn current_summary(&self, city: &str) -> String {
        match self.fetch(city).await {
            Ok(Some(body)) => match summarize(city, &body) {
                Some(summary) => {
                    info!(city, "weather fetched");
                    summary
                }
                None => {
                    warn!(city, cod = %body["cod"], "weather service reported failure");
                    WEATHER_FALLBACK.to_owned()
                }
            },
            Ok(None) => {
                warn!("BYBY_WEATHER_API_KEY not set, using weather fallback");
                WEATHER_FALLBACK.to_owned()
            }
            Err(e) => {
                warn!(city, error = %e, "weather request failed");
                WEATHER_FALLBACK.to_owned()
            }
        }
    }

    /// The raw response document. The HTTP status is not checked here; the
    /// service reports failures in the body's `cod` field.
    async fn fetch(&self, city: &str) -> Result<Option<Value>, ServiceError> {
        let Some(api_key) = &self.api_key else {
            return Ok(None);
        };
        let url = Url::parse_with_params(
            &self.endpoint,
            [("q", city), ("appid", api_key.expose()), ("units", "metric")],
        )
        .map_err(|e| ServiceError::Malformed {
            service: "weather",
            message: format!("invalid endpoint: {e}"),
        })?;
        let body = self.client.get(url).send().await?.json::<Value>().await?;
        Ok(Some(body))
    }
}

/// Render a successful response; `None` unless `cod` is 200.
///
/// The service sends `cod` as a number on success and as a string on
/// errors, so both forms are accepted.
pub fn summarize(city: &str, body: &Value) -> Option<String> {
    let ok = match &body["cod"] {
        Value::Number(n) => n.as_u64() == Some(200),
        Value::String(s) => s == "200",
        _ => false,
    };
    if !ok {
        return None;
    }
    let description = body["weather"][0]["description"].as_str()?;
    let temperature = body["main"]["temp"].as_f64()?;
    Some(format!(
        "The weather in {city} is {description} with a temperature of {temperature:.1}°C."
    ))
}
