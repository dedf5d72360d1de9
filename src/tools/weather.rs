//! Weather Lookup Tool
//!
//! Information Hiding:
//! - OpenWeatherMap request format hidden
//! - Credential and unit mapping handled internally
//! - Outbound call bounded by its own timeout

use super::{Tool, ToolContract, ValidatedArguments};
use crate::tool_contract;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::time::Duration;

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    name: String,
    main: WeatherMain,
}

#[derive(Debug, Deserialize)]
struct WeatherMain {
    temp: f64,
}

/// `get_current_weather`
pub struct WeatherTool {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl WeatherTool {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            timeout_secs,
        }
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn contract(&self) -> ToolContract {
        tool_contract! {
            name: "get_current_weather",
            description: "Get the current weather in a given location",
            parameters: [
                {
                    name: "location",
                    type: string,
                    description: "The city and state, e.g. San Francisco, CA",
                    required: true
                },
                {
                    name: "unit",
                    type: enum ["celsius", "fahrenheit"],
                    description: "Temperature unit, celsius when omitted",
                    required: false
                }
            ]
        }
    }

    async fn call(&self, args: ValidatedArguments) -> Result<Value> {
        let location = args.string("location")?;
        let unit = args.optional_str("unit").unwrap_or("celsius");
        let units = if unit == "fahrenheit" { "imperial" } else { "metric" };

        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("weather lookup is not configured (OPENWEATHER_API_KEY is not set)"))?;

        tracing::info!("Fetching current weather for: {}", location);

        let response = self
            .client
            .get(format!("{}/data/2.5/weather", self.base_url))
            .query(&[("q", location), ("appid", api_key), ("units", units)])
            .timeout(Duration::from_secs(self.timeout_secs))
            .send()
            .await
            .context("weather request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("weather service returned {}: {}", status, body));
        }

        let weather: WeatherResponse = response
            .json()
            .await
            .context("unexpected weather response")?;

        Ok(json!({
            "location": weather.name,
            "temperature": weather.main.temp,
            "unit": unit,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::validate;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn args(tool: &WeatherTool, raw: Value) -> ValidatedArguments {
        validate(&tool.contract(), raw.as_object().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_weather_lookup() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Paris"))
            .and(query_param("appid", "test-key"))
            .and(query_param("units", "imperial"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Paris",
                "main": {"temp": 68.5}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let tool = WeatherTool::new(mock_server.uri(), Some("test-key".to_string()), 5);
        let result = tool
            .call(args(&tool, json!({"location": "Paris", "unit": "fahrenheit"})))
            .await
            .unwrap();

        assert_eq!(
            result,
            json!({"location": "Paris", "temperature": 68.5, "unit": "fahrenheit"})
        );
    }

    #[tokio::test]
    async fn test_weather_defaults_to_celsius() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Oslo",
                "main": {"temp": -3.0}
            })))
            .mount(&mock_server)
            .await;

        let tool = WeatherTool::new(mock_server.uri(), Some("test-key".to_string()), 5);
        let result = tool.call(args(&tool, json!({"location": "Oslo"}))).await.unwrap();

        assert_eq!(result["unit"], "celsius");
        assert_eq!(result["temperature"], -3.0);
    }

    #[tokio::test]
    async fn test_weather_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("city not found"))
            .mount(&mock_server)
            .await;

        let tool = WeatherTool::new(mock_server.uri(), Some("test-key".to_string()), 5);
        let err = tool
            .call(args(&tool, json!({"location": "Atlantis"})))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_weather_without_key() {
        let tool = WeatherTool::new("http://127.0.0.1:9", None, 5);
        let err = tool
            .call(args(&tool, json!({"location": "Paris"})))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("not configured"));
    }
}
