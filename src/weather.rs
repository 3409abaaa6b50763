//! Current conditions from OpenWeatherMap.
use crate::location::Location;
use crate::options::Services;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    main: MainReadings,
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

/// The body OpenWeatherMap sends instead of a reading. `cod` is a number on
/// some endpoints and a string on others.
#[derive(Debug, Deserialize)]
pub struct OpenWeatherError {
    pub cod: serde_json::Value,
    pub message: String,
}

#[derive(Debug)]
pub enum WeatherError {
    /// An error returned while making the GET request.
    Net(reqwest::Error),
    /// OpenWeatherMap refused the request (bad key, unknown place...).
    Api(OpenWeatherError),
    /// The body could not be parsed as either a reading or an error.
    BadData(serde_json::Error),
    /// The reading had an empty `weather` list.
    NoConditions,
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    url: String,
    api_key: String,
    units: String,
}

impl WeatherClient {
    pub fn new(client: Client, services: &Services, api_key: impl Into<String>) -> Self {
        Self {
            client,
            url: services.weather_url.clone(),
            api_key: api_key.into(),
            units: services.units.clone(),
        }
    }

    pub async fn current(&self, location: Location) -> Result<WeatherSnapshot, WeatherError> {
        let response = self
            .client
            .get(format!(
                "{}?lat={}&lon={}&appid={}&units={}",
                self.url,
                location.latitude,
                location.longitude,
                urlencoding::encode(&self.api_key),
                urlencoding::encode(&self.units),
            ))
            .send()
            .await
            .map_err(WeatherError::Net)?
            .text()
            .await
            .map_err(WeatherError::Net)?;

        let reading = parse_open_weather::<CurrentWeatherResponse>(&response)?;
        let description = reading
            .weather
            .into_iter()
            .next()
            .ok_or(WeatherError::NoConditions)?
            .description;

        tracing::debug!(
            "Weather at {}, {}: {} ({description})",
            location.latitude,
            location.longitude,
            reading.main.temp
        );
        Ok(WeatherSnapshot {
            temperature: reading.main.temp,
            temperature_min: reading.main.temp_min,
            temperature_max: reading.main.temp_max,
            description,
        })
    }
}

fn parse_open_weather<T: DeserializeOwned>(data: &str) -> Result<T, WeatherError> {
    match serde_json::from_str(data) {
        Ok(data) => Ok(data),
        Err(err) => match serde_json::from_str::<OpenWeatherError>(data) {
            Ok(err) => Err(WeatherError::Api(err)),
            Err(_) => Err(WeatherError::BadData(err)),
        },
    }
}

impl std::fmt::Display for OpenWeatherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cod = match &self.cod {
            serde_json::Value::String(cod) => cod.clone(),
            cod => cod.to_string(),
        };
        f.write_fmt(format_args!("OpenWeatherMap error {cod}: {}", self.message))
    }
}
impl std::error::Error for OpenWeatherError {}

impl std::fmt::Display for WeatherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherError::Net(err) => {
                f.write_fmt(format_args!("Error sending a weather request: {err}"))
            }
            WeatherError::Api(err) => f.write_fmt(format_args!("{err}")),
            WeatherError::BadData(err) => f.write_fmt(format_args!(
                "Error parsing a response from OpenWeatherMap: {err}"
            )),
            WeatherError::NoConditions => {
                f.write_str("OpenWeatherMap sent a reading without conditions.")
            }
        }
    }
}
impl std::error::Error for WeatherError {}
