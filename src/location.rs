//! Where the streamer is, from their public IP.
use crate::options::PinnedLocation;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::OnceCell;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    loc: Option<String>,
}

#[derive(Debug)]
pub enum LocationError {
    /// An error returned while making the GET request.
    Net(reqwest::Error),
    /// The service answered with a non-success status.
    Status(u16, String),
    /// The body was not the expected JSON.
    BadData(serde_json::Error),
    /// The body had no usable `loc` field.
    BadCoordinates(Option<String>),
}

/// Resolves the location once and remembers it for the rest of the process.
#[derive(Debug)]
pub struct Locator {
    client: Client,
    url: String,
    cached: OnceCell<Location>,
}

impl Location {
    /// Parses ipinfo's `"lat,lon"` pair.
    pub fn from_loc(loc: &str) -> Option<Self> {
        let (latitude, longitude) = loc.split_once(',')?;
        Some(Self {
            latitude: latitude.trim().parse().ok()?,
            longitude: longitude.trim().parse().ok()?,
        })
    }
}

impl From<PinnedLocation> for Location {
    fn from(value: PinnedLocation) -> Self {
        Self {
            latitude: value.latitude,
            longitude: value.longitude,
        }
    }
}

impl Locator {
    pub fn new(client: Client, url: impl Into<String>, pinned: Option<PinnedLocation>) -> Self {
        Self {
            client,
            url: url.into(),
            cached: match pinned {
                Some(pinned) => OnceCell::new_with(Some(pinned.into())),
                None => OnceCell::new(),
            },
        }
    }

    pub async fn location(&self) -> Result<Location, LocationError> {
        self.cached
            .get_or_try_init(|| locate(&self.client, &self.url))
            .await
            .copied()
    }
}

pub async fn locate(client: &Client, url: &str) -> Result<Location, LocationError> {
    let response = client.get(url).send().await.map_err(LocationError::Net)?;
    let status = response.status();
    let body = response.text().await.map_err(LocationError::Net)?;
    if !status.is_success() {
        return Err(LocationError::Status(status.as_u16(), body));
    }

    let info: IpInfoResponse = serde_json::from_str(&body).map_err(LocationError::BadData)?;
    let location = info
        .loc
        .as_deref()
        .and_then(Location::from_loc)
        .ok_or(LocationError::BadCoordinates(info.loc))?;

    tracing::info!(
        "Located the streamer at {}, {}",
        location.latitude,
        location.longitude
    );
    Ok(location)
}

impl std::fmt::Display for LocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationError::Net(err) => {
                f.write_fmt(format_args!("Error sending a geolocation request: {err}"))
            }
            LocationError::Status(status, body) => f.write_fmt(format_args!(
                "Geolocation service answered {status}: {body}"
            )),
            LocationError::BadData(err) => f.write_fmt(format_args!(
                "Error parsing a response from the geolocation service: {err}"
            )),
            LocationError::BadCoordinates(loc) => f.write_fmt(format_args!(
                "Geolocation service gave no usable coordinates: {loc:?}"
            )),
        }
    }
}
impl std::error::Error for LocationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_from_loc() {
        assert_eq!(
            Location::from_loc("47.6062,-122.3321"),
            Some(Location {
                latitude: 47.6062,
                longitude: -122.3321
            })
        );
        assert_eq!(Location::from_loc("47.6"), None);
        assert_eq!(Location::from_loc("north,south"), None);
    }

    #[tokio::test]
    async fn test_locate_reads_loc_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ip": "203.0.113.7",
                "city": "Lyon",
                "loc": "45.7485,4.8467",
                "timezone": "Europe/Paris"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let locator = Locator::new(Client::new(), format!("{}/json", server.uri()), None);
        let first = locator.location().await.unwrap();
        let second = locator.location().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.latitude, 45.7485);
        assert_eq!(first.longitude, 4.8467);
    }

    #[tokio::test]
    async fn test_pinned_location_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let locator = Locator::new(
            Client::new(),
            server.uri(),
            Some(PinnedLocation {
                latitude: 1.0,
                longitude: 2.0,
            }),
        );
        assert_eq!(
            locator.location().await.unwrap(),
            Location {
                latitude: 1.0,
                longitude: 2.0
            }
        );
    }

    #[tokio::test]
    async fn test_locate_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/limited"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/bogon"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"bogon": true})),
            )
            .mount(&server)
            .await;

        let client = Client::new();
        assert!(matches!(
            locate(&client, &format!("{}/limited", server.uri())).await,
            Err(LocationError::Status(429, _))
        ));
        assert!(matches!(
            locate(&client, &format!("{}/bogon", server.uri())).await,
            Err(LocationError::BadCoordinates(None))
        ));
    }
}
