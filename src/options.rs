use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Options {
    pub nova: Nova,
    pub services: Services,
    pub location: Option<PinnedLocation>,
    pub exec: Exec,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Nova {
    pub trigger: String,
    pub dataset: PathBuf,
    pub model: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Services {
    pub geolocation_url: String,
    pub weather_url: String,
    pub units: String,
    pub timeout_secs: u64,
}

/// Fixed coordinates that replace the IP geolocation lookup.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PinnedLocation {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Exec {
    pub debug: bool,
}

#[derive(Debug)]
pub enum OptionsError {
    IO(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
}

impl Options {
    /// Reads options from `path`. A missing file at the default location is
    /// not an error; an explicitly requested one is.
    pub async fn load(path: Option<&Path>) -> Result<Self, OptionsError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Options::default_path() {
                Some(path) => (path, false),
                None => return Ok(Options::default()),
            },
        };

        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Options::default())
            }
            Err(err) => return Err(OptionsError::IO(path, err)),
        };
        Options::parse(&text).map_err(|err| OptionsError::Parse(path, err))
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Installs the global log subscriber. `RUST_LOG` wins over `exec.debug`.
    pub fn init_logging(&self) {
        let filter = if self.exec.debug { "nova=debug" } else { "nova=info" };
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
            .init();
    }

    fn default_path() -> Option<PathBuf> {
        home::home_dir().map(|home| home.join(".nova").join("options.toml"))
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            nova: Nova::default(),
            services: Services::default(),
            location: None,
            exec: Exec::default(),
        }
    }
}
impl Default for Nova {
    fn default() -> Self {
        Self {
            trigger: String::from("!nova"),
            dataset: PathBuf::from("./datasets/intents.json"),
            model: PathBuf::from("./models/nova_ai"),
        }
    }
}
impl Default for Services {
    fn default() -> Self {
        Self {
            geolocation_url: String::from("https://ipinfo.io/json"),
            weather_url: String::from("https://api.openweathermap.org/data/2.5/weather"),
            units: String::from("metric"),
            timeout_secs: 10,
        }
    }
}
impl Default for Exec {
    fn default() -> Self {
        Self { debug: false }
    }
}

impl std::fmt::Display for OptionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionsError::IO(path, err) => f.write_fmt(format_args!(
                "Error reading the options file {}: {err}",
                path.display()
            )),
            OptionsError::Parse(path, err) => f.write_fmt(format_args!(
                "Error parsing the options file {}: {err}",
                path.display()
            )),
        }
    }
}
impl std::error::Error for OptionsError {}
