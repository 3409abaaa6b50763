//! Values read from the process environment (and `.env`).
use chrono::NaiveDate;
use std::path::Path;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Flat key-value configuration. Every field is optional; the features that
/// need a missing value degrade to a fallback reply instead.
#[derive(Debug, Clone, Default)]
pub struct BotConfig {
    pub open_weather_api_key: Option<String>,
    pub bot_creation: Option<NaiveDate>,
    pub streamer_birthday: Option<NaiveDate>,
    pub twitch_bot_nickname: Option<String>,
    pub twitch_bot_token: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    EnvFile(dotenvy::Error),
    BadDate {
        variable: &'static str,
        value: String,
        err: chrono::ParseError,
    },
}

impl BotConfig {
    /// Loads `.env` (or `env_file`) into the environment, then reads the
    /// configuration from it.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(ConfigError::EnvFile)?;
            }
            None => match dotenvy::dotenv() {
                Ok(_) => (),
                Err(err) if err.not_found() => (),
                Err(err) => return Err(ConfigError::EnvFile(err)),
            },
        }
        BotConfig::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let date = |key: &'static str| -> Result<Option<NaiveDate>, ConfigError> {
            var(key)
                .map(|value| {
                    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|err| {
                        ConfigError::BadDate {
                            variable: key,
                            value,
                            err,
                        }
                    })
                })
                .transpose()
        };

        Ok(Self {
            open_weather_api_key: var("OPEN_WEATHER_API_KEY"),
            bot_creation: date("BOT_CREATION")?,
            streamer_birthday: date("STREAMER_BIRTHDAY")?,
            twitch_bot_nickname: var("TWITCH_BOT_NICKNAME"),
            twitch_bot_token: var("TWITCH_BOT_TOKEN"),
        })
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EnvFile(err) => {
                f.write_fmt(format_args!("Error loading the environment file: {err}"))
            }
            ConfigError::BadDate {
                variable,
                value,
                err,
            } => f.write_fmt(format_args!(
                "{variable} must be a YYYY-MM-DD date, got {value:?}: {err}"
            )),
        }
    }
}
impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_reads_all_variables() {
        let config = BotConfig::from_lookup(lookup(&[
            ("OPEN_WEATHER_API_KEY", "abc"),
            ("BOT_CREATION", "2023-04-01"),
            ("STREAMER_BIRTHDAY", "1995-07-20"),
            ("TWITCH_BOT_NICKNAME", "nova_bot"),
            ("TWITCH_BOT_TOKEN", "oauth:xyz"),
        ]))
        .unwrap();

        assert_eq!(config.open_weather_api_key.as_deref(), Some("abc"));
        assert_eq!(config.bot_creation, NaiveDate::from_ymd_opt(2023, 4, 1));
        assert_eq!(
            config.streamer_birthday,
            NaiveDate::from_ymd_opt(1995, 7, 20)
        );
        assert_eq!(config.twitch_bot_nickname.as_deref(), Some("nova_bot"));
        assert_eq!(config.twitch_bot_token.as_deref(), Some("oauth:xyz"));
    }

    #[test]
    fn test_missing_and_blank_variables_are_none() {
        let config = BotConfig::from_lookup(lookup(&[("OPEN_WEATHER_API_KEY", "  ")])).unwrap();
        assert!(config.open_weather_api_key.is_none());
        assert!(config.bot_creation.is_none());
        assert!(config.streamer_birthday.is_none());
    }

    #[test]
    fn test_malformed_date_is_an_error() {
        let err = BotConfig::from_lookup(lookup(&[("BOT_CREATION", "01/04/2023")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::BadDate {
                variable: "BOT_CREATION",
                ..
            }
        ));
    }
}
