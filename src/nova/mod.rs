//! Nova's skills: one handler per intent, each answering with a random
//! sentence from its template set.
use crate::assistant::{Assistant, Intent, Resolution};
use crate::bot::interface::Speaker;
use crate::config::{BotConfig, DATE_FORMAT};
use crate::dates;
use crate::location::Locator;
use crate::options::{PinnedLocation, Services};
use crate::template::Vars;
use crate::weather::{WeatherClient, WeatherSnapshot};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub mod error;
mod replies;

use error::NovaError;

#[derive(Debug)]
pub struct NovaData {
    pub config: BotConfig,
    pub assistant: Assistant,
    pub client: reqwest::Client,
    pub services: Services,
    pub location: Option<PinnedLocation>,
}

#[derive(Debug)]
pub struct Nova {
    assistant: Assistant,
    locator: Locator,
    weather: Option<WeatherClient>,
    bot_creation: Option<NaiveDate>,
    streamer_birthday: Option<NaiveDate>,
    clock: fn() -> NaiveDateTime,
    rng: StdRng,
}

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

impl Nova {
    pub fn new(data: NovaData) -> Self {
        let weather = data
            .config
            .open_weather_api_key
            .as_ref()
            .map(|key| WeatherClient::new(data.client.clone(), &data.services, key.clone()));
        if weather.is_none() {
            tracing::warn!("OPEN_WEATHER_API_KEY is not set, weather requests will be declined");
        }

        Self {
            assistant: data.assistant,
            locator: Locator::new(
                data.client,
                data.services.geolocation_url.clone(),
                data.location,
            ),
            weather,
            bot_creation: data.config.bot_creation,
            streamer_birthday: data.config.streamer_birthday,
            clock: local_now,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn streamer_birthday(&self) -> Option<NaiveDate> {
        self.streamer_birthday
    }

    /// Answers one request, already stripped of the chat trigger.
    pub async fn respond(
        &mut self,
        request: &str,
        speaker: &mut impl Speaker,
    ) -> Result<(), NovaError> {
        match self.assistant.request(request, &mut self.rng) {
            Resolution::Intent(intent) => self.handle(intent, request, speaker).await,
            Resolution::Reply(reply) => {
                speaker.speak(&reply);
                Ok(())
            }
            Resolution::Unknown => {
                speaker.speak(replies::UNKNOWN);
                Ok(())
            }
        }
    }

    pub async fn handle(
        &mut self,
        intent: Intent,
        request: &str,
        speaker: &mut impl Speaker,
    ) -> Result<(), NovaError> {
        tracing::debug!("Handling {} for {request:?}", intent.tag());
        let reply = match intent {
            Intent::Time => self.time()?,
            Intent::WeatherInformation => self.weather_information().await?,
            Intent::BotAge => self.bot_age()?,
            Intent::StreamerAge => self.streamer_age()?,
            Intent::SetStreamerBirthday => self.set_streamer_birthday(request)?,
            Intent::ModelTraining => {
                speaker.speak(replies::TRAINING_STARTED);
                self.model_train().await?;
                String::from(replies::TRAINING_DONE)
            }
        };
        speaker.speak(&reply);
        Ok(())
    }

    fn time(&mut self) -> Result<String, NovaError> {
        let now = (self.clock)().format("%H:%M").to_string();
        Ok(replies::TIME.render(&mut self.rng, &Vars::new().with("time", now))?)
    }

    async fn weather_information(&mut self) -> Result<String, NovaError> {
        let snapshot = match self.fetch_weather().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!("Could not get the weather: {err}");
                return Ok(String::from(replies::NO_WEATHER));
            }
        };
        Ok(replies::WEATHER.render(
            &mut self.rng,
            &Vars::new()
                .with("temperature", snapshot.temperature)
                .with("temperature_min", snapshot.temperature_min)
                .with("temperature_max", snapshot.temperature_max)
                .with("weather_description", snapshot.description),
        )?)
    }

    async fn fetch_weather(
        &self,
    ) -> Result<WeatherSnapshot, Box<dyn std::error::Error + Send + Sync>> {
        let weather = self
            .weather
            .as_ref()
            .ok_or("OPEN_WEATHER_API_KEY is not set")?;
        let location = self.locator.location().await?;
        Ok(weather.current(location).await?)
    }

    fn bot_age(&mut self) -> Result<String, NovaError> {
        let Some(created) = self.bot_creation else {
            return Ok(String::from(replies::NO_CREATION_DATE));
        };
        let age = dates::age_since(created, (self.clock)());
        Ok(replies::BOT_AGE.render(
            &mut self.rng,
            &Vars::new()
                .with("created", created.format(DATE_FORMAT))
                .with("age", age),
        )?)
    }

    fn streamer_age(&mut self) -> Result<String, NovaError> {
        let Some(birthday) = self.streamer_birthday else {
            return Ok(String::from(replies::NO_BIRTHDAY));
        };
        let age = dates::years_since(birthday, (self.clock)().date());
        Ok(replies::STREAMER_AGE.render(
            &mut self.rng,
            &Vars::new()
                .with("age", age)
                .with("year", birthday.year())
                .with("birthday", birthday.format(DATE_FORMAT)),
        )?)
    }

    fn set_streamer_birthday(&mut self, request: &str) -> Result<String, NovaError> {
        let Some(birthday) = dates::find_dates(request).into_iter().next() else {
            return Ok(String::from(replies::BAD_BIRTHDAY));
        };
        tracing::info!("Streamer birthday set to {birthday}");
        self.streamer_birthday = Some(birthday);
        Ok(replies::BIRTHDAY_SET.render(
            &mut self.rng,
            &Vars::new().with("birthday", birthday.format(DATE_FORMAT)),
        )?)
    }

    async fn model_train(&mut self) -> Result<(), NovaError> {
        self.assistant.remove_model().await?;
        self.assistant.train_model();
        self.assistant.save_model().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::Dataset;
    use crate::bot::interface::Transcript;
    use crate::template::Templates;
    use std::path::Path;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 5)
            .unwrap()
            .and_hms_opt(13, 30, 0)
            .unwrap()
    }

    async fn nova(config: BotConfig, services: Services, model_path: &Path) -> Nova {
        let dataset =
            Dataset::load(Path::new(env!("CARGO_MANIFEST_DIR")).join("datasets/intents.json"))
                .await
                .unwrap();
        let mut assistant: Assistant = Assistant::new(dataset, model_path);
        assistant.train_model();
        let mut nova = Nova::new(NovaData {
            config,
            assistant,
            client: reqwest::Client::new(),
            services,
            location: None,
        });
        nova.clock = fixed_now;
        nova.rng = StdRng::seed_from_u64(3);
        nova
    }

    fn is_rendering_of(templates: &Templates, vars: &Vars, text: &str) -> bool {
        templates
            .iter()
            .any(|template| template.render(vars).as_deref() == Ok(text))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_time() {
        let dir = tempfile::tempdir().unwrap();
        let mut nova = nova(BotConfig::default(), Services::default(), &dir.path().join("m")).await;
        let mut transcript = Transcript::default();
        nova.handle(Intent::Time, "what time is it", &mut transcript)
            .await
            .unwrap();
        assert!(is_rendering_of(
            &replies::TIME,
            &Vars::new().with("time", "13:30"),
            &transcript.0[0]
        ));
    }

    #[tokio::test]
    async fn test_bot_age() {
        let dir = tempfile::tempdir().unwrap();
        let config = BotConfig {
            bot_creation: Some(date(2023, 1, 1)),
            ..BotConfig::default()
        };
        let mut nova = nova(config, Services::default(), &dir.path().join("m")).await;
        let mut transcript = Transcript::default();
        nova.handle(Intent::BotAge, "how old are you", &mut transcript)
            .await
            .unwrap();
        assert!(is_rendering_of(
            &replies::BOT_AGE,
            &Vars::new()
                .with("created", "2023-01-01")
                .with("age", "1 years, 1 months, 10 days and 13 hours"),
            &transcript.0[0]
        ));

        nova.bot_creation = None;
        nova.handle(Intent::BotAge, "how old are you", &mut transcript)
            .await
            .unwrap();
        assert_eq!(transcript.0[1], replies::NO_CREATION_DATE);
    }

    #[tokio::test]
    async fn test_streamer_birthday_then_age() {
        let dir = tempfile::tempdir().unwrap();
        let mut nova = nova(BotConfig::default(), Services::default(), &dir.path().join("m")).await;
        let mut transcript = Transcript::default();

        nova.handle(Intent::StreamerAge, "how old is the streamer", &mut transcript)
            .await
            .unwrap();
        assert_eq!(transcript.0[0], replies::NO_BIRTHDAY);

        nova.handle(
            Intent::SetStreamerBirthday,
            "the streamer was born on sometime",
            &mut transcript,
        )
        .await
        .unwrap();
        assert_eq!(transcript.0[1], replies::BAD_BIRTHDAY);
        assert_eq!(nova.streamer_birthday(), None);

        nova.handle(
            Intent::SetStreamerBirthday,
            "set the streamer's birthday to Feb 10, 1994 please",
            &mut transcript,
        )
        .await
        .unwrap();
        assert_eq!(nova.streamer_birthday(), Some(date(1994, 2, 10)));
        assert!(is_rendering_of(
            &replies::BIRTHDAY_SET,
            &Vars::new().with("birthday", "1994-02-10"),
            &transcript.0[2]
        ));

        nova.handle(Intent::StreamerAge, "how old is the streamer", &mut transcript)
            .await
            .unwrap();
        // 10952 days to 2024-02-05
        assert!(is_rendering_of(
            &replies::STREAMER_AGE,
            &Vars::new()
                .with("age", 30)
                .with("year", 1994)
                .with("birthday", "1994-02-10"),
            &transcript.0[3]
        ));
    }

    #[tokio::test]
    async fn test_startup_birthday_is_answered_until_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let config = BotConfig {
            streamer_birthday: Some(date(1990, 7, 4)),
            ..BotConfig::default()
        };
        let mut nova = nova(config, Services::default(), &dir.path().join("m")).await;
        let mut transcript = Transcript::default();

        nova.respond("How old is the streamer?", &mut transcript)
            .await
            .unwrap();
        // 12269 days to 2024-02-05
        assert!(is_rendering_of(
            &replies::STREAMER_AGE,
            &Vars::new()
                .with("age", 33)
                .with("year", 1990)
                .with("birthday", "1990-07-04"),
            &transcript.0[0]
        ));

        nova.respond("the streamer's birthday is 13/01/2000", &mut transcript)
            .await
            .unwrap();
        assert_eq!(nova.streamer_birthday(), Some(date(2000, 1, 13)));

        nova.respond("How old is the streamer?", &mut transcript)
            .await
            .unwrap();
        assert!(is_rendering_of(
            &replies::STREAMER_AGE,
            &Vars::new()
                .with("age", 24)
                .with("year", 2000)
                .with("birthday", "2000-01-13"),
            &transcript.0[2]
        ));
        assert_ne!(transcript.0[0], transcript.0[2]);
    }

    #[tokio::test]
    async fn test_weather() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ip"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"loc": "10.5,20.25"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "weather": [{"description": "scattered clouds"}],
                "main": {"temp": 18.5, "temp_min": 16.0, "temp_max": 21.0}
            })))
            .expect(2)
            .mount(&server)
            .await;

        let services = Services {
            geolocation_url: format!("{}/ip", server.uri()),
            weather_url: format!("{}/weather", server.uri()),
            ..Services::default()
        };
        let config = BotConfig {
            open_weather_api_key: Some(String::from("key")),
            ..BotConfig::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let mut nova = nova(config, services, &dir.path().join("m")).await;
        let mut transcript = Transcript::default();
        for _ in 0..2 {
            nova.handle(Intent::WeatherInformation, "weather?", &mut transcript)
                .await
                .unwrap();
        }

        let vars = Vars::new()
            .with("temperature", 18.5)
            .with("temperature_min", 16)
            .with("temperature_max", 21)
            .with("weather_description", "scattered clouds");
        for reply in &transcript.0 {
            assert!(is_rendering_of(&replies::WEATHER, &vars, reply), "{reply}");
        }
    }

    #[tokio::test]
    async fn test_weather_degrades_without_key_or_service() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let services = Services {
            geolocation_url: server.uri(),
            weather_url: server.uri(),
            ..Services::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let mut transcript = Transcript::default();

        let mut keyless = nova(BotConfig::default(), services.clone(), &dir.path().join("m")).await;
        keyless
            .handle(Intent::WeatherInformation, "weather?", &mut transcript)
            .await
            .unwrap();

        let config = BotConfig {
            open_weather_api_key: Some(String::from("key")),
            ..BotConfig::default()
        };
        let mut unreachable = nova(config, services, &dir.path().join("m")).await;
        unreachable
            .handle(Intent::WeatherInformation, "weather?", &mut transcript)
            .await
            .unwrap();

        assert_eq!(transcript.0, [replies::NO_WEATHER, replies::NO_WEATHER]);
    }

    #[tokio::test]
    async fn test_model_training_rewrites_files() {
        let dir = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("nova_ai");
        std::fs::write(dir.path().join("nova_ai_model.json"), "stale").unwrap();

        let mut nova = nova(BotConfig::default(), Services::default(), &model_path).await;
        let mut transcript = Transcript::default();
        nova.handle(Intent::ModelTraining, "retrain yourself", &mut transcript)
            .await
            .unwrap();

        assert_eq!(
            transcript.0,
            [replies::TRAINING_STARTED, replies::TRAINING_DONE]
        );
        let model = std::fs::read_to_string(dir.path().join("nova_ai_model.json")).unwrap();
        assert_ne!(model, "stale");
        assert!(dir.path().join("nova_ai_words.json").exists());
        assert!(dir.path().join("nova_ai_classes.json").exists());
    }

    #[tokio::test]
    async fn test_respond_routes_through_the_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let mut nova = nova(BotConfig::default(), Services::default(), &dir.path().join("m")).await;
        let mut transcript = Transcript::default();

        nova.respond("What time is it?", &mut transcript).await.unwrap();
        assert!(is_rendering_of(
            &replies::TIME,
            &Vars::new().with("time", "13:30"),
            &transcript.0[0]
        ));

        nova.respond("My birthday is 1990-07-04", &mut transcript)
            .await
            .unwrap();
        assert_eq!(nova.streamer_birthday(), Some(date(1990, 7, 4)));

        nova.respond("xyzzy plugh", &mut transcript).await.unwrap();
        assert_eq!(transcript.0.last().unwrap(), replies::UNKNOWN);
    }
}
