//! Maps chat requests to intents.
//!
//! The model is persisted as three files derived from the model path:
//! `nova_ai` becomes `nova_ai_model.json`, `nova_ai_words.json` and
//! `nova_ai_classes.json`.
use rand::seq::SliceRandom;
use rand::Rng;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub mod dataset;
pub mod error;
pub mod model;

pub use dataset::Dataset;
pub use error::AssistantError;
pub use model::{BagOfWords, IntentModel, ModelFiles, Prediction};

/// Intents the bot answers with its own handlers rather than with a canned
/// response from the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Time,
    ModelTraining,
    WeatherInformation,
    BotAge,
    StreamerAge,
    SetStreamerBirthday,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Intent(Intent),
    Reply(String),
    Unknown,
}

#[derive(Debug)]
pub struct Assistant<M = BagOfWords> {
    dataset: Dataset,
    model_path: PathBuf,
    model: Option<M>,
}

#[derive(Debug, Clone)]
struct ModelPaths {
    model: PathBuf,
    words: PathBuf,
    classes: PathBuf,
}

impl Intent {
    pub const ALL: [Intent; 6] = [
        Intent::Time,
        Intent::ModelTraining,
        Intent::WeatherInformation,
        Intent::BotAge,
        Intent::StreamerAge,
        Intent::SetStreamerBirthday,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Intent::Time => "time",
            Intent::ModelTraining => "model_training",
            Intent::WeatherInformation => "weather_information",
            Intent::BotAge => "bot_age",
            Intent::StreamerAge => "streamer_age",
            Intent::SetStreamerBirthday => "set_streamer_birthday",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Intent::ALL.into_iter().find(|intent| intent.tag() == tag)
    }
}

impl<M: IntentModel> Assistant<M> {
    pub fn new<P: Into<PathBuf>>(dataset: Dataset, model_path: P) -> Self {
        Self {
            dataset,
            model_path: model_path.into(),
            model: None,
        }
    }

    #[cfg(test)]
    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    pub fn train_model(&mut self) {
        self.model = Some(M::train(&self.dataset));
    }

    pub async fn load_model(&mut self) -> Result<(), AssistantError> {
        let paths = self.paths()?;
        let files = ModelFiles {
            model: read_model_file(&paths.model).await?,
            words: read_model_file(&paths.words).await?,
            classes: read_model_file(&paths.classes).await?,
        };
        let model =
            M::from_files(&files).map_err(|err| AssistantError::BadModel(paths.model, err))?;

        tracing::info!("Loaded model {}", self.model_path.display());
        self.model = Some(model);
        Ok(())
    }

    pub async fn save_model(&self) -> Result<(), AssistantError> {
        let model = self.model.as_ref().ok_or(AssistantError::NotTrained)?;
        let files = model.to_files().map_err(AssistantError::Serialize)?;
        let paths = self.paths()?;

        if let Some(parent) = paths.model.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| AssistantError::ModelIO(parent.to_path_buf(), err))?;
        }

        let mut set = tokio::task::JoinSet::new();
        for (path, contents) in [
            (paths.model, files.model),
            (paths.words, files.words),
            (paths.classes, files.classes),
        ] {
            set.spawn(async move {
                tokio::fs::write(&path, contents)
                    .await
                    .map_err(|err| AssistantError::ModelIO(path, err))
            });
        }
        let mut first_err = None;
        while let Some(join_result) = set.join_next().await {
            if let Err(err) = join_result.expect("Model write task panicked") {
                tracing::error!("{err}");
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }
        if let Some(err) = first_err {
            return Err(err);
        }

        tracing::info!("Saved model {}", self.model_path.display());
        Ok(())
    }

    /// Deletes the model files. Files that are already gone are not an error.
    pub async fn remove_model(&self) -> Result<(), AssistantError> {
        let paths = self.paths()?;
        for path in [paths.model, paths.words, paths.classes] {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => (),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => (),
                Err(err) => return Err(AssistantError::ModelIO(path, err)),
            }
        }
        Ok(())
    }

    /// Loads the saved model, or trains and saves a new one when loading
    /// fails or `retrain` is set.
    pub async fn load_or_train(&mut self, retrain: bool) -> Result<(), AssistantError> {
        if !retrain {
            match self.load_model().await {
                Ok(()) => return Ok(()),
                Err(err) => tracing::warn!("Could not load the model, training a new one: {err}"),
            }
        }
        self.train_model();
        self.save_model().await
    }

    pub fn predict(&self, text: &str) -> Vec<Prediction> {
        match &self.model {
            Some(model) => model.predict(text),
            None => {
                tracing::warn!("Prediction requested before the model was trained");
                Vec::new()
            }
        }
    }

    pub fn request<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Resolution {
        let Some(best) = self.predict(text).into_iter().next() else {
            tracing::debug!("No intent for {text:?}");
            return Resolution::Unknown;
        };
        tracing::debug!(
            "{text:?} resolved to {} ({:.2})",
            best.tag,
            best.probability
        );

        if let Some(intent) = Intent::from_tag(&best.tag) {
            return Resolution::Intent(intent);
        }
        self.dataset
            .get(&best.tag)
            .and_then(|record| record.responses.choose(rng))
            .map_or(Resolution::Unknown, |response| {
                Resolution::Reply(response.clone())
            })
    }

    fn paths(&self) -> Result<ModelPaths, AssistantError> {
        let name = self
            .model_path
            .file_name()
            .ok_or_else(|| AssistantError::BadModelPath(self.model_path.clone()))?;
        let with_suffix = |suffix: &str| {
            let mut file_name = OsString::from(name);
            file_name.push(suffix);
            self.model_path.with_file_name(file_name)
        };
        Ok(ModelPaths {
            model: with_suffix("_model.json"),
            words: with_suffix("_words.json"),
            classes: with_suffix("_classes.json"),
        })
    }
}

async fn read_model_file(path: &Path) -> Result<String, AssistantError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|err| AssistantError::ModelIO(path.to_path_buf(), err))
}
