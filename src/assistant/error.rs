use std::path::PathBuf;

#[derive(Debug)]
pub enum AssistantError {
    /// The intents dataset could not be read.
    Dataset(PathBuf, std::io::Error),
    /// The intents dataset is not valid JSON in the `{"intents": [...]}` shape.
    BadDataset(PathBuf, serde_json::Error),
    /// A model file could not be read, written or removed.
    ModelIO(PathBuf, std::io::Error),
    /// A model file held data the model could not be rebuilt from.
    BadModel(PathBuf, serde_json::Error),
    /// The model could not be serialized.
    Serialize(serde_json::Error),
    /// The model path has no file name to derive the model files from.
    BadModelPath(PathBuf),
    /// `save_model` was called before `train_model` or `load_model`.
    NotTrained,
}

impl std::fmt::Display for AssistantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssistantError::Dataset(path, err) => f.write_fmt(format_args!(
                "Error reading the intents dataset {}: {err}",
                path.display()
            )),
            AssistantError::BadDataset(path, err) => f.write_fmt(format_args!(
                "Error parsing the intents dataset {}: {err}",
                path.display()
            )),
            AssistantError::ModelIO(path, err) => f.write_fmt(format_args!(
                "Error accessing the model file {}: {err}",
                path.display()
            )),
            AssistantError::BadModel(path, err) => f.write_fmt(format_args!(
                "Error parsing the model file {}: {err}",
                path.display()
            )),
            AssistantError::Serialize(err) => {
                f.write_fmt(format_args!("Error serializing the model: {err}"))
            }
            AssistantError::BadModelPath(path) => f.write_fmt(format_args!(
                "{:?} cannot be used as a model path.",
                path.display()
            )),
            AssistantError::NotTrained => f.write_str("The model has not been trained or loaded."),
        }
    }
}
impl std::error::Error for AssistantError {}
