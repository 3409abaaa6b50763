use super::error::AssistantError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub intents: Vec<IntentRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentRecord {
    pub tag: String,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub responses: Vec<String>,
}

impl Dataset {
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, AssistantError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| AssistantError::Dataset(path.to_path_buf(), err))?;
        let dataset: Dataset = serde_json::from_str(&text)
            .map_err(|err| AssistantError::BadDataset(path.to_path_buf(), err))?;

        tracing::debug!(
            "Loaded {} intents from {}",
            dataset.intents.len(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn get(&self, tag: &str) -> Option<&IntentRecord> {
        self.intents.iter().find(|intent| intent.tag == tag)
    }
}
