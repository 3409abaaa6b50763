//! Intent classification models.
use super::dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Predictions under this score are dropped.
pub const THRESHOLD: f64 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub tag: String,
    pub probability: f64,
}

/// Serialized form of a trained model, one string per file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub model: String,
    pub words: String,
    pub classes: String,
}

pub trait IntentModel: Sized {
    fn train(dataset: &Dataset) -> Self;
    /// Every class scoring at least [`THRESHOLD`], best first.
    fn predict(&self, text: &str) -> Vec<Prediction>;
    fn to_files(&self) -> Result<ModelFiles, serde_json::Error>;
    fn from_files(files: &ModelFiles) -> Result<Self, serde_json::Error>;
}

/// Scores a request against every training pattern by the cosine overlap of
/// their word sets, and keeps the best pattern per class.
///
/// Words are weighted by how few classes use them, so filler shared by many
/// intents ("the", "is", "me") counts for less than "weather" or "bot".
/// Words outside the vocabulary are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct BagOfWords {
    words: Vec<String>,
    classes: Vec<String>,
    patterns: Vec<PatternVector>,
    /// Per word in `words`, rebuilt from `patterns` rather than stored.
    weights: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PatternVector {
    class: usize,
    /// Sorted indices into `words`.
    words: Vec<usize>,
}

impl BagOfWords {
    fn word_index(&self, word: &str) -> Option<usize> {
        self.words
            .binary_search_by(|probe| probe.as_str().cmp(word))
            .ok()
    }

    /// `ln(1 + classes / df)` where `df` counts the classes using the word.
    fn weigh(&mut self) {
        let mut seen: BTreeSet<(usize, usize)> = BTreeSet::new();
        let mut df = vec![0_usize; self.words.len()];
        for pattern in &self.patterns {
            for &word in &pattern.words {
                if seen.insert((pattern.class, word)) {
                    df[word] += 1;
                }
            }
        }
        let classes = self.classes.len() as f64;
        self.weights = df
            .into_iter()
            .map(|df| (1.0 + classes / df.max(1) as f64).ln())
            .collect();
    }

    fn norm<'a>(&self, words: impl IntoIterator<Item = &'a usize>) -> f64 {
        words
            .into_iter()
            .map(|&word| self.weights[word].powi(2))
            .sum()
    }
}

impl IntentModel for BagOfWords {
    fn train(dataset: &Dataset) -> Self {
        let words: Vec<String> = dataset
            .intents
            .iter()
            .flat_map(|intent| intent.patterns.iter())
            .flat_map(|pattern| tokenize(pattern))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut model = BagOfWords {
            words,
            classes: dataset
                .intents
                .iter()
                .map(|intent| intent.tag.clone())
                .collect(),
            patterns: Vec::new(),
            weights: Vec::new(),
        };

        let mut patterns = Vec::new();
        for (class, intent) in dataset.intents.iter().enumerate() {
            for pattern in &intent.patterns {
                let words: BTreeSet<usize> = tokenize(pattern)
                    .iter()
                    .filter_map(|word| model.word_index(word))
                    .collect();
                if !words.is_empty() {
                    patterns.push(PatternVector {
                        class,
                        words: words.into_iter().collect(),
                    });
                }
            }
        }
        model.patterns = patterns;
        model.weigh();

        tracing::info!(
            "Trained on {} patterns ({} words, {} classes)",
            model.patterns.len(),
            model.words.len(),
            model.classes.len()
        );
        model
    }

    fn predict(&self, text: &str) -> Vec<Prediction> {
        let known: BTreeSet<usize> = tokenize(text)
            .iter()
            .filter_map(|word| self.word_index(word))
            .collect();
        let known_norm = self.norm(&known);
        if known_norm <= 0.0 {
            return Vec::new();
        }

        let mut best = vec![0.0_f64; self.classes.len()];
        for pattern in &self.patterns {
            let shared = self.norm(pattern.words.iter().filter(|word| known.contains(*word)));
            let pattern_norm = self.norm(&pattern.words);
            if pattern_norm <= 0.0 {
                continue;
            }
            let score = shared / (known_norm * pattern_norm).sqrt();
            if let Some(class_best) = best.get_mut(pattern.class) {
                *class_best = class_best.max(score);
            }
        }

        let mut predictions: Vec<Prediction> = best
            .into_iter()
            .enumerate()
            .filter(|(_, score)| *score >= THRESHOLD)
            .map(|(class, probability)| Prediction {
                tag: self.classes[class].clone(),
                probability,
            })
            .collect();
        predictions.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        predictions
    }

    fn to_files(&self) -> Result<ModelFiles, serde_json::Error> {
        Ok(ModelFiles {
            model: serde_json::to_string(&self.patterns)?,
            words: serde_json::to_string(&self.words)?,
            classes: serde_json::to_string(&self.classes)?,
        })
    }

    fn from_files(files: &ModelFiles) -> Result<Self, serde_json::Error> {
        let mut words: Vec<String> = serde_json::from_str(&files.words)?;
        words.sort_unstable();
        words.dedup();
        let classes: Vec<String> = serde_json::from_str(&files.classes)?;
        let patterns: Vec<PatternVector> = serde_json::from_str(&files.model)?;

        if let Some(bad) = patterns.iter().find(|pattern| {
            pattern.class >= classes.len() || pattern.words.iter().any(|&w| w >= words.len())
        }) {
            return Err(serde::de::Error::custom(format!(
                "pattern {bad:?} points outside the vocabulary or classes"
            )));
        }

        let mut model = Self {
            words,
            classes,
            patterns,
            weights: Vec::new(),
        };
        model.weigh();
        Ok(model)
    }
}

/// Lowercases, splits on anything that is not a letter or digit, drops
/// single letters and folds plain plurals (`days` -> `day`).
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|chr: char| !chr.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .filter(|word| word.chars().count() > 1 || word.chars().all(|chr| chr.is_ascii_digit()))
        .map(|word| {
            let folds = word.len() > 3
                && word.ends_with('s')
                && !["ss", "us", "is"].iter().any(|end| word.ends_with(end));
            if folds {
                String::from(&word[..word.len() - 1])
            } else {
                word
            }
        })
        .collect()
}
