//! Phoneme recognition backends.
//!
//! This module provides a trait abstraction over the staged-corpus
//! recognition steps and the Persephone implementation.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::BufRead;
use std::path::{Path, PathBuf};

mod persephone;

pub use persephone::PersephoneRecognizer;

/// One recognized clip: its staged prefix and the raw phoneme string.
#[derive(Debug, Clone, PartialEq)]
pub struct Hypothesis {
    pub prefix: String,
    pub text: String,
}

/// What a recognition backend needs to know about the staged corpus.
#[derive(Debug, Clone)]
pub struct RecognitionRequest {
    /// Corpus directory holding the staged clips.
    pub corpus_dir: PathBuf,
    /// Feature type the model was trained with (e.g. "fbank").
    pub feat_type: String,
    /// Label type the model was trained with (e.g. "phonemes").
    pub label_type: String,
}

/// A phoneme recognition backend.
///
/// The two steps are split because the caller must mirror the extracted
/// feature files into `feat/` between them. Only used generically, so the
/// auto trait bounds of the returned futures are left to the impls.
#[allow(async_fn_in_trait)]
pub trait Recognizer {
    /// Extract input features for every clip in `feat/untranscribed/`.
    async fn extract_features(&mut self, request: &RecognitionRequest) -> Result<()>;

    /// Transcribe the staged clips, returning one hypothesis per clip.
    async fn recognize(&mut self, request: &RecognitionRequest) -> Result<Vec<Hypothesis>>;
}

static MODEL_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(num_train|batch_size|num_layers|hidden_size)=(\d+)").unwrap());

/// Corpus and network hyperparameters recorded when the model was trained.
///
/// Persephone writes these into `model_description.txt` in the experiment
/// directory; the same values must be used to rebuild the model for
/// transcription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelDescription {
    pub num_train: u32,
    pub batch_size: u32,
    pub num_layers: u32,
    pub hidden_size: u32,
}

impl ModelDescription {
    /// Load from `exp_dir/model_description.txt`.
    pub fn load(exp_dir: &Path) -> Result<Self> {
        let path = exp_dir.join("model_description.txt");
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read model description: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse a model description document.
    pub fn parse(content: &str) -> Result<Self> {
        let mut num_train = None;
        let mut batch_size = None;
        let mut num_layers = None;
        let mut hidden_size = None;

        for caps in MODEL_PARAM.captures_iter(content) {
            let value: u32 = caps[2]
                .parse()
                .with_context(|| format!("Invalid model parameter value: {}", &caps[2]))?;
            match &caps[1] {
                "num_train" => num_train = Some(value),
                "batch_size" => batch_size = Some(value),
                "num_layers" => num_layers = Some(value),
                "hidden_size" => hidden_size = Some(value),
                _ => unreachable!("pattern only captures known names"),
            }
        }

        Ok(Self {
            num_train: num_train.context("Model description is missing num_train")?,
            batch_size: batch_size.context("Model description is missing batch_size")?,
            num_layers: num_layers.context("Model description is missing num_layers")?,
            hidden_size: hidden_size.context("Model description is missing hidden_size")?,
        })
    }
}

/// Parse Persephone's `transcriptions/hyps.txt`.
///
/// The file repeats three-line blocks: the feature file path, the recognized
/// phoneme string, and a blank separator. The clip prefix is the path's file
/// name up to the first dot (stripping `.<feat_type>.npy`).
pub fn parse_hyps(reader: impl BufRead) -> Result<Vec<Hypothesis>> {
    let mut lines = reader.lines();
    let mut hypotheses = Vec::new();

    while let Some(path_line) = lines.next() {
        let path_line = path_line.context("Failed to read hypotheses file")?;
        if path_line.trim().is_empty() {
            continue;
        }
        let Some(text_line) = lines.next() else {
            break;
        };
        let text = text_line.context("Failed to read hypotheses file")?;
        lines.next(); // blank separator

        let file_name = Path::new(path_line.trim())
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let prefix = file_name.split('.').next().unwrap_or_default().to_string();
        if prefix.is_empty() {
            continue;
        }

        hypotheses.push(Hypothesis {
            prefix,
            text: text.trim().to_string(),
        });
    }

    Ok(hypotheses)
}

#[cfg(test)]
#[path = "recognize_test.rs"]
mod tests;
