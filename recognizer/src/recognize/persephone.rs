//! Persephone recognition backend.
//!
//! Persephone is a Python library with no C API, so both steps run in a
//! Python subprocess driven by an embedded script. The script extracts
//! features for the staged clips, reloads the training corpus, rebuilds the
//! model from the recorded hyperparameters, and transcribes with the best
//! checkpoint.

use super::{Hypothesis, ModelDescription, RecognitionRequest, Recognizer, parse_hyps};
use anyhow::{Context, Result, bail};
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

/// Driver script fed to the interpreter on stdin.
const DRIVER: &str = include_str!("driver.py");

/// Phoneme recognizer backed by a trained Persephone model.
pub struct PersephoneRecognizer {
    python: PathBuf,
    exp_dir: PathBuf,
    description: ModelDescription,
}

impl PersephoneRecognizer {
    /// Create a recognizer for a trained model.
    ///
    /// # Arguments
    /// * `python` - Interpreter with Persephone installed
    /// * `exp_dir` - Experiment directory of the trained model; must contain
    ///   `model_description.txt` and `model/model_best.ckpt`
    pub fn new(python: impl Into<PathBuf>, exp_dir: impl Into<PathBuf>) -> Result<Self> {
        let exp_dir = exp_dir.into();
        let description = ModelDescription::load(&exp_dir)?;
        Ok(Self {
            python: python.into(),
            exp_dir,
            description,
        })
    }

    /// Hyperparameters loaded from the model description.
    pub fn description(&self) -> &ModelDescription {
        &self.description
    }

    async fn run_driver(&self, args: &[&OsStr]) -> Result<()> {
        let mut child = Command::new(&self.python)
            .arg("-")
            .args(args)
            .env("PYTHONIOENCODING", "utf-8")
            .stdin(Stdio::piped())
            // Persephone is chatty on stdout, which belongs to ELAN.
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start {}", self.python.display()))?;

        {
            let mut stdin = child.stdin.take().context("Failed to open driver stdin")?;
            stdin
                .write_all(DRIVER.as_bytes())
                .await
                .context("Failed to send driver script")?;
            // Dropping stdin closes it, letting the interpreter start.
        }

        let output = child
            .wait_with_output()
            .await
            .context("Failed to run Persephone driver")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "Persephone driver exited with {}: {}",
                output.status,
                stderr.trim()
            );
        }
        Ok(())
    }
}

impl Recognizer for PersephoneRecognizer {
    async fn extract_features(&mut self, request: &RecognitionRequest) -> Result<()> {
        info!(corpus = %request.corpus_dir.display(), "Extracting features");
        self.run_driver(&[
            OsStr::new("features"),
            request.corpus_dir.as_os_str(),
            OsStr::new(&request.feat_type),
        ])
        .await
    }

    async fn recognize(&mut self, request: &RecognitionRequest) -> Result<Vec<Hypothesis>> {
        // Fresh experiment directory per run, deleted when dropped.
        let work_dir = tempfile::tempdir().context("Failed to create experiment directory")?;

        info!(exp_dir = %self.exp_dir.display(), "Running Persephone transcription");
        self.run_driver(&[
            OsStr::new("transcribe"),
            request.corpus_dir.as_os_str(),
            OsStr::new(&request.feat_type),
            OsStr::new(&request.label_type),
            self.exp_dir.as_os_str(),
            work_dir.path().as_os_str(),
            OsStr::new(&self.description.num_train.to_string()),
            OsStr::new(&self.description.batch_size.to_string()),
            OsStr::new(&self.description.num_layers.to_string()),
            OsStr::new(&self.description.hidden_size.to_string()),
        ])
        .await?;

        let hyps_path = work_dir.path().join("hyps.txt");
        let file = File::open(&hyps_path).with_context(|| {
            format!("Persephone produced no hypotheses at {}", hyps_path.display())
        })?;
        let hypotheses = parse_hyps(BufReader::new(file))?;
        debug!(count = hypotheses.len(), "Parsed hypotheses");
        Ok(hypotheses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_loads_model_description() {
        let exp_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            exp_dir.path().join("model_description.txt"),
            "num_train=512\nbatch_size=16\nnum_layers=3\nhidden_size=250\n",
        )
        .unwrap();

        let recognizer = PersephoneRecognizer::new("python3", exp_dir.path()).unwrap();
        assert_eq!(recognizer.description().hidden_size, 250);
    }

    #[test]
    fn test_new_without_model_description_fails() {
        let exp_dir = tempfile::TempDir::new().unwrap();
        assert!(PersephoneRecognizer::new("python3", exp_dir.path()).is_err());
    }

    #[test]
    fn test_driver_covers_both_modes() {
        assert!(DRIVER.contains("def extract_features"));
        assert!(DRIVER.contains("model_best.ckpt"));
    }
}
