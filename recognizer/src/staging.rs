//! Corpus staging for untranscribed clips.
//!
//! Persephone discovers untranscribed utterances through a fixed on-disk
//! shape: each clip WAV must exist in both `feat/untranscribed/` and `wav/`,
//! the extracted `.npy` feature file must be mirrored into `feat/`, and the
//! clip prefixes must be listed in `untranscribed_prefixes.txt` at the corpus
//! root. Every staged artifact is owned by a handle that removes it on drop,
//! so early returns and cancellation leave the corpus directory clean.

use anyhow::{Context, Result};
use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Paths inside a Persephone corpus directory.
#[derive(Debug, Clone)]
pub struct CorpusLayout {
    root: PathBuf,
}

impl CorpusLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn wav_dir(&self) -> PathBuf {
        self.root.join("wav")
    }

    pub fn feat_dir(&self) -> PathBuf {
        self.root.join("feat")
    }

    pub fn untranscribed_dir(&self) -> PathBuf {
        self.feat_dir().join("untranscribed")
    }

    pub fn prefix_list_path(&self) -> PathBuf {
        self.root.join("untranscribed_prefixes.txt")
    }

    /// Create `feat/untranscribed/` if missing.
    pub fn ensure_untranscribed_dir(&self) -> Result<PathBuf> {
        let dir = self.untranscribed_dir();
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        Ok(dir)
    }
}

/// One annotation's staged clip and its associated corpus artifacts.
///
/// Dropping the handle removes everything it created.
pub struct StagedClip {
    clip: NamedTempFile,
    prefix: String,
    wav_symlink: PathBuf,
    feat_symlink: Option<PathBuf>,
    npy: Option<PathBuf>,
    npy_symlink: Option<PathBuf>,
}

impl StagedClip {
    /// Create an empty clip file in `feat/untranscribed/` and link it into
    /// `wav/`. The caller writes the audio through `path()`.
    pub fn create(layout: &CorpusLayout) -> Result<Self> {
        let untranscribed = layout.ensure_untranscribed_dir()?;
        // Prefix recovery (here and in Persephone's hypothesis output) treats
        // the first dot as the start of the extensions, so the stem must stay
        // dot-free.
        let clip = tempfile::Builder::new()
            .prefix("clip")
            .suffix(".wav")
            .tempfile_in(&untranscribed)
            .context("Failed to create temporary clip")?;

        let file_name = clip
            .path()
            .file_name()
            .context("Temporary clip has no file name")?
            .to_os_string();
        let prefix = Path::new(&file_name)
            .file_stem()
            .context("Temporary clip has no file stem")?
            .to_string_lossy()
            .into_owned();

        let wav_symlink = layout.wav_dir().join(&file_name);
        symlink(clip.path(), &wav_symlink).with_context(|| {
            format!("Failed to link clip into {}", layout.wav_dir().display())
        })?;

        debug!(prefix = %prefix, "Staged clip");
        Ok(Self {
            clip,
            prefix,
            wav_symlink,
            feat_symlink: None,
            npy: None,
            npy_symlink: None,
        })
    }

    /// Path of the clip WAV in `feat/untranscribed/`.
    pub fn path(&self) -> &Path {
        self.clip.path()
    }

    /// Clip file name without the `.wav` extension.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// After feature extraction, link the clip and its `.npy` into `feat/`.
    ///
    /// Persephone writes the feature file next to the clip as
    /// `<prefix>.<feat_type>.npy`; the generated file becomes owned by this
    /// handle as well.
    pub fn link_features(&mut self, layout: &CorpusLayout, feat_type: &str) -> Result<()> {
        let feat_dir = layout.feat_dir();
        let clip_name = self
            .clip
            .path()
            .file_name()
            .context("Temporary clip has no file name")?
            .to_os_string();

        let feat_symlink = feat_dir.join(&clip_name);
        symlink(self.clip.path(), &feat_symlink)
            .with_context(|| format!("Failed to link clip into {}", feat_dir.display()))?;
        self.feat_symlink = Some(feat_symlink);

        let npy_name = format!("{}.{}.npy", self.prefix, feat_type);
        let npy = layout.untranscribed_dir().join(&npy_name);
        let npy_symlink = feat_dir.join(&npy_name);
        symlink(&npy, &npy_symlink)
            .with_context(|| format!("Failed to link features into {}", feat_dir.display()))?;
        self.npy = Some(npy);
        self.npy_symlink = Some(npy_symlink);

        Ok(())
    }
}

impl Drop for StagedClip {
    fn drop(&mut self) {
        remove_quietly(&self.wav_symlink);
        if let Some(link) = &self.feat_symlink {
            remove_quietly(link);
        }
        if let Some(link) = &self.npy_symlink {
            remove_quietly(link);
        }
        if let Some(npy) = &self.npy {
            remove_quietly(npy);
        }
        // The clip WAV itself is removed by the NamedTempFile drop.
    }
}

/// The `untranscribed_prefixes.txt` marker file, removed on drop.
pub struct PrefixList {
    path: PathBuf,
}

impl PrefixList {
    /// Write one clip prefix per line at the corpus root.
    pub fn write(
        layout: &CorpusLayout,
        prefixes: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Self> {
        let path = layout.prefix_list_path();
        let contents: String = prefixes
            .into_iter()
            .map(|p| format!("{}\n", p.as_ref()))
            .collect();
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(Self { path })
    }
}

impl Drop for PrefixList {
    fn drop(&mut self) {
        remove_quietly(&self.path);
    }
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "Failed to remove staged file");
        }
    }
}

#[cfg(test)]
#[path = "staging_test.rs"]
mod tests;
