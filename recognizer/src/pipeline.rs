//! The recognition pipeline.
//!
//! Runs the stages of one ELAN recognition request in order: load the
//! annotation spans, convert and slice the source audio, stage the clips in
//! the corpus, run recognition, convert the phoneme strings to the requested
//! orthography, and write the output tier.

use crate::audio::{self, ClipSource};
use crate::config::Config;
use crate::params::Params;
use crate::recognize::{Hypothesis, RecognitionRequest, Recognizer};
use crate::report::Reporter;
use crate::staging::{CorpusLayout, PrefixList, StagedClip};
use crate::tier;
use anyhow::{Context, Result};
use persephone_elan_orth as orth;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use tracing::{info, warn};

/// Run one recognition request end to end.
pub async fn run<R: Recognizer, W: Write>(
    params: &Params,
    config: &Config,
    recognizer: &mut R,
    reporter: &mut Reporter<W>,
) -> Result<()> {
    // Fail fast if ffmpeg is missing; nothing below can work without it.
    let ffmpeg = audio::find_ffmpeg(config.tools.ffmpeg.as_deref())?;
    let orthography = params.orthography();

    reporter.progress(0.1, "Loading annotations on input tier")?;
    let input_tier = params.require_path("input_tier")?;
    let file = File::open(&input_tier)
        .with_context(|| format!("Failed to open input tier: {}", input_tier.display()))?;
    let mut annotations = tier::read_annotations(BufReader::new(file))?;
    info!(count = annotations.len(), "Loaded annotations");

    reporter.progress(0.2, "Converting source audio")?;
    let source = params.require_path("source")?;
    let converted = tempfile::Builder::new()
        .suffix(".wav")
        .tempfile()
        .context("Failed to create temporary audio file")?;
    audio::convert_source(&ffmpeg, &source, converted.path()).await?;
    let clip_source = ClipSource::load(converted.path())?;
    // Samples are in memory now; the converted recording can go.
    drop(converted);

    reporter.progress(0.3, "Creating temporary clips")?;
    let layout = CorpusLayout::new(params.require_path("corpus_dir")?);
    let mut clips = Vec::with_capacity(annotations.len());
    let mut prefix_to_index: HashMap<String, usize> = HashMap::new();
    for (index, annotation) in annotations.iter().enumerate() {
        let clip = StagedClip::create(&layout)?;
        clip_source.write_clip(annotation.start_ms, annotation.end_ms, clip.path())?;
        prefix_to_index.insert(clip.prefix().to_string(), index);
        clips.push(clip);
    }
    let _prefix_list = PrefixList::write(&layout, clips.iter().map(StagedClip::prefix))?;

    let request = RecognitionRequest {
        corpus_dir: layout.root().to_path_buf(),
        feat_type: params.require("feat_type")?.to_string(),
        label_type: params.require("label_type")?.to_string(),
    };

    reporter.progress(0.4, "Extracting features from clips")?;
    recognizer.extract_features(&request).await?;

    reporter.progress(0.5, "Creating temporary symlinks to clips and features")?;
    for clip in &mut clips {
        clip.link_features(&layout, &request.feat_type)?;
    }

    reporter.progress(0.7, "Transcribing clips")?;
    let hypotheses = recognizer.recognize(&request).await?;
    for Hypothesis { prefix, text } in hypotheses {
        match prefix_to_index.get(&prefix) {
            Some(&index) => annotations[index].value = text,
            None => warn!(prefix = %prefix, "Hypothesis for unknown clip prefix"),
        }
    }

    reporter.progress(0.95, "Preparing output tier")?;
    for annotation in &mut annotations {
        annotation.value = orth::convert(&annotation.value, orthography);
    }
    let output_tier = params.require_path("output_tier")?;
    let out = File::create(&output_tier)
        .with_context(|| format!("Failed to create output tier: {}", output_tier.display()))?;
    let mut out = BufWriter::new(out);
    tier::write_tier(&mut out, &annotations)?;
    out.flush().context("Failed to flush output tier")?;

    Ok(())
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
