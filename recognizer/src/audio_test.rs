use super::*;
use tempfile::TempDir;

fn wav_spec() -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate: TARGET_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Write a 1-second mono 16 kHz WAV whose sample values count upward.
fn write_ramp_wav(path: &Path) {
    let mut writer = hound::WavWriter::create(path, wav_spec()).unwrap();
    for i in 0..TARGET_SAMPLE_RATE {
        writer.write_sample((i % 1000) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn test_find_ffmpeg_with_configured_path() {
    let temp_dir = TempDir::new().unwrap();
    let fake = temp_dir.path().join("ffmpeg");
    std::fs::write(&fake, "").unwrap();

    let found = find_ffmpeg(Some(&fake)).unwrap();
    assert_eq!(found, fake);
}

#[test]
fn test_find_ffmpeg_with_bad_configured_path() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("no-such-ffmpeg");

    let err = find_ffmpeg(Some(&missing)).unwrap_err();
    assert!(err.to_string().contains("no-such-ffmpeg"));
}

#[test]
fn test_write_clip_extracts_span() {
    let temp_dir = TempDir::new().unwrap();
    let source_path = temp_dir.path().join("source.wav");
    write_ramp_wav(&source_path);

    let source = ClipSource::load(&source_path).unwrap();
    let clip_path = temp_dir.path().join("clip.wav");
    source.write_clip(250, 500, &clip_path).unwrap();

    let mut reader = hound::WavReader::open(&clip_path).unwrap();
    assert_eq!(reader.spec().sample_rate, TARGET_SAMPLE_RATE);
    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();

    // 250ms at 16kHz is 4000 samples, starting at sample 4000.
    assert_eq!(samples.len(), 4000);
    assert_eq!(samples[0], (4000 % 1000) as i16);
}

#[test]
fn test_write_clip_clamps_to_recording_end() {
    let temp_dir = TempDir::new().unwrap();
    let source_path = temp_dir.path().join("source.wav");
    write_ramp_wav(&source_path);

    let source = ClipSource::load(&source_path).unwrap();
    let clip_path = temp_dir.path().join("clip.wav");
    source.write_clip(900, 5000, &clip_path).unwrap();

    let reader = hound::WavReader::open(&clip_path).unwrap();
    // Only 100ms of audio remains after 900ms.
    assert_eq!(reader.len(), 1600);
}

#[test]
fn test_write_clip_empty_span() {
    let temp_dir = TempDir::new().unwrap();
    let source_path = temp_dir.path().join("source.wav");
    write_ramp_wav(&source_path);

    let source = ClipSource::load(&source_path).unwrap();
    let clip_path = temp_dir.path().join("clip.wav");
    source.write_clip(500, 500, &clip_path).unwrap();

    let reader = hound::WavReader::open(&clip_path).unwrap();
    assert_eq!(reader.len(), 0);
}

#[test]
fn test_write_clip_inverted_span_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let source_path = temp_dir.path().join("source.wav");
    write_ramp_wav(&source_path);

    let source = ClipSource::load(&source_path).unwrap();
    let clip_path = temp_dir.path().join("clip.wav");
    source.write_clip(800, 200, &clip_path).unwrap();

    let reader = hound::WavReader::open(&clip_path).unwrap();
    assert_eq!(reader.len(), 0);
}
