use super::*;
use tempfile::TempDir;

/// A corpus directory with the `wav/` subdirectory Persephone corpora carry.
fn corpus_fixture() -> (TempDir, CorpusLayout) {
    let temp_dir = TempDir::new().unwrap();
    let layout = CorpusLayout::new(temp_dir.path());
    fs::create_dir(layout.wav_dir()).unwrap();
    fs::create_dir(layout.feat_dir()).unwrap();
    (temp_dir, layout)
}

fn entries(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect()
}

#[test]
fn test_layout_paths() {
    let layout = CorpusLayout::new("/corpora/sauk");
    assert_eq!(layout.wav_dir(), PathBuf::from("/corpora/sauk/wav"));
    assert_eq!(
        layout.untranscribed_dir(),
        PathBuf::from("/corpora/sauk/feat/untranscribed")
    );
    assert_eq!(
        layout.prefix_list_path(),
        PathBuf::from("/corpora/sauk/untranscribed_prefixes.txt")
    );
}

#[test]
fn test_staged_clip_creates_wav_and_symlink() {
    let (_guard, layout) = corpus_fixture();

    let clip = StagedClip::create(&layout).unwrap();

    assert!(clip.path().exists());
    assert!(clip.path().starts_with(layout.untranscribed_dir()));
    assert!(clip.path().extension().is_some_and(|e| e == "wav"));
    assert!(!clip.prefix().is_empty());
    assert!(!clip.prefix().contains('.'));

    let links = entries(&layout.wav_dir());
    assert_eq!(links.len(), 1);
    assert!(links[0].is_symlink());
}

#[test]
fn test_staged_clip_drop_removes_everything() {
    let (_guard, layout) = corpus_fixture();

    let clip_path;
    {
        let clip = StagedClip::create(&layout).unwrap();
        clip_path = clip.path().to_path_buf();
    }

    assert!(!clip_path.exists());
    assert!(entries(&layout.wav_dir()).is_empty());
}

#[test]
fn test_link_features_and_cleanup() {
    let (_guard, layout) = corpus_fixture();

    {
        let mut clip = StagedClip::create(&layout).unwrap();
        clip.link_features(&layout, "fbank").unwrap();

        // Simulate Persephone writing the feature file.
        let npy = layout
            .untranscribed_dir()
            .join(format!("{}.fbank.npy", clip.prefix()));
        fs::write(&npy, b"features").unwrap();

        // feat/ now holds the clip symlink, the npy symlink, and the
        // untranscribed/ directory itself.
        assert_eq!(entries(&layout.feat_dir()).len(), 3);
    }

    // Only the untranscribed/ directory survives the drop, and it is empty.
    assert_eq!(entries(&layout.feat_dir()), vec![layout.untranscribed_dir()]);
    assert!(entries(&layout.untranscribed_dir()).is_empty());
}

#[test]
fn test_prefix_list_write_and_drop() {
    let (_guard, layout) = corpus_fixture();

    {
        let _list = PrefixList::write(&layout, ["clip1", "clip2"]).unwrap();
        let contents = fs::read_to_string(layout.prefix_list_path()).unwrap();
        assert_eq!(contents, "clip1\nclip2\n");
    }

    assert!(!layout.prefix_list_path().exists());
}

#[test]
fn test_drop_tolerates_already_removed_files() {
    let (_guard, layout) = corpus_fixture();

    let clip = StagedClip::create(&layout).unwrap();
    for link in entries(&layout.wav_dir()) {
        fs::remove_file(link).unwrap();
    }
    drop(clip); // must not panic
}
