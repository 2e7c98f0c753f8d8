use super::*;

#[test]
fn test_progress_lines() {
    let mut out = Vec::new();
    let mut reporter = Reporter::new(&mut out);

    reporter
        .progress(0.1, "Loading annotations on input tier")
        .unwrap();
    reporter.progress(0.95, "Preparing output tier").unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text,
        "PROGRESS: 0.1 Loading annotations on input tier\n\
         PROGRESS: 0.95 Preparing output tier\n"
    );
}

#[test]
fn test_done() {
    let mut out = Vec::new();
    Reporter::new(&mut out).done().unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "RESULT: DONE.\n");
}

#[test]
fn test_failed() {
    let mut out = Vec::new();
    Reporter::new(&mut out).failed().unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "RESULT: FAILED.\n");
}
