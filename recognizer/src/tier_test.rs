use super::*;
use std::io::Cursor;

const INPUT_TIER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TIER xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" columns="speech">
    <span start="17.492" end="18.492"><v>first utterance</v></span>
    <span start="20.0" end="21.75"><v></v></span>
</TIER>
"#;

#[test]
fn test_read_annotations() {
    let annotations = read_annotations(Cursor::new(INPUT_TIER)).unwrap();

    assert_eq!(annotations.len(), 2);
    assert_eq!(
        annotations[0],
        Annotation {
            start_ms: 17492,
            end_ms: 18492,
            value: "first utterance".to_string(),
        }
    );
    assert_eq!(annotations[1].start_ms, 20000);
    assert_eq!(annotations[1].end_ms, 21750);
    assert_eq!(annotations[1].value, "");
}

#[test]
fn test_read_skips_non_span_lines() {
    let annotations = read_annotations(Cursor::new("<TIER>\njunk\n</TIER>\n")).unwrap();
    assert!(annotations.is_empty());
}

#[test]
fn test_read_rejects_non_numeric_times() {
    let doc = r#"<span start="abc" end="1.0"><v>x</v></span>"#;
    assert!(read_annotations(Cursor::new(doc)).is_err());
}

#[test]
fn test_seconds_truncate_to_milliseconds() {
    let doc = r#"<span start="0.0015" end="0.9999"><v>x</v></span>"#;
    let annotations = read_annotations(Cursor::new(doc)).unwrap();
    assert_eq!(annotations[0].start_ms, 1);
    assert_eq!(annotations[0].end_ms, 999);
}

#[test]
fn test_write_tier() {
    let annotations = vec![
        Annotation {
            start_ms: 17492,
            end_ms: 18492,
            value: "áá".to_string(),
        },
        Annotation {
            start_ms: 20000,
            end_ms: 21750,
            value: "tsn".to_string(),
        },
    ];

    let mut out = Vec::new();
    write_tier(&mut out, &annotations).unwrap();
    let doc = String::from_utf8(out).unwrap();

    let expected = concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
        "<TIER xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" ",
        "xsi:noNamespaceSchemaLocation=\"file:avatech-tier.xsd\" columns=\"PersephoneOutput\">\n",
        "    <span start=\"17492\" end=\"18492\"><v>áá</v></span>\n",
        "    <span start=\"20000\" end=\"21750\"><v>tsn</v></span>\n",
        "</TIER>\n",
    );
    assert_eq!(doc, expected);
}
