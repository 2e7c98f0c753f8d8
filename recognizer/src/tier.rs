//! ELAN tier I/O (AVATech timed-span format).
//!
//! Both the input and output tier documents carry one annotation per
//! `<span start="..." end="..."><v>...</v></span>` element. ELAN writes
//! start/end as seconds; we keep milliseconds internally and write them
//! back out as such, which ELAN accepts.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{BufRead, Write};

static SPAN_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<span start="(.*?)" end="(.*?)"><v>(.*?)</v>"#).unwrap());

/// Column name ELAN shows for the generated tier.
const OUTPUT_COLUMN: &str = "PersephoneOutput";

/// One annotation span from an ELAN tier.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Span start in milliseconds.
    pub start_ms: u64,
    /// Span end in milliseconds.
    pub end_ms: u64,
    /// Annotation text (the input value, later the recognized text).
    pub value: String,
}

/// Read annotation spans from an input tier document.
///
/// Matching is line-oriented; lines without a span element are skipped.
pub fn read_annotations(reader: impl BufRead) -> Result<Vec<Annotation>> {
    let mut annotations = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read input tier line")?;
        if let Some(caps) = SPAN_LINE.captures(&line) {
            let start: f64 = caps[1]
                .parse()
                .with_context(|| format!("Invalid span start: {}", &caps[1]))?;
            let end: f64 = caps[2]
                .parse()
                .with_context(|| format!("Invalid span end: {}", &caps[2]))?;
            annotations.push(Annotation {
                start_ms: (start * 1000.0) as u64,
                end_ms: (end * 1000.0) as u64,
                value: caps[3].to_string(),
            });
        }
    }
    Ok(annotations)
}

/// Write the output tier document ELAN expects.
pub fn write_tier(writer: &mut impl Write, annotations: &[Annotation]) -> Result<()> {
    writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        writer,
        r#"<TIER xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:noNamespaceSchemaLocation="file:avatech-tier.xsd" columns="{OUTPUT_COLUMN}">"#
    )?;
    for annotation in annotations {
        writeln!(
            writer,
            r#"    <span start="{}" end="{}"><v>{}</v></span>"#,
            annotation.start_ms, annotation.end_ms, annotation.value
        )?;
    }
    writeln!(writer, "</TIER>")?;
    Ok(())
}

#[cfg(test)]
#[path = "tier_test.rs"]
mod tests;
