//! ELAN recognizer parameters.
//!
//! ELAN hands a local recognizer its settings as a line-oriented stream of
//! `<param name="...">value</param>` elements on stdin (one per line, as
//! declared in the recognizer's CMDI descriptor).

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use persephone_elan_orth::Orthography;
use regex::Regex;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::PathBuf;

static PARAM_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<param name="(.*?)".*?>(.*?)</param>"#).unwrap());

/// Parameters passed by ELAN via the recognizer interface.
#[derive(Debug, Clone, Default)]
pub struct Params {
    values: HashMap<String, String>,
}

impl Params {
    /// Read parameters from a line-oriented stream.
    ///
    /// Lines without a recognizable `<param>` element are ignored. Values
    /// are trimmed and XML-unescaped (ELAN escapes e.g. the apostrophe in
    /// "Tsuut'ina").
    pub fn read(reader: impl BufRead) -> Result<Self> {
        let mut values = HashMap::new();
        for line in reader.lines() {
            let line = line.context("Failed to read parameter line")?;
            if let Some(caps) = PARAM_LINE.captures(&line) {
                values.insert(caps[1].to_string(), decode_entities(caps[2].trim()));
            }
        }
        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Get a required parameter.
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name)
            .with_context(|| format!("Missing required ELAN parameter: {name}"))
    }

    /// Get a required parameter as a path.
    pub fn require_path(&self, name: &str) -> Result<PathBuf> {
        self.require(name).map(PathBuf::from)
    }

    /// The requested community orthography, if any was selected.
    pub fn orthography(&self) -> Option<Orthography> {
        self.get("orthography").and_then(Orthography::from_label)
    }

    #[cfg(test)]
    pub fn insert(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }
}

/// Decode the basic XML entities ELAN uses in parameter values.
fn decode_entities(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
#[path = "params_test.rs"]
mod tests;
