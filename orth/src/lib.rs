//! Conversion from Persephone phoneme strings to community orthographies.
//!
//! The recognition model emits space-delimited phoneme tokens with tone and
//! length markers (e.g. `"a a L H"`). Each supported orthography is a fixed,
//! ordered sequence of text rewrites over that string. The rewrites are
//! deliberately lenient: input that does not match a step's pattern passes
//! through that step unchanged, so conversion never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// A supported community orthography.
///
/// The set is closed; ELAN supplies the selection as a language label and
/// unknown labels select no conversion at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orthography {
    /// Tsuut'ina: tones written as acute/grave accents, mid tone unmarked.
    Tsuutina,
    /// Sauk, with vowel length as a separate S/L token after each vowel.
    SaukSeparate,
    /// Sauk, with vowel length already marked by combining circumflexes.
    SaukCircumflex,
}

/// Two vowels carrying a contour tone pair: "a a L H" (or "aa LH").
static CONTOUR_TONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([aiouAIOU]) ?([aiouAIOU]) ([LMH]) ?([LMH])").unwrap());

/// Two vowels carrying one level tone at a token boundary: "a a H".
static LEVEL_TONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([aiouAIOU]) ?([aiouAIOU]) ([LMH])( |$)").unwrap());

/// A run of combining circumflex accents (U+0302).
static CIRCUMFLEX_RUN: Lazy<Regex> = Lazy::new(|| Regex::new("\u{302}+").unwrap());

impl Orthography {
    /// Look up the orthography for an ELAN-supplied language label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Tsuut'ina" => Some(Self::Tsuutina),
            "Sauk-Separate" => Some(Self::SaukSeparate),
            "Sauk-Circumflex" => Some(Self::SaukCircumflex),
            _ => None,
        }
    }

    /// Convert a phoneme string into this orthography.
    pub fn convert(&self, phonemes: &str) -> String {
        match self {
            Self::Tsuutina => to_tsuutina(phonemes),
            Self::SaukSeparate => to_sauk_separate(phonemes),
            Self::SaukCircumflex => to_sauk_circumflex(phonemes),
        }
    }
}

/// Convert a phoneme string, or return it unchanged if no orthography was
/// requested.
pub fn convert(phonemes: &str, orthography: Option<Orthography>) -> String {
    match orthography {
        Some(orth) => orth.convert(phonemes),
        None => phonemes.to_string(),
    }
}

fn to_tsuutina(s: &str) -> String {
    // Utterance-initial glottal stops are phonemic but not written.
    let s = s.strip_prefix('\u{294}').unwrap_or(s);

    // Reorder contour tones over long vowels ("a a L H" -> "a L a H"), then
    // spread level tones over both halves ("a a H" -> "a H a H"). Both must
    // run before tone letters become diacritics below, since the diacritic
    // substitution assumes each tone letter directly follows its vowel.
    let s = CONTOUR_TONE.replace_all(s, "${1} ${3} ${2} ${4}");
    let s = LEVEL_TONE.replace_all(&s, "${1} ${3} ${2} ${3}${4}");

    // High and low tones become combining accents on the preceding vowel;
    // mid tone is unmarked.
    let s = s
        .replace(" H", "\u{301}")
        .replace(" M", "")
        .replace(" L", "\u{300}")
        .replace(' ', "");

    s.nfc().collect()
}

fn to_sauk_separate(s: &str) -> String {
    // Short vowels are unmarked; long vowels take a circumflex. Collapse
    // accidental runs of circumflexes left by adjacent markers.
    let s = s.replace(" S", "").replace(" L", "\u{302}");
    let s = CIRCUMFLEX_RUN.replace_all(&s, "\u{302}");
    to_sauk_circumflex(&s)
}

fn to_sauk_circumflex(s: &str) -> String {
    let s = s.replace(' ', "");

    // Longer tokens first so UH never fires inside UHHUH.
    let s = s
        .replace("UHHUH", " uh-huh, ")
        .replace("MHM", " mhm, ")
        .replace("UH", " uh, ")
        .replace("UM", " um, ");

    s.nfc().collect::<String>().trim().to_string()
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
