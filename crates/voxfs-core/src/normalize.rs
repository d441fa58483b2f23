//! Lexical cleanup of a raw transcript before command matching.
//!
//! Spoken punctuation words are replaced as plain substrings, not whole words: "dotcom"
//! becomes ".com" and "spaceship" becomes " ship". Trigger phrases never contain these
//! words, so matching itself is unaffected.

use once_cell::sync::Lazy;
use regex::Regex;

/// Spoken token → written form, applied in this order.
pub const SPOKEN_PUNCTUATION: [(&str, &str); 3] = [("dot", "."), ("underscore", "_"), ("space", " ")];

/// Whitespace around a substituted "." or "_" belongs to the spoken form, not the name.
static GLUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*([._])\s*").expect("static regex"));

/// Sentence punctuation some STT engines add ("Create a folder reports.").
static SENTENCE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;:!?]|\.+\s*$").expect("static regex"));

/// Normalize a transcript: lowercase, spoken punctuation, collapsed whitespace.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let mut text = SENTENCE_PUNCT.replace_all(lowered.trim(), " ").into_owned();
    for (spoken, written) in SPOKEN_PUNCTUATION {
        text = text.replace(spoken, written);
    }
    let glued = GLUE.replace_all(&text, "$1");
    collapse_whitespace(&glued)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
