//! Canonical text form used by every matcher in the pipeline. All lexicon
//! terms and queries go through [`normalize`] so comparisons are accent-,
//! case- and (lightly) inflection-insensitive.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Punctuation stripped outright during normalization.
const PUNCTUATION: &[char] = &[
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`', '~',
    '(', ')',
];

/// Participle/gerund suffixes rewritten to a short stem marker. Longest
/// first so `-iendo` wins over `-ido`.
const STEM_SUFFIXES: &[&str] = &["iendo", "ido", "ida"];

/// Canonicalizes free text: lowercase, decompose and drop diacritics, strip
/// punctuation, collapse whitespace, then rewrite trailing participle
/// suffixes per token. Idempotent.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let folded: String = lowered.nfd().filter(|ch| !is_combining_mark(*ch)).collect();
    let depunctuated: String = folded.chars().filter(|ch| !PUNCTUATION.contains(ch)).collect();

    depunctuated.split_whitespace().map(stem_token).collect::<Vec<_>>().join(" ")
}

fn stem_token(token: &str) -> String {
    for suffix in STEM_SUFFIXES {
        if token.len() > suffix.len() && token.ends_with(suffix) {
            let stem = &token[..token.len() - suffix.len()];
            return format!("{stem}e");
        }
    }
    token.to_owned()
}

/// Whole-word/phrase containment over already-normalized text. Multi-word
/// phrases match across token boundaries.
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    let padded = format!(" {haystack} ");
    padded.contains(&format!(" {phrase} "))
}
