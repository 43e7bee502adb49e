use once_cell::sync::Lazy;
use regex::Regex;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    // Words (with inner apostrophes/hyphens), numbers, or punctuation runs.
    Regex::new(r"\p{L}[\p{L}\p{N}'\-]*|\p{N}+|[^\s\p{L}\p{N}]+").expect("token regex")
});

/// Splits text into word and punctuation tokens. Whitespace is dropped;
/// reassembly is the mask layer's job.
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Strips everything but letters, digits, apostrophes and hyphens, leaving
/// the lookup form of a token.
pub fn clean_word(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '\'' || *c == '-')
        .collect()
}

/// True for tokens that carry a word (as opposed to bare punctuation).
pub fn is_word(token: &str) -> bool {
    token.chars().any(|c| c.is_alphanumeric())
}

/// Curly quotes confuse both the translator and the slot-token regexes.
pub fn normalize_quotes(text: &str) -> String {
    text.replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
}
