//! Slot-token masking. Keep-word chunks are replaced with opaque slot tokens
//! before translation so they ride through the translator untouched, then the
//! translated sentence is split back apart and the chunks reinserted. The two
//! token styles match what each translator backend reliably preserves.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::MixResult;

/// Slot token surface form. The Indic-service backend passes `{{0}}` through
/// verbatim; LibreTranslate-style engines are safer with bare `VAR_0` words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotStyle {
    Braced,
    Var,
}

static BRACED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*(\d+)\s*\}\}").expect("braced slot regex"));
static VAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)VAR_(\d+)").expect("var slot regex"));

static CONTRACTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+(n't|'s|'re|'ll|'ve|'d|'m)").expect("contraction regex"));

impl SlotStyle {
    pub fn token(self, id: usize) -> String {
        match self {
            SlotStyle::Braced => format!("{{{{{id}}}}}"),
            SlotStyle::Var => format!("VAR_{id}"),
        }
    }

    fn regex(self) -> &'static Regex {
        match self {
            SlotStyle::Braced => &BRACED_RE,
            SlotStyle::Var => &VAR_RE,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MaskedSentence {
    /// Sentence with keep chunks replaced by slot tokens, ready to translate.
    pub text: String,
    /// Slot id → original English chunk, surface form preserved.
    pub slots: HashMap<usize, String>,
}

/// Replaces each maximal run of kept tokens with one slot token. `keep` is
/// parallel to `tokens`; punctuation tokens should arrive unkept so they stay
/// with the translated text.
pub fn mask_tokens(tokens: &[String], keep: &[bool], style: SlotStyle) -> MaskedSentence {
    debug_assert_eq!(tokens.len(), keep.len());
    let mut slots: HashMap<usize, String> = HashMap::new();
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    let mut slot_id = 0usize;

    let mut i = 0;
    while i < tokens.len() {
        if keep.get(i).copied().unwrap_or(false) {
            let mut j = i + 1;
            while j < tokens.len() && keep[j] {
                j += 1;
            }
            slots.insert(slot_id, tokens[i..j].join(" "));
            out.push(style.token(slot_id));
            slot_id += 1;
            i = j;
        } else {
            out.push(tokens[i].clone());
            i += 1;
        }
    }

    let text = CONTRACTION_RE.replace_all(&out.join(" "), "$1").into_owned();
    MaskedSentence { text, slots }
}

/// Splits the translated sentence on slot tokens, maps each plain span
/// through `render_span` (Romanization + polish), reinserts the original
/// chunks, and reassembles with word-boundary spacing. A slot id the
/// translator dropped is simply absent from the output; a slot id it
/// hallucinated renders as its literal token, never as another chunk.
pub fn restore_slots<F>(
    translated: &str,
    slots: &HashMap<usize, String>,
    style: SlotStyle,
    mut render_span: F,
) -> MixResult<String>
where
    F: FnMut(&str) -> MixResult<String>,
{
    let re = style.regex();
    let mut parts: Vec<String> = Vec::new();
    let mut pos = 0usize;

    for caps in re.captures_iter(translated) {
        let m = caps.get(0).expect("whole match");
        let before = &translated[pos..m.start()];
        if !before.trim().is_empty() {
            parts.push(render_span(before.trim())?);
        }
        let id: Option<usize> = caps.get(1).and_then(|g| g.as_str().parse().ok());
        match id.and_then(|id| slots.get(&id)) {
            Some(chunk) => parts.push(chunk.clone()),
            None => parts.push(m.as_str().to_string()),
        }
        pos = m.end();
    }
    let tail = &translated[pos..];
    if !tail.trim().is_empty() {
        parts.push(render_span(tail.trim())?);
    }

    Ok(join_spans(&parts))
}

/// Joins spans, inserting a space wherever two word characters would
/// otherwise touch. Punctuation stays glued to the preceding span.
fn join_spans(parts: &[String]) -> String {
    let mut out = String::new();
    for p in parts {
        if p.is_empty() {
            continue;
        }
        let prev_alnum = out.chars().last().is_some_and(|c| c.is_alphanumeric());
        let next_alnum = p.chars().next().is_some_and(|c| c.is_alphanumeric());
        if prev_alnum && next_alnum {
            out.push(' ');
        }
        out.push_str(p);
    }
    out
}
