//! Script transliteration. The `Romanizer` trait is the collaborator seam;
//! the builtin engine covers the Brahmic scripts whose Unicode blocks are
//! codepoint-parallel to Devanagari by normalizing into the Devanagari block
//! and walking characters with consonant/matra tables. Perso-Arabic and
//! Ol Chiki need the HTTP service variant.

use serde::Deserialize;

use crate::error::{MixError, MixResult, Stage};
use crate::langtab::Script;
use crate::target::TransTarget;

pub trait Romanizer: Send + Sync {
    fn transliterate(&self, text: &str, from: Script, to: TransTarget) -> MixResult<String>;
}

/// Table-driven engine, no external service.
#[derive(Debug, Default)]
pub struct BuiltinRomanizer;

impl BuiltinRomanizer {
    pub fn new() -> Self {
        BuiltinRomanizer
    }
}

impl Romanizer for BuiltinRomanizer {
    fn transliterate(&self, text: &str, from: Script, to: TransTarget) -> MixResult<String> {
        let from_block = from.brahmic_block().ok_or_else(|| {
            MixError::Transliteration(format!("builtin romanizer cannot read {}", from.name()))
        })?;

        match to {
            TransTarget::Roman => {
                let normalized = shift_block(text, from_block, 0x0900);
                Ok(romanize_devanagari(&normalized))
            }
            TransTarget::Script(dst) => {
                let dst_block = dst.brahmic_block().ok_or_else(|| {
                    MixError::Transliteration(format!(
                        "builtin romanizer cannot write {}",
                        dst.name()
                    ))
                })?;
                Ok(shift_block(text, from_block, dst_block))
            }
        }
    }
}

/// Moves every codepoint of one Brahmic block into another, leaving all other
/// characters alone. The scheduled-script blocks share the ISCII-era layout,
/// so relative offsets line up.
fn shift_block(text: &str, from: u32, to: u32) -> String {
    text.chars()
        .map(|c| {
            let cp = c as u32;
            if (from..from + 0x80).contains(&cp) {
                char::from_u32(to + (cp - from)).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

const HALANT: char = '\u{094D}';
const ANUSVARA: char = '\u{0902}';
const CHANDRABINDU: char = '\u{0901}';
const VISARGA: char = '\u{0903}';
const NUKTA: char = '\u{093C}';

fn consonant(c: char) -> Option<&'static str> {
    Some(match c {
        'क' => "k",
        'ख' => "kh",
        'ग' => "g",
        'घ' => "gh",
        'ङ' => "ng",
        'च' => "ch",
        'छ' => "chh",
        'ज' => "j",
        'झ' => "jh",
        'ञ' => "ny",
        'ट' => "t",
        'ठ' => "th",
        'ड' => "d",
        'ढ' => "dh",
        'ण' => "n",
        'त' => "t",
        'थ' => "th",
        'द' => "d",
        'ध' => "dh",
        'न' => "n",
        'प' => "p",
        'फ' => "ph",
        'ब' => "b",
        'भ' => "bh",
        'म' => "m",
        'य' => "y",
        'र' => "r",
        'ल' => "l",
        'ळ' => "l",
        'व' => "v",
        'श' => "sh",
        'ष' => "sh",
        'स' => "s",
        'ह' => "h",
        // Precomposed nukta consonants (qa, khha, ghha, za, dddha, rha, fa, yya).
        '\u{0958}' => "q",
        '\u{0959}' => "kh",
        '\u{095A}' => "g",
        '\u{095B}' => "z",
        '\u{095C}' => "r",
        '\u{095D}' => "rh",
        '\u{095E}' => "f",
        '\u{095F}' => "y",
        _ => return None,
    })
}

fn independent_vowel(c: char) -> Option<&'static str> {
    Some(match c {
        'अ' => "a",
        'आ' => "aa",
        'इ' => "i",
        'ई' => "ee",
        'उ' => "u",
        'ऊ' => "oo",
        'ऋ' => "ri",
        'ऎ' => "e",
        'ए' => "e",
        'ऐ' => "ai",
        'ऒ' => "o",
        'ओ' => "o",
        'औ' => "au",
        'ऍ' => "e",
        'ऑ' => "o",
        _ => return None,
    })
}

fn matra(c: char) -> Option<&'static str> {
    Some(match c {
        // Single 'a' reads better colloquially than strict long "aa".
        'ा' => "a",
        'ि' => "i",
        'ी' => "ee",
        'ु' => "u",
        'ू' => "oo",
        'ृ' => "ri",
        'ॆ' => "e",
        'े' => "e",
        'ै' => "ai",
        'ॊ' => "o",
        'ो' => "o",
        'ौ' => "au",
        'ॅ' => "e",
        'ॉ' => "o",
        _ => return None,
    })
}

/// Walks normalized Devanagari, emitting Roman letters. A consonant carries a
/// pending inherent 'a' that a matra or halant replaces; the pending vowel is
/// flushed before anything that is not a vowel sign.
fn romanize_devanagari(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_a = false;

    for c in text.chars() {
        if let Some(m) = matra(c) {
            out.push_str(m);
            pending_a = false;
            continue;
        }
        match c {
            HALANT => pending_a = false,
            NUKTA => {} // combining form already covered by the precomposed table rows
            ANUSVARA | CHANDRABINDU => {
                if pending_a {
                    out.push('a');
                    pending_a = false;
                }
                out.push('n');
            }
            VISARGA => {
                if pending_a {
                    out.push('a');
                    pending_a = false;
                }
                out.push('h');
            }
            '।' | '॥' => {
                if pending_a {
                    out.push('a');
                    pending_a = false;
                }
                out.push('.');
            }
            _ => {
                if let Some(k) = consonant(c) {
                    if pending_a {
                        out.push('a');
                    }
                    out.push_str(k);
                    pending_a = true;
                } else if let Some(v) = independent_vowel(c) {
                    if pending_a {
                        out.push('a');
                        pending_a = false;
                    }
                    out.push_str(v);
                } else if ('०'..='९').contains(&c) {
                    if pending_a {
                        out.push('a');
                        pending_a = false;
                    }
                    out.push(char::from(b'0' + (c as u32 - '०' as u32) as u8));
                } else {
                    if pending_a {
                        out.push('a');
                        pending_a = false;
                    }
                    out.push(c);
                }
            }
        }
    }
    if pending_a {
        out.push('a');
    }
    out
}

/// Aksharamukha-style transliteration service client.
pub struct HttpRomanizer {
    endpoint: String,
    agent: ureq::Agent,
}

#[derive(Deserialize)]
struct TransliterateResponse {
    result: String,
}

impl HttpRomanizer {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            agent: ureq::Agent::new(),
        }
    }
}

impl Romanizer for HttpRomanizer {
    fn transliterate(&self, text: &str, from: Script, to: TransTarget) -> MixResult<String> {
        let resp = self
            .agent
            .post(&self.endpoint)
            .send_json(serde_json::json!({
                "text": text,
                "source": from.name(),
                "target": to.to_string(),
            }))
            .map_err(|e| match e {
                ureq::Error::Transport(t) => MixError::UpstreamUnavailable {
                    stage: Stage::Romanize,
                    detail: t.to_string(),
                },
                ureq::Error::Status(code, _) => {
                    MixError::Transliteration(format!("service returned HTTP {code}"))
                }
            })?;
        let body: TransliterateResponse = resp
            .into_json()
            .map_err(|e| MixError::Transliteration(format!("bad service response: {e}")))?;
        Ok(body.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roman(text: &str, from: Script) -> String {
        BuiltinRomanizer::new()
            .transliterate(text, from, TransTarget::Roman)
            .expect("romanize")
    }

    #[test]
    fn romanizes_devanagari_words() {
        // Raw output keeps the inherent vowel; schwa deletion is polish.
        assert_eq!(roman("आप", Script::Devanagari), "aapa");
        assert_eq!(roman("कैसे", Script::Devanagari), "kaise");
        assert_eq!(roman("हैं", Script::Devanagari), "hain");
        assert_eq!(roman("मैं", Script::Devanagari), "main");
        assert_eq!(roman("नमस्ते", Script::Devanagari), "namaste");
    }

    #[test]
    fn inherent_vowel_flushes_at_word_end() {
        assert_eq!(roman("कल", Script::Devanagari), "kala");
    }

    #[test]
    fn passes_through_latin_and_punctuation() {
        assert_eq!(
            roman("आप कैसे हैं?", Script::Devanagari),
            "aapa kaise hain?"
        );
        assert_eq!(roman("ok थीक", Script::Devanagari), "ok theeka");
    }

    #[test]
    fn parallel_block_scripts_normalize() {
        // Kannada ನಮಸ್ತೆ sits at the same offsets as Devanagari नमस्ते.
        assert_eq!(roman("ನಮಸ್ತೆ", Script::Kannada), "namaste");
    }

    #[test]
    fn script_to_script_conversion_round_trips() {
        let eng = BuiltinRomanizer::new();
        let kn = eng
            .transliterate("नमस्ते", Script::Devanagari, TransTarget::Script(Script::Kannada))
            .expect("convert");
        assert_eq!(kn, "ನಮಸ್ತೆ");
        let back = eng
            .transliterate(&kn, Script::Kannada, TransTarget::Script(Script::Devanagari))
            .expect("convert back");
        assert_eq!(back, "नमस्ते");
    }

    #[test]
    fn rejects_non_brahmic_scripts() {
        let eng = BuiltinRomanizer::new();
        assert!(matches!(
            eng.transliterate("x", Script::Arabic, TransTarget::Roman),
            Err(MixError::Transliteration(_))
        ));
        assert!(matches!(
            eng.transliterate("x", Script::Devanagari, TransTarget::Script(Script::OlChiki)),
            Err(MixError::Transliteration(_))
        ));
    }
}
