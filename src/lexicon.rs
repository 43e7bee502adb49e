use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{MixError, MixResult};

/// Top of the familiarity scale. Tech terms and manual keep-words sit here so
/// they survive any threshold at or below the ceiling.
pub const SCALE_MAX: f32 = 10.0;

/// Whitelist entries above this zipf frequency are everyday English and are
/// not blanket-kept; they must earn restoration through their score.
const ZIPF_GUARDRAIL: f32 = 6.42;

/// Word → familiarity score, case-insensitive. Built once at startup and
/// shared read-only across all pipeline calls; nothing mutates it afterwards.
#[derive(Debug, Default)]
pub struct Lexicon {
    scores: HashMap<String, f32>,
}

/// Data file shape shared by the benchmark, whitelist, and tech-term files:
/// `{"wordvalue": [{"EnglishWord": "...", "scale": 5, "tobeused": true}]}`.
#[derive(Deserialize)]
struct WordValueFile {
    #[serde(default)]
    wordvalue: Vec<WordEntry>,
}

#[derive(Deserialize)]
struct WordEntry {
    #[serde(rename = "EnglishWord", default)]
    english_word: String,
    #[serde(default)]
    scale: Option<f32>,
    #[serde(default)]
    tobeused: Option<bool>,
}

/// Words colloquial code-mixed speech nearly always keeps in English. Used
/// when no data directory is configured.
const STARTER_WORDS: &[&str] = &[
    "hello", "hi", "bye", "goodbye", "ok", "okay", "thanks", "thank", "sorry",
    "please", "yes", "no", "maybe", "sure", "cool", "nice", "great", "awesome",
    "wow", "oh", "hey", "hmm", "yeah", "yep", "nope", "fine", "good", "bad",
    "love", "like", "hate", "want", "need", "miss", "happy", "sad", "angry",
    "computer", "phone", "internet", "email", "password", "app", "website",
    "video", "photo", "music", "movie", "game", "online", "offline",
];

const STARTER_SCORE: f32 = 8.0;

impl Lexicon {
    pub fn builtin() -> Lexicon {
        let scores = STARTER_WORDS
            .iter()
            .map(|w| ((*w).to_string(), STARTER_SCORE))
            .collect();
        Lexicon { scores }
    }

    /// Builds a lexicon from explicit (word, score) pairs. Keys are lowered.
    pub fn from_scores<I, S>(pairs: I) -> Lexicon
    where
        I: IntoIterator<Item = (S, f32)>,
        S: AsRef<str>,
    {
        let mut scores = HashMap::new();
        for (w, s) in pairs {
            let w = w.as_ref().trim().to_lowercase();
            if !w.is_empty() && s >= 0.0 {
                scores.insert(w, s);
            }
        }
        Lexicon { scores }
    }

    /// Loads the data directory layout of the x-glish database on top of the
    /// builtin starter set. Every file is optional; a present-but-broken file
    /// is an error rather than a silent skip.
    pub fn load_dir(dir: &Path) -> MixResult<Lexicon> {
        let mut lex = Lexicon::builtin();
        let zipf = load_zipf_table(dir)?;

        // Familiarity benchmark. The historical file name carries a typo, so
        // both spellings are probed.
        for fname in ["informalbechmark.json", "infornalbechmark.json"] {
            let path = dir.join(fname);
            if !path.exists() {
                continue;
            }
            for entry in read_wordvalue(&path)?.wordvalue {
                let word = entry.english_word.trim().to_lowercase();
                if word.is_empty() {
                    continue;
                }
                let scale = entry.scale.unwrap_or(5.0).clamp(0.0, SCALE_MAX);
                lex.scores.insert(word, scale);
            }
            break;
        }

        // Manual keep-word whitelist, gated by the frequency guardrail.
        let whitelist = dir.join("xglishwordhindi.json");
        if whitelist.exists() {
            for entry in read_wordvalue(&whitelist)?.wordvalue {
                if !entry.tobeused.unwrap_or(false) {
                    continue;
                }
                let word = entry.english_word.trim().to_lowercase();
                if word.is_empty() {
                    continue;
                }
                if let Some(z) = zipf.get(&word) {
                    if *z > ZIPF_GUARDRAIL {
                        continue;
                    }
                }
                lex.scores.insert(word, SCALE_MAX);
            }
        }

        // Tech terms are kept unconditionally.
        let tech = dir.join("TECH_TERMS.json");
        if tech.exists() {
            for entry in read_wordvalue(&tech)?.wordvalue {
                let word = entry.english_word.trim().to_lowercase();
                if !word.is_empty() {
                    lex.scores.insert(word, SCALE_MAX);
                }
            }
        }

        // Frequency fallback for words with no explicit score: rare-in-English
        // words are the ones speakers keep in English, so they score high.
        // Explicit scores always win.
        for (word, z) in zipf {
            lex.scores
                .entry(word)
                .or_insert((SCALE_MAX - z).clamp(0.0, SCALE_MAX));
        }

        Ok(lex)
    }

    /// Familiarity score for a word, or None when out-of-vocabulary.
    /// OOV words are never eligible for restoration.
    pub fn familiarity(&self, word: &str) -> Option<f32> {
        self.scores.get(&word.trim().to_lowercase()).copied()
    }

    pub fn eligible(&self, word: &str, threshold: f32) -> bool {
        self.familiarity(word).is_some_and(|s| s >= threshold)
    }

    pub fn max_score(&self) -> f32 {
        self.scores.values().copied().fold(0.0, f32::max)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

fn read_wordvalue(path: &Path) -> MixResult<WordValueFile> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| MixError::LexiconLoad(format!("read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| MixError::LexiconLoad(format!("parse {}: {e}", path.display())))
}

/// Optional zipf frequency table (`wordfreq_en.json`: word → zipf value).
fn load_zipf_table(dir: &Path) -> MixResult<HashMap<String, f32>> {
    let path = dir.join("wordfreq_en.json");
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let text = std::fs::read_to_string(&path)
        .map_err(|e| MixError::LexiconLoad(format!("read {}: {e}", path.display())))?;
    let raw: HashMap<String, f32> = serde_json::from_str(&text)
        .map_err(|e| MixError::LexiconLoad(format!("parse {}: {e}", path.display())))?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| (k.to_lowercase(), v))
        .collect())
}
