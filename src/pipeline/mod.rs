//! The mixing pipeline: Translate -> Romanize -> Selective-Restore.
//!
//! The pipeline is a pure policy over its collaborators: it holds no
//! request-scoped state, so a `Mixer` can be shared across threads freely.
//! Translation always sees the full sentence (masked or not) so the target
//! language's word order survives; restoration only swaps surface forms.

mod config;

pub use config::{PipelineConfig, RomanizerChoice, TranslatorChoice};

use std::sync::Arc;

use crate::error::{MixError, MixResult, Stage};
use crate::langtab::LangSpec;
use crate::lexicon::Lexicon;
use crate::mask::{mask_tokens, restore_slots, MaskedSentence, SlotStyle};
use crate::polish::{fix_punct_spacing, polish};
use crate::romanize::Romanizer;
use crate::target::{MixTarget, TransTarget};
use crate::tokenize::{clean_word, is_word, normalize_quotes, tokenize};
use crate::translate::Translator;

pub const DEFAULT_THRESHOLD: f32 = 7.0;

const SOURCE_LANG: &str = "en";

/// Structural contractions never stay English on their own; they belong to
/// the verb the translator rewrites.
const CONTRACTIONS: [&str; 8] = ["n't", "'s", "'m", "'re", "'ll", "'ve", "'d", "nt"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RestoreStrategy {
    /// Keep chunks ride through the translator as slot tokens; exact under
    /// arbitrary reordering.
    #[default]
    Mask,
    /// Post-hoc substitution by source token index into the romanized
    /// tokens; positions past the romanized length are skipped.
    Align,
}

impl RestoreStrategy {
    pub fn parse(s: &str) -> Option<RestoreStrategy> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mask" => Some(RestoreStrategy::Mask),
            "align" => Some(RestoreStrategy::Align),
            _ => None,
        }
    }
}

pub struct Mixer {
    translator: Arc<dyn Translator>,
    romanizer: Arc<dyn Romanizer>,
    lexicon: Arc<Lexicon>,
    default_threshold: f32,
    strategy: RestoreStrategy,
}

/// Per-input preparation before the batched translate call.
enum Prep {
    /// Blank input: passed through untouched, never sent upstream.
    Passthrough,
    /// FullMix, mask strategy.
    Masked(MaskedSentence),
    /// FullMix align strategy (indices to restore) or FullRoman (none).
    Plain { restore: Vec<(usize, String)> },
}

impl Mixer {
    pub fn new(
        translator: Arc<dyn Translator>,
        romanizer: Arc<dyn Romanizer>,
        lexicon: Arc<Lexicon>,
    ) -> Self {
        Self {
            translator,
            romanizer,
            lexicon,
            default_threshold: DEFAULT_THRESHOLD,
            strategy: RestoreStrategy::default(),
        }
    }

    pub fn with_default_threshold(mut self, threshold: f32) -> Self {
        self.default_threshold = threshold;
        self
    }

    pub fn with_strategy(mut self, strategy: RestoreStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Mixes one sentence. See `mix_batch` for semantics.
    pub fn mix(&self, input: &str, target: &MixTarget, threshold: Option<f32>) -> MixResult<String> {
        let mut out = self.mix_batch(std::slice::from_ref(&input.to_string()), target, threshold)?;
        Ok(out.pop().expect("one output per input"))
    }

    /// Mixes a batch, order-preserving, one output per input, each input
    /// processed with identical policy. Fail-fast: the first failing input
    /// aborts the whole batch with a typed error. Parameter validation
    /// happens before any collaborator call.
    pub fn mix_batch(
        &self,
        inputs: &[String],
        target: &MixTarget,
        threshold: Option<f32>,
    ) -> MixResult<Vec<String>> {
        let threshold = self.resolve_threshold(threshold)?;
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        match *target {
            MixTarget::ScriptConvert { from, to } => inputs
                .iter()
                .enumerate()
                .map(|(i, text)| {
                    self.romanizer
                        .transliterate(text, from, to)
                        .map_err(|e| e.at_item(i, Stage::Romanize))
                })
                .collect(),
            MixTarget::FullRoman(lang) => self.run_translated(inputs, lang, None),
            MixTarget::FullMix(lang) => self.run_translated(inputs, lang, Some(threshold)),
        }
    }

    /// Best-effort variant: each input gets its own pipeline run (including
    /// its own translate call), so one bad input cannot sink its neighbors.
    pub fn mix_batch_partial(
        &self,
        inputs: &[String],
        target: &MixTarget,
        threshold: Option<f32>,
    ) -> Vec<MixResult<String>> {
        inputs
            .iter()
            .enumerate()
            .map(|(i, text)| {
                self.mix_batch(std::slice::from_ref(text), target, threshold)
                    .map(|mut v| v.pop().expect("one output per input"))
                    .map_err(|e| match e {
                        // Inner runs are single-item; rewrite their index to
                        // the batch position.
                        MixError::Item { stage, source, .. } => {
                            MixError::Item { index: i, stage, source }
                        }
                        other => {
                            let stage = stage_of(&other);
                            other.at_item(i, stage)
                        }
                    })
            })
            .collect()
    }

    /// Shared FullMix/FullRoman path: prepare, translate once, render.
    /// `threshold` is Some only when restoration runs.
    fn run_translated(
        &self,
        inputs: &[String],
        lang: &'static LangSpec,
        threshold: Option<f32>,
    ) -> MixResult<Vec<String>> {
        let style = self.translator.slot_style();
        let mut preps: Vec<Prep> = Vec::with_capacity(inputs.len());
        let mut to_translate: Vec<String> = Vec::new();

        for input in inputs {
            if input.trim().is_empty() {
                preps.push(Prep::Passthrough);
                continue;
            }
            let text = normalize_quotes(input);
            let prep = match (threshold, self.strategy) {
                (Some(t), RestoreStrategy::Mask) => {
                    let tokens = tokenize(&text);
                    let keep = self.keep_decisions(&tokens, t);
                    Prep::Masked(mask_tokens(&tokens, &keep, style))
                }
                (Some(t), RestoreStrategy::Align) => {
                    let tokens = tokenize(&text);
                    let keep = self.keep_decisions(&tokens, t);
                    let restore = tokens
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| keep[*i])
                        .map(|(i, tok)| (i, tok.clone()))
                        .collect();
                    Prep::Plain { restore }
                }
                (None, _) => Prep::Plain { restore: Vec::new() },
            };
            match &prep {
                Prep::Masked(m) => to_translate.push(m.text.clone()),
                Prep::Plain { .. } => to_translate.push(text),
                Prep::Passthrough => unreachable!(),
            }
            preps.push(prep);
        }

        let translated = if to_translate.is_empty() {
            Vec::new()
        } else {
            self.translator
                .translate_batch(&to_translate, SOURCE_LANG, lang)?
        };
        if translated.len() != to_translate.len() {
            return Err(MixError::Translation(format!(
                "expected {} translations, got {}",
                to_translate.len(),
                translated.len()
            )));
        }

        let mut translated = translated.into_iter();
        preps
            .into_iter()
            .enumerate()
            .map(|(i, prep)| match prep {
                Prep::Passthrough => Ok(inputs[i].clone()),
                Prep::Masked(m) => {
                    let t = translated.next().expect("translation per prepared input");
                    self.render_masked(&t, &m, style, lang)
                        .map_err(|e| {
                            let stage = stage_of(&e);
                            e.at_item(i, stage)
                        })
                }
                Prep::Plain { restore } => {
                    let t = translated.next().expect("translation per prepared input");
                    self.render_plain(&t, &restore, lang)
                        .map_err(|e| {
                            let stage = stage_of(&e);
                            e.at_item(i, stage)
                        })
                }
            })
            .collect()
    }

    /// Keep-eligibility per token. Strictly lexicon-driven: OOV tokens and
    /// bare punctuation are never kept, whatever the threshold.
    fn keep_decisions(&self, tokens: &[String], threshold: f32) -> Vec<bool> {
        tokens
            .iter()
            .map(|tok| {
                if !is_word(tok) {
                    return false;
                }
                let clean = clean_word(tok).to_lowercase();
                if clean.is_empty() {
                    return false;
                }
                if CONTRACTIONS.contains(&clean.as_str()) || clean.ends_with("n't") {
                    return false;
                }
                self.lexicon.eligible(&clean, threshold)
            })
            .collect()
    }

    fn render_masked(
        &self,
        translated: &str,
        masked: &MaskedSentence,
        style: SlotStyle,
        lang: &'static LangSpec,
    ) -> MixResult<String> {
        let out = restore_slots(translated, &masked.slots, style, |span| {
            let roman = self
                .romanizer
                .transliterate(span, lang.script, TransTarget::Roman)?;
            Ok(polish(&roman, lang))
        })?;
        Ok(fix_punct_spacing(&out))
    }

    fn render_plain(
        &self,
        translated: &str,
        restore: &[(usize, String)],
        lang: &'static LangSpec,
    ) -> MixResult<String> {
        let roman = self
            .romanizer
            .transliterate(translated, lang.script, TransTarget::Roman)?;
        let roman = polish(&roman, lang);
        if restore.is_empty() {
            return Ok(fix_punct_spacing(&roman));
        }
        let mut toks = tokenize(&roman);
        for (idx, original) in restore {
            // Conservative alignment: positions the translation restructured
            // away stay romanized instead of being guessed.
            if let Some(slot) = toks.get_mut(*idx) {
                *slot = original.clone();
            }
        }
        Ok(fix_punct_spacing(&toks.join(" ")))
    }

    fn resolve_threshold(&self, threshold: Option<f32>) -> MixResult<f32> {
        let t = threshold.unwrap_or(self.default_threshold);
        if !t.is_finite() || t < 0.0 {
            return Err(MixError::InvalidParameter(format!(
                "threshold must be a finite number >= 0, got {t}"
            )));
        }
        Ok(t)
    }
}

/// Stage a pipeline error belongs to, for batch annotation.
fn stage_of(e: &MixError) -> Stage {
    match e {
        MixError::InvalidParameter(_) => Stage::Validate,
        MixError::Translation(_) => Stage::Translate,
        MixError::Transliteration(_) => Stage::Romanize,
        MixError::UpstreamUnavailable { stage, .. } => *stage,
        MixError::UnsupportedTarget(_) => Stage::Validate,
        MixError::Item { stage, .. } => *stage,
        MixError::LexiconLoad(_) => Stage::Validate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::langtab::by_code;
    use crate::romanize::BuiltinRomanizer;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Canned-map translator; unknown inputs pass through unchanged so slot
    /// tokens survive. Counts calls to prove validation short-circuits.
    struct FakeTranslator {
        map: HashMap<String, String>,
        style: SlotStyle,
        calls: AtomicUsize,
    }

    impl FakeTranslator {
        fn new(pairs: &[(&str, &str)], style: SlotStyle) -> Self {
            Self {
                map: pairs
                    .iter()
                    .map(|(a, b)| (a.to_string(), b.to_string()))
                    .collect(),
                style,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Translator for FakeTranslator {
        fn translate_batch(
            &self,
            texts: &[String],
            _source: &str,
            _target: &LangSpec,
        ) -> MixResult<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts
                .iter()
                .map(|t| self.map.get(t).cloned().unwrap_or_else(|| t.clone()))
                .collect())
        }

        fn slot_style(&self) -> SlotStyle {
            self.style
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    struct DownTranslator;

    impl Translator for DownTranslator {
        fn translate_batch(
            &self,
            _texts: &[String],
            _source: &str,
            _target: &LangSpec,
        ) -> MixResult<Vec<String>> {
            Err(MixError::UpstreamUnavailable {
                stage: Stage::Translate,
                detail: "connection refused".to_string(),
            })
        }

        fn slot_style(&self) -> SlotStyle {
            SlotStyle::Braced
        }

        fn name(&self) -> &str {
            "down"
        }
    }

    fn mixer_with(translator: Arc<dyn Translator>, lexicon: Lexicon) -> Mixer {
        Mixer::new(
            translator,
            Arc::new(BuiltinRomanizer::new()),
            Arc::new(lexicon),
        )
    }

    fn hinglish() -> MixTarget {
        MixTarget::FullMix(by_code("hi").expect("hi"))
    }

    #[test]
    fn full_mix_restores_familiar_word_after_sov_reorder() {
        // "Hello world" -> masked "{{0}} world"; the fake translator moves
        // the slot to the end, SOV-style.
        let tr = FakeTranslator::new(&[("{{0}} world", "{{0}}, दुनिया")], SlotStyle::Braced);
        let lex = Lexicon::from_scores([("hello", 8.0)]);
        let mixer = mixer_with(Arc::new(tr), lex);

        let out = mixer
            .mix("Hello world", &hinglish(), Some(7.0))
            .expect("mix");
        assert_eq!(out, "Hello, duniya");
    }

    #[test]
    fn full_roman_never_restores() {
        let tr = FakeTranslator::new(
            &[("Hello world", "हैलो दुनिया")],
            SlotStyle::Braced,
        );
        let lex = Lexicon::from_scores([("hello", 8.0), ("world", 8.0)]);
        let mixer = mixer_with(Arc::new(tr), lex);

        let target = MixTarget::FullRoman(by_code("hi").expect("hi"));
        let out = mixer.mix("Hello world", &target, Some(0.0)).expect("mix");
        assert!(!out.contains("Hello"), "{out}");
        assert!(!out.contains("world"), "{out}");
    }

    #[test]
    fn restoration_is_monotone_in_threshold() {
        let lex = Lexicon::from_scores([("hello", 8.0), ("thanks", 5.0)]);
        let tr = FakeTranslator::new(
            &[
                ("{{0}} friend", "{{0}} दोस्त"),
                ("{{0}} thanks friend", "{{0}} धन्यवाद दोस्त"),
                ("hello thanks friend", "हैलो धन्यवाद दोस्त"),
            ],
            SlotStyle::Braced,
        );
        let mixer = mixer_with(Arc::new(tr), lex);

        let restored_at = |t: f32| -> Vec<&'static str> {
            let out = mixer.mix("hello thanks friend", &hinglish(), Some(t)).expect("mix");
            ["hello", "thanks"]
                .into_iter()
                .filter(|w| out.split_whitespace().any(|o| o == *w))
                .collect()
        };

        let low = restored_at(0.0);
        let mid = restored_at(6.0);
        let high = restored_at(9.0);
        assert!(low.len() >= mid.len() && mid.len() >= high.len());
        for w in &mid {
            assert!(low.contains(w));
        }
        for w in &high {
            assert!(mid.contains(w));
        }
        assert_eq!(low, vec!["hello", "thanks"]);
        assert_eq!(mid, vec!["hello"]);
        assert!(high.is_empty());
    }

    #[test]
    fn threshold_above_maximum_equals_full_roman() {
        let lex = Lexicon::from_scores([("hello", 8.0)]);
        let tr = FakeTranslator::new(
            &[("hello world", "हैलो दुनिया"), ("{{0}} world", "{{0}} दुनिया")],
            SlotStyle::Braced,
        );
        let mixer = mixer_with(Arc::new(tr), lex);

        let out = mixer
            .mix("hello world", &hinglish(), Some(11.0))
            .expect("mix");
        assert!(!out.contains("hello"), "{out}");
    }

    #[test]
    fn oov_words_never_restore() {
        let lex = Lexicon::from_scores([("hello", 8.0)]);
        let tr = FakeTranslator::new(&[("{{0}} Pratik", "{{0}} प्रतीक")], SlotStyle::Braced);
        let mixer = mixer_with(Arc::new(tr), lex);

        // "Pratik" is OOV; threshold 0 still must not keep it.
        let out = mixer.mix("hello Pratik", &hinglish(), Some(0.0)).expect("mix");
        assert!(out.contains("hello"));
        assert!(!out.contains("Pratik"), "{out}");
    }

    #[test]
    fn contractions_are_never_kept() {
        let lex = Lexicon::from_scores([("n't", 9.0), ("don't", 9.0), ("go", 9.0)]);
        let tr = FakeTranslator::new(&[("don't {{0}}", "मत {{0}}")], SlotStyle::Braced);
        let mixer = mixer_with(Arc::new(tr), lex);

        let out = mixer.mix("don't go", &hinglish(), Some(0.0)).expect("mix");
        assert!(!out.contains("n't"), "{out}");
        assert!(out.contains("go"), "{out}");
    }

    #[test]
    fn invalid_threshold_rejected_before_collaborators() {
        let tr = Arc::new(FakeTranslator::new(&[], SlotStyle::Braced));
        let mixer = Mixer::new(
            tr.clone(),
            Arc::new(BuiltinRomanizer::new()),
            Arc::new(Lexicon::builtin()),
        );

        let err = mixer
            .mix("hello", &hinglish(), Some(-1.0))
            .expect_err("negative threshold");
        assert!(matches!(err, MixError::InvalidParameter(_)));
        let err = mixer
            .mix("hello", &hinglish(), Some(f32::NAN))
            .expect_err("nan threshold");
        assert!(matches!(err, MixError::InvalidParameter(_)));
        assert_eq!(tr.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn script_convert_skips_translation() {
        let tr = Arc::new(FakeTranslator::new(&[], SlotStyle::Braced));
        let mixer = Mixer::new(
            tr.clone(),
            Arc::new(BuiltinRomanizer::new()),
            Arc::new(Lexicon::builtin()),
        );

        let target = MixTarget::ScriptConvert {
            from: crate::langtab::Script::Devanagari,
            to: TransTarget::Roman,
        };
        let out = mixer.mix("आप कैसे हैं?", &target, None).expect("convert");
        assert_eq!(tr.calls.load(Ordering::SeqCst), 0);
        // 1:1 token mapping: word count preserved.
        assert_eq!(out.split_whitespace().count(), 3);
    }

    #[test]
    fn batch_preserves_order_and_matches_singles() {
        let lex = Lexicon::from_scores([("hello", 8.0), ("ok", 8.0)]);
        let tr = FakeTranslator::new(&[], SlotStyle::Braced);
        let mixer = mixer_with(Arc::new(tr), lex);

        let inputs = vec!["hello friend".to_string(), "ok bye".to_string()];
        let batch = mixer.mix_batch(&inputs, &hinglish(), Some(7.0)).expect("batch");
        let singles: Vec<String> = inputs
            .iter()
            .map(|s| mixer.mix(s, &hinglish(), Some(7.0)).expect("single"))
            .collect();
        assert_eq!(batch, singles);
    }

    #[test]
    fn upstream_failure_is_typed_not_partial() {
        let mixer = mixer_with(Arc::new(DownTranslator), Lexicon::builtin());
        let inputs = vec!["hello".to_string(), "bye".to_string()];
        let err = mixer
            .mix_batch(&inputs, &hinglish(), None)
            .expect_err("translator down");
        assert!(matches!(err, MixError::UpstreamUnavailable { .. }));

        // Best-effort mode reports each item's failure with its index.
        let results = mixer.mix_batch_partial(&inputs, &hinglish(), None);
        assert_eq!(results.len(), 2);
        for (i, r) in results.iter().enumerate() {
            match r {
                Err(MixError::Item { index, stage, .. }) => {
                    assert_eq!(*index, i);
                    assert_eq!(*stage, Stage::Translate);
                }
                other => panic!("expected item error, got {other:?}"),
            }
        }
    }

    #[test]
    fn blank_inputs_pass_through() {
        let mixer = mixer_with(
            Arc::new(FakeTranslator::new(&[], SlotStyle::Braced)),
            Lexicon::builtin(),
        );
        let inputs = vec!["  ".to_string(), String::new()];
        let out = mixer.mix_batch(&inputs, &hinglish(), None).expect("batch");
        assert_eq!(out, inputs);
    }

    #[test]
    fn align_strategy_substitutes_by_index() {
        let lex = Lexicon::from_scores([("hello", 8.0)]);
        let tr = FakeTranslator::new(
            &[("Hello world", "हैलो दुनिया")],
            SlotStyle::Braced,
        );
        let mixer = mixer_with(Arc::new(tr), lex).with_strategy(RestoreStrategy::Align);

        let out = mixer.mix("Hello world", &hinglish(), Some(7.0)).expect("mix");
        assert!(out.starts_with("Hello "), "{out}");
        assert!(!out.contains("world"), "{out}");
    }

    #[test]
    fn align_strategy_skips_out_of_range_positions() {
        let lex = Lexicon::from_scores([("please", 8.0)]);
        // Translation collapses to a single word: index 2 has nowhere to go.
        let tr = FakeTranslator::new(&[("come here please", "आइए")], SlotStyle::Braced);
        let mixer = mixer_with(Arc::new(tr), lex).with_strategy(RestoreStrategy::Align);

        let out = mixer.mix("come here please", &hinglish(), Some(0.0)).expect("mix");
        assert!(!out.contains("please"), "{out}");
    }
}
