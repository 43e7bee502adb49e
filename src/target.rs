//! Target strings arrive at the boundary as opaque tags (`Hindi_Mix`,
//! `Roman_ta`, `Convert_Devanagari`). They are parsed once into a closed
//! variant here; nothing downstream matches on strings.

use crate::error::MixError;
use crate::langtab::{by_code, by_name, LangSpec, Script};

/// Output side of a script conversion: Latin, or another Indic script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransTarget {
    Roman,
    Script(Script),
}

impl std::fmt::Display for TransTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransTarget::Roman => f.write_str("Roman"),
            TransTarget::Script(s) => f.write_str(s.name()),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum MixTarget {
    /// Translate, Romanize, then restore familiar English words.
    FullMix(&'static LangSpec),
    /// Translate and Romanize everything; no restoration.
    FullRoman(&'static LangSpec),
    /// No translation: transliterate the input script directly.
    ScriptConvert { from: Script, to: TransTarget },
}

impl MixTarget {
    /// Mix targets named after the colloquial blend rather than the language.
    const BLEND_ALIASES: [(&'static str, &'static str); 3] =
        [("Hinglish", "hi"), ("Tanglish", "ta"), ("Benglish", "bn")];

    pub fn parse(s: &str) -> Result<MixTarget, MixError> {
        let raw = s.trim();
        let unsupported = || MixError::UnsupportedTarget(raw.to_string());

        if let Some(stem) = raw.strip_suffix("_Mix") {
            for (alias, code) in Self::BLEND_ALIASES {
                if stem.eq_ignore_ascii_case(alias) {
                    return by_code(code).map(MixTarget::FullMix).ok_or_else(unsupported);
                }
            }
            return by_name(stem)
                .or_else(|| by_code(stem))
                .map(MixTarget::FullMix)
                .ok_or_else(unsupported);
        }

        if let Some(stem) = raw.strip_prefix("Roman_") {
            return by_code(stem)
                .or_else(|| by_name(stem))
                .map(MixTarget::FullRoman)
                .ok_or_else(unsupported);
        }

        if let Some(stem) = raw.strip_prefix("Convert_") {
            let mut parts = stem.splitn(2, '_');
            let from = parts.next().and_then(Script::parse).ok_or_else(unsupported)?;
            let to = match parts.next() {
                None => TransTarget::Roman,
                Some(name) if name.eq_ignore_ascii_case("Roman") => TransTarget::Roman,
                Some(name) => TransTarget::Script(Script::parse(name).ok_or_else(unsupported)?),
            };
            return Ok(MixTarget::ScriptConvert { from, to });
        }

        Err(unsupported())
    }

    /// Whether the restoration pass runs for this target.
    pub fn restores(&self) -> bool {
        matches!(self, MixTarget::FullMix(_))
    }
}

impl std::fmt::Display for MixTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MixTarget::FullMix(l) => write!(f, "{}_Mix", l.name),
            MixTarget::FullRoman(l) => write!(f, "Roman_{}", l.code),
            MixTarget::ScriptConvert { from, to } => {
                write!(f, "Convert_{}_{}", from.name(), to)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mix_targets() {
        assert!(matches!(
            MixTarget::parse("Hindi_Mix").unwrap(),
            MixTarget::FullMix(l) if l.code == "hi"
        ));
        assert!(matches!(
            MixTarget::parse("Hinglish_Mix").unwrap(),
            MixTarget::FullMix(l) if l.code == "hi"
        ));
        assert!(matches!(
            MixTarget::parse("Tanglish_Mix").unwrap(),
            MixTarget::FullMix(l) if l.code == "ta"
        ));
    }

    #[test]
    fn parses_roman_and_convert_targets() {
        assert!(matches!(
            MixTarget::parse("Roman_hi").unwrap(),
            MixTarget::FullRoman(l) if l.code == "hi"
        ));
        assert!(matches!(
            MixTarget::parse("Convert_Devanagari").unwrap(),
            MixTarget::ScriptConvert { from: Script::Devanagari, to: TransTarget::Roman }
        ));
        assert!(matches!(
            MixTarget::parse("Convert_Devanagari_Kannada").unwrap(),
            MixTarget::ScriptConvert {
                from: Script::Devanagari,
                to: TransTarget::Script(Script::Kannada)
            }
        ));
    }

    #[test]
    fn rejects_unknown_targets() {
        for bad in ["xx_Mix", "Roman_xx", "Convert_Klingon", "plain", ""] {
            assert!(matches!(
                MixTarget::parse(bad),
                Err(MixError::UnsupportedTarget(_))
            ));
        }
    }
}
