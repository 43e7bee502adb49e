//! Static registry for the 22 scheduled Indic languages: script, FLORES-200
//! code, and the Romanization polish rules that differ per language.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Script {
    Devanagari,
    Bengali,
    Gurmukhi,
    Gujarati,
    Oriya,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
    Arabic,
    OlChiki,
}

impl Script {
    /// Start of the Unicode block for the Brahmic scripts whose layout is
    /// codepoint-parallel to Devanagari. Non-parallel scripts return None and
    /// are outside the builtin romanizer's coverage.
    pub fn brahmic_block(self) -> Option<u32> {
        match self {
            Script::Devanagari => Some(0x0900),
            Script::Bengali => Some(0x0980),
            Script::Gurmukhi => Some(0x0A00),
            Script::Gujarati => Some(0x0A80),
            Script::Oriya => Some(0x0B00),
            Script::Tamil => Some(0x0B80),
            Script::Telugu => Some(0x0C00),
            Script::Kannada => Some(0x0C80),
            Script::Malayalam => Some(0x0D00),
            Script::Arabic | Script::OlChiki => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Script::Devanagari => "Devanagari",
            Script::Bengali => "Bengali",
            Script::Gurmukhi => "Gurmukhi",
            Script::Gujarati => "Gujarati",
            Script::Oriya => "Oriya",
            Script::Tamil => "Tamil",
            Script::Telugu => "Telugu",
            Script::Kannada => "Kannada",
            Script::Malayalam => "Malayalam",
            Script::Arabic => "Arabic",
            Script::OlChiki => "OlChiki",
        }
    }

    pub fn parse(s: &str) -> Option<Script> {
        let s = s.trim();
        ALL_SCRIPTS
            .iter()
            .copied()
            .find(|sc| sc.name().eq_ignore_ascii_case(s))
    }
}

pub const ALL_SCRIPTS: [Script; 11] = [
    Script::Devanagari,
    Script::Bengali,
    Script::Gurmukhi,
    Script::Gujarati,
    Script::Oriya,
    Script::Tamil,
    Script::Telugu,
    Script::Kannada,
    Script::Malayalam,
    Script::Arabic,
    Script::OlChiki,
];

#[derive(Clone, Copy, Debug)]
pub struct LangSpec {
    /// ISO-639 code used on the wire and in target strings.
    pub code: &'static str,
    /// Display name, accepted in `<Name>_Mix` target strings.
    pub name: &'static str,
    pub script: Script,
    /// FLORES-200 code for the IndicTrans2-style backend.
    pub flores: &'static str,
    /// Indo-Aryan final-schwa deletion applies to the Romanized output.
    pub schwa_deletion: bool,
    /// Word endings exempt from schwa deletion.
    pub protected_suffixes: &'static [&'static str],
    /// Ordered post-Romanization replacements (longest patterns first).
    pub phonetic_fixes: &'static [(&'static str, &'static str)],
}

const NORTH_SUFFIXES: &[&str] = &[
    "na", "la", "ta", "da", "ga", "ya", "ka", "ra", "ha", "ma", "ja",
];
const VOWEL_ENDINGS: &[&str] = &["a", "i", "u", "e", "o"];

pub static LANGS: &[LangSpec] = &[
    LangSpec {
        code: "hi",
        name: "Hindi",
        script: Script::Devanagari,
        flores: "hin_Deva",
        schwa_deletion: true,
        protected_suffixes: NORTH_SUFFIXES,
        phonetic_fixes: &[("Phr", "Fr"), ("phr", "fr"), ("Ph", "F"), ("ph", "f"), ("w", "v")],
    },
    LangSpec {
        code: "bn",
        name: "Bengali",
        script: Script::Bengali,
        flores: "ben_Beng",
        schwa_deletion: false,
        protected_suffixes: &["o", "a"],
        phonetic_fixes: &[("v", "b"), ("V", "B"), ("w", "b")],
    },
    LangSpec {
        code: "ta",
        name: "Tamil",
        script: Script::Tamil,
        flores: "tam_Taml",
        schwa_deletion: false,
        protected_suffixes: VOWEL_ENDINGS,
        phonetic_fixes: &[("zh", "l"), ("th", "dh")],
    },
    LangSpec {
        code: "te",
        name: "Telugu",
        script: Script::Telugu,
        flores: "tel_Telu",
        schwa_deletion: false,
        protected_suffixes: VOWEL_ENDINGS,
        phonetic_fixes: &[("th", "d"), ("T", "t")],
    },
    LangSpec {
        code: "mr",
        name: "Marathi",
        script: Script::Devanagari,
        flores: "mar_Deva",
        schwa_deletion: true,
        protected_suffixes: NORTH_SUFFIXES,
        phonetic_fixes: &[("Phr", "Fr"), ("phr", "fr"), ("zh", "jh")],
    },
    LangSpec {
        code: "gu",
        name: "Gujarati",
        script: Script::Gujarati,
        flores: "guj_Gujr",
        schwa_deletion: true,
        protected_suffixes: &["na", "la", "ta", "da", "ga", "ya", "ka"],
        phonetic_fixes: &[],
    },
    LangSpec {
        code: "kn",
        name: "Kannada",
        script: Script::Kannada,
        flores: "kan_Knda",
        schwa_deletion: false,
        protected_suffixes: VOWEL_ENDINGS,
        phonetic_fixes: &[],
    },
    LangSpec {
        code: "ml",
        name: "Malayalam",
        script: Script::Malayalam,
        flores: "mal_Mlym",
        schwa_deletion: false,
        protected_suffixes: VOWEL_ENDINGS,
        phonetic_fixes: &[("zh", "l"), ("th", "d")],
    },
    LangSpec {
        code: "pa",
        name: "Punjabi",
        script: Script::Gurmukhi,
        flores: "pan_Guru",
        schwa_deletion: true,
        protected_suffixes: &["na", "la", "ta"],
        phonetic_fixes: &[("bh", "p"), ("dh", "t")],
    },
    LangSpec {
        code: "or",
        name: "Odia",
        script: Script::Oriya,
        flores: "ory_Orya",
        schwa_deletion: false,
        protected_suffixes: &[],
        phonetic_fixes: &[("v", "b"), ("w", "b")],
    },
    LangSpec {
        code: "as",
        name: "Assamese",
        script: Script::Bengali,
        flores: "asm_Beng",
        schwa_deletion: false,
        protected_suffixes: &[],
        phonetic_fixes: &[("ch", "s"), ("v", "b"), ("w", "b")],
    },
    LangSpec {
        code: "ur",
        name: "Urdu",
        script: Script::Arabic,
        flores: "urd_Arab",
        schwa_deletion: true,
        protected_suffixes: &["ah", "eh"],
        phonetic_fixes: &[("q", "k"), ("z", "j")],
    },
    LangSpec {
        code: "sa",
        name: "Sanskrit",
        script: Script::Devanagari,
        flores: "san_Deva",
        schwa_deletion: false,
        protected_suffixes: &["a", "i", "u", "e", "o", "m", "h"],
        phonetic_fixes: &[],
    },
    LangSpec {
        code: "ne",
        name: "Nepali",
        script: Script::Devanagari,
        flores: "npi_Deva",
        schwa_deletion: false,
        protected_suffixes: &[],
        phonetic_fixes: &[],
    },
    LangSpec {
        code: "sd",
        name: "Sindhi",
        script: Script::Arabic,
        flores: "snd_Arab",
        schwa_deletion: true,
        protected_suffixes: &[],
        phonetic_fixes: &[],
    },
    LangSpec {
        code: "ks",
        name: "Kashmiri",
        script: Script::Arabic,
        flores: "kas_Arab",
        schwa_deletion: true,
        protected_suffixes: &[],
        phonetic_fixes: &[],
    },
    LangSpec {
        code: "gom",
        name: "Konkani",
        script: Script::Devanagari,
        flores: "gom_Deva",
        schwa_deletion: true,
        protected_suffixes: &[],
        phonetic_fixes: &[],
    },
    LangSpec {
        code: "mai",
        name: "Maithili",
        script: Script::Devanagari,
        flores: "mai_Deva",
        schwa_deletion: true,
        protected_suffixes: &[],
        phonetic_fixes: &[],
    },
    LangSpec {
        code: "doi",
        name: "Dogri",
        script: Script::Devanagari,
        flores: "doi_Deva",
        schwa_deletion: true,
        protected_suffixes: &[],
        phonetic_fixes: &[],
    },
    LangSpec {
        code: "brx",
        name: "Bodo",
        script: Script::Devanagari,
        flores: "brx_Deva",
        schwa_deletion: true,
        protected_suffixes: &[],
        phonetic_fixes: &[],
    },
    LangSpec {
        code: "mni",
        name: "Manipuri",
        script: Script::Bengali,
        flores: "mni_Beng",
        schwa_deletion: false,
        protected_suffixes: &[],
        phonetic_fixes: &[],
    },
    LangSpec {
        code: "sat",
        name: "Santali",
        script: Script::OlChiki,
        flores: "sat_Olck",
        schwa_deletion: false,
        protected_suffixes: &[],
        phonetic_fixes: &[],
    },
];

pub fn by_code(code: &str) -> Option<&'static LangSpec> {
    let code = code.trim();
    LANGS.iter().find(|l| l.code.eq_ignore_ascii_case(code))
}

pub fn by_name(name: &str) -> Option<&'static LangSpec> {
    let name = name.trim();
    LANGS.iter().find(|l| l.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(by_code("HI").map(|l| l.name), Some("Hindi"));
        assert_eq!(by_name("tamil").map(|l| l.code), Some("ta"));
        assert!(by_code("xx").is_none());
    }

    #[test]
    fn brahmic_blocks_cover_registry_scripts() {
        for lang in LANGS {
            match lang.script {
                Script::Arabic | Script::OlChiki => {
                    assert!(lang.script.brahmic_block().is_none());
                }
                s => assert!(s.brahmic_block().is_some(), "{}", lang.code),
            }
        }
    }
}
