//! Post-Romanization polish. Raw transliteration output reads academic;
//! colloquial code-mixed text drops final schwas in the northern languages
//! and prefers certain consonant spellings per language.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::langtab::LangSpec;

static PUNCT_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+([,\.\?\!\;\:])").expect("punct spacing regex"));

pub fn polish(roman: &str, lang: &LangSpec) -> String {
    let mut text = roman.to_string();
    for (from, to) in lang.phonetic_fixes {
        text = text.replace(from, to);
    }
    if lang.schwa_deletion {
        text = text
            .split(' ')
            .map(|w| delete_final_schwa(w, lang.protected_suffixes))
            .collect::<Vec<_>>()
            .join(" ");
    }
    text
}

/// Drops a word-final inherent 'a' unless the penultimate letter is a vowel
/// or the ending is a protected suffix.
fn delete_final_schwa(word: &str, protected: &[&str]) -> String {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() <= 3 || *chars.last().expect("non-empty") != 'a' {
        return word.to_string();
    }
    let penultimate = chars[chars.len() - 2];
    if matches!(penultimate, 'a' | 'e' | 'i' | 'o' | 'u') {
        return word.to_string();
    }
    if protected.iter().any(|suf| word.ends_with(suf)) {
        return word.to_string();
    }
    chars[..chars.len() - 1].iter().collect()
}

/// Detaches no punctuation, only closes gaps the tokenized reassembly left
/// before sentence punctuation.
pub fn fix_punct_spacing(text: &str) -> String {
    PUNCT_SPACE_RE.replace_all(text, "$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::langtab::by_code;

    #[test]
    fn hindi_phonetic_fixes_apply() {
        let hi = by_code("hi").expect("hi");
        assert_eq!(polish("phir", hi), "fir");
        assert_eq!(polish("wah", hi), "vah");
    }

    #[test]
    fn schwa_deletion_respects_protection() {
        let hi = by_code("hi").expect("hi");
        // 'aasha' penultimate is a vowel: kept.
        assert_eq!(polish("aasha", hi), "aasha");
        // 'samjha' ends in protected 'ha': kept.
        assert_eq!(polish("samjha", hi), "samjha");
        // Unprotected final schwa after a consonant: dropped.
        assert_eq!(polish("bheeda", hi), "bheeda"); // 'da' protected too
        assert_eq!(polish("kitaba", hi), "kitab");
    }

    #[test]
    fn dravidian_languages_keep_final_a() {
        let ta = by_code("ta").expect("ta");
        assert_eq!(polish("vanakkam inga", ta), "vanakkam inga");
    }

    #[test]
    fn punct_spacing_closes_gaps() {
        assert_eq!(fix_punct_spacing("kaise hain ?"), "kaise hain?");
        assert_eq!(fix_punct_spacing("haan , theek"), "haan, theek");
    }
}
