//! Verb Lemmatization
//!
//! Irregular-form lookup plus tag-directed suffix rules, lowercased output.
//! Only the governing verb of a noun chunk goes through this path, so the
//! rule set is scoped to verbal inflection: the Penn tag decides which
//! suffix family applies (VBZ -> -s, VBD/VBN -> -ed, VBG -> -ing), and base
//! forms pass through untouched.

use rustc_hash::FxHashMap;
use std::sync::OnceLock;

static IRREGULAR: OnceLock<FxHashMap<&'static str, &'static str>> = OnceLock::new();

fn irregular_forms() -> &'static FxHashMap<&'static str, &'static str> {
    IRREGULAR.get_or_init(|| {
        let pairs: &[(&str, &str)] = &[
            ("is", "be"),
            ("am", "be"),
            ("are", "be"),
            ("was", "be"),
            ("were", "be"),
            ("been", "be"),
            ("being", "be"),
            ("has", "have"),
            ("had", "have"),
            ("having", "have"),
            ("does", "do"),
            ("did", "do"),
            ("done", "do"),
            ("doing", "do"),
            ("goes", "go"),
            ("went", "go"),
            ("gone", "go"),
            ("going", "go"),
            ("made", "make"),
            ("said", "say"),
            ("saw", "see"),
            ("seen", "see"),
            ("found", "find"),
            ("gave", "give"),
            ("given", "give"),
            ("got", "get"),
            ("gotten", "get"),
            ("ran", "run"),
            ("came", "come"),
            ("knew", "know"),
            ("known", "know"),
            ("thought", "think"),
            ("showed", "show"),
            ("shown", "show"),
            ("wrote", "write"),
            ("written", "write"),
            ("built", "build"),
            ("brought", "bring"),
            ("held", "hold"),
            ("kept", "keep"),
            ("led", "lead"),
            ("left", "leave"),
            ("meant", "mean"),
            ("met", "meet"),
            ("paid", "pay"),
            ("sent", "send"),
            ("told", "tell"),
            ("took", "take"),
            ("taken", "take"),
            ("understood", "understand"),
        ];
        pairs.iter().copied().collect()
    })
}

const DOUBLED: [&str; 8] = ["bb", "dd", "gg", "mm", "nn", "pp", "rr", "tt"];

fn ends_doubled(stem: &str) -> bool {
    DOUBLED.iter().any(|d| stem.ends_with(d))
}

fn is_vowel(c: u8) -> bool {
    matches!(c, b'a' | b'e' | b'i' | b'o' | b'u')
}

/// Short stems ending consonant-vowel-consonant usually lost a final "e"
/// during inflection (mak-ing, us-ed, writ-ing).
fn wants_final_e(stem: &str) -> bool {
    let b = stem.as_bytes();
    let n = b.len();
    if n < 2 || n > 4 {
        return false;
    }
    let last = b[n - 1];
    if !last.is_ascii_alphabetic() || is_vowel(last) || matches!(last, b'w' | b'x' | b'y') {
        return false;
    }
    if !is_vowel(b[n - 2]) {
        return false;
    }
    n == 2 || !is_vowel(b[n - 3])
}

fn strip_suffix(word: &str, suffix: &str) -> String {
    let stem = &word[..word.len() - suffix.len()];
    if ends_doubled(stem) {
        stem[..stem.len() - 1].to_string()
    } else if wants_final_e(stem) {
        format!("{}e", stem)
    } else {
        stem.to_string()
    }
}

fn strip_s(word: &str) -> String {
    if word.len() > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if word.len() > 4
        && ["sses", "shes", "ches", "xes", "zes", "oes"]
            .iter()
            .any(|s| word.ends_with(s))
    {
        return word[..word.len() - 2].to_string();
    }
    if word.len() > 2 && word.ends_with('s') && !word.ends_with("ss") {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

fn strip_ed(word: &str) -> String {
    if word.len() > 4 && word.ends_with("ied") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if word.len() > 5 && word.ends_with("eed") {
        // agreed -> agree
        return word[..word.len() - 1].to_string();
    }
    if word.len() > 3 && word.ends_with("ed") {
        return strip_suffix(word, "ed");
    }
    word.to_string()
}

fn strip_ing(word: &str) -> String {
    if word.len() > 4 && word.ends_with("ing") {
        return strip_suffix(word, "ing");
    }
    word.to_string()
}

/// Lemmatize an English verb form given its Penn Treebank tag, lowercased.
pub fn lemmatize_verb(word: &str, tag: &str) -> String {
    let word = word.to_lowercase();

    if let Some(lemma) = irregular_forms().get(word.as_str()) {
        return (*lemma).to_string();
    }

    match tag {
        "VBZ" => strip_s(&word),
        "VBD" | "VBN" => strip_ed(&word),
        "VBG" => strip_ing(&word),
        _ => word,
    }
}
