//! Sentence Extractor
//!
//! Scans the corpus for sentences where a target entity heads a subject or
//! direct-object noun phrase, masks the mention, and persists one row per
//! match to the intermediate table the scorer consumes.

use anyhow::{Context, Result};
use polars::prelude::*;
use regex::Regex;
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

use crate::data;
use crate::parse::{analyze, DepRole, PosTagger};

/// Placeholder substituted for the matched noun phrase; must match the
/// masked-language model's mask token.
pub const MASK_PLACEHOLDER: &str = "<mask>";

/// One entity mention in subject or object position.
///
/// Immutable once created; one row of the intermediate table.
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceMatch {
    pub sentence: String,
    pub masked_sentence: String,
    pub text_id: String,
    /// Dependency role label (nsubj or dobj).
    pub pos: String,
    /// Lemma of the governing verb.
    pub verb: String,
    /// The entity term that matched.
    pub original_term: String,
    /// The matched noun phrase, lowercased.
    pub original_noun: String,
}

/// Whole-word patterns for the target entities.
///
/// Entities are interpolated verbatim into `\b...\b` (no escaping, so an
/// entity may itself be a regex fragment) and tested against the lowercased
/// chunk text.
pub struct EntitySet {
    patterns: Vec<(String, Regex)>,
}

impl EntitySet {
    pub fn new(entities: &[String]) -> Result<Self> {
        let mut patterns = Vec::with_capacity(entities.len());
        for entity in entities {
            let pattern = format!(r"\b{}\b", entity);
            let regex = Regex::new(&pattern)
                .with_context(|| format!("Invalid entity pattern: {}", pattern))?;
            patterns.push((entity.clone(), regex));
        }
        Ok(Self { patterns })
    }

    /// Every entity whose whole-word pattern occurs in the candidate text.
    fn matching_terms<'a>(&'a self, candidate: &str) -> Vec<&'a str> {
        self.patterns
            .iter()
            .filter(|(_, regex)| regex.is_match(candidate))
            .map(|(entity, _)| entity.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Extract all sentence matches from one text.
///
/// A sentence yields one match per qualifying (noun phrase, entity) pair; no
/// deduplication across repeated sentences.
pub fn extract_from_text<P: PosTagger>(
    text: &str,
    text_id: &str,
    entities: &EntitySet,
    tagger: &P,
) -> Result<Vec<SentenceMatch>> {
    let mut matches = Vec::new();

    for raw_sentence in text.unicode_sentences() {
        let sentence = raw_sentence.trim();
        if sentence.is_empty() {
            continue;
        }

        let tokens = tagger.tag_sentence(sentence)?;
        for chunk in analyze(sentence, &tokens) {
            if !matches!(chunk.role, DepRole::Nsubj | DepRole::Dobj) {
                continue;
            }
            let chunk_lower = chunk.text.to_lowercase();
            for term in entities.matching_terms(&chunk_lower) {
                // First textual occurrence only; the chunk text is an exact
                // substring of the sentence.
                let masked_sentence = sentence.replacen(&chunk.text, MASK_PLACEHOLDER, 1);
                matches.push(SentenceMatch {
                    sentence: sentence.to_string(),
                    masked_sentence,
                    text_id: text_id.to_string(),
                    pos: chunk.role.as_str().to_string(),
                    verb: chunk.verb.clone(),
                    original_term: term.to_string(),
                    original_noun: chunk_lower.clone(),
                });
            }
        }
    }

    Ok(matches)
}

/// Extract matches from every row of the corpus frame.
pub fn extract_from_frame<P: PosTagger>(
    df: &DataFrame,
    entities: &EntitySet,
    text_column: &str,
    id_column: Option<&str>,
    default_id: &str,
    tagger: &P,
) -> Result<Vec<SentenceMatch>> {
    let texts = data::column_as_string(df, text_column)?;
    let ids = id_column
        .map(|name| data::column_as_string(df, name))
        .transpose()?;

    let mut matches = Vec::new();
    for idx in 0..df.height() {
        let Some(text) = texts.get(idx) else {
            continue;
        };
        if text.trim().is_empty() {
            log::debug!("Skipping blank text row {}", idx);
            continue;
        }
        let text_id = ids
            .as_ref()
            .and_then(|ids| ids.get(idx))
            .unwrap_or(default_id);
        matches.extend(extract_from_text(text, text_id, entities, tagger)?);
    }
    Ok(matches)
}

/// Assemble the intermediate table in its on-disk column order.
pub fn matches_to_frame(matches: &[SentenceMatch]) -> Result<DataFrame> {
    let df = df!(
        "sentence" => matches.iter().map(|m| m.sentence.as_str()).collect::<Vec<_>>(),
        "masked_sentence" => matches.iter().map(|m| m.masked_sentence.as_str()).collect::<Vec<_>>(),
        "text_id" => matches.iter().map(|m| m.text_id.as_str()).collect::<Vec<_>>(),
        "POS" => matches.iter().map(|m| m.pos.as_str()).collect::<Vec<_>>(),
        "verb" => matches.iter().map(|m| m.verb.as_str()).collect::<Vec<_>>(),
        "original_term" => matches.iter().map(|m| m.original_term.as_str()).collect::<Vec<_>>(),
        "original_noun" => matches.iter().map(|m| m.original_noun.as_str()).collect::<Vec<_>>(),
    )
    .with_context(|| "Failed to build sentence-match table")?;
    Ok(df)
}

/// Run extraction end to end: load the corpus, collect matches, persist the
/// intermediate table, and report the count found.
pub fn parse_sentences_from_file<P: PosTagger>(
    input_path: &Path,
    entities: &EntitySet,
    text_column: &str,
    id_column: Option<&str>,
    output_path: &Path,
    tagger: &P,
) -> Result<usize> {
    let corpus = data::load_corpus(input_path, text_column, id_column)?;
    let default_id = input_path.display().to_string();
    let matches = extract_from_frame(
        &corpus,
        entities,
        text_column,
        id_column,
        &default_id,
        tagger,
    )?;

    let mut table = matches_to_frame(&matches)?;
    data::write_csv(&mut table, output_path)?;

    println!("{} sentences containing target entities found", matches.len());
    Ok(matches.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::TaggedToken;
    use rustc_hash::FxHashMap;

    /// Lookup tagger over a fixed lexicon, whitespace/punctuation tokenized.
    struct FixtureTagger {
        lexicon: FxHashMap<&'static str, &'static str>,
    }

    impl FixtureTagger {
        fn new() -> Self {
            let lexicon: FxHashMap<&'static str, &'static str> = [
                ("the", "DT"),
                ("a", "DT"),
                ("system", "NN"),
                ("model", "NN"),
                ("ecosystem", "NN"),
                ("output", "NN"),
                ("tool", "NN"),
                ("researchers", "NNS"),
                ("data", "NNS"),
                ("it", "PRP"),
                ("helps", "VBZ"),
                ("performs", "VBZ"),
                ("errs", "VBZ"),
                ("analyzes", "VBZ"),
                ("use", "VBP"),
                ("is", "VBZ"),
                ("thrives", "VBZ"),
                ("often", "RB"),
                ("well", "RB"),
                ("impressive", "JJ"),
                ("'s", "POS"),
                (".", "."),
            ]
            .into_iter()
            .collect();
            Self { lexicon }
        }
    }

    impl PosTagger for FixtureTagger {
        fn tag_sentence(&self, sentence: &str) -> Result<Vec<TaggedToken>> {
            let mut tokens = Vec::new();
            let mut push = |text: &str, start: usize| {
                let tag = self
                    .lexicon
                    .get(text.to_lowercase().as_str())
                    .copied()
                    .unwrap_or("NN");
                tokens.push(TaggedToken {
                    text: text.to_string(),
                    tag: tag.to_string(),
                    start,
                    end: start + text.len(),
                });
            };
            for (start, word) in sentence.split_word_bound_indices() {
                if word.trim().is_empty() {
                    continue;
                }
                // UAX #29 keeps "system's" as one segment; the real tagger
                // emits the clitic as its own POS-tagged token.
                if let Some(stem) = word.strip_suffix("'s") {
                    push(stem, start);
                    push("'s", start + stem.len());
                } else {
                    push(word, start);
                }
            }
            Ok(tokens)
        }
    }

    fn entity_set(entities: &[&str]) -> EntitySet {
        let owned: Vec<String> = entities.iter().map(|e| e.to_string()).collect();
        EntitySet::new(&owned).unwrap()
    }

    #[test]
    fn test_subject_match_is_masked() {
        let tagger = FixtureTagger::new();
        let entities = entity_set(&["system"]);
        let matches =
            extract_from_text("The system helps researchers.", "doc1", &entities, &tagger)
                .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].sentence, "The system helps researchers.");
        assert_eq!(matches[0].masked_sentence, "<mask> helps researchers.");
        assert_eq!(matches[0].pos, "nsubj");
        assert_eq!(matches[0].verb, "help");
        assert_eq!(matches[0].original_term, "system");
        assert_eq!(matches[0].original_noun, "the system");
    }

    #[test]
    fn test_object_match() {
        let tagger = FixtureTagger::new();
        let entities = entity_set(&["system"]);
        let matches =
            extract_from_text("Researchers use the system.", "doc1", &entities, &tagger).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].masked_sentence, "Researchers use <mask>.");
        assert_eq!(matches[0].pos, "dobj");
        assert_eq!(matches[0].verb, "use");
    }

    #[test]
    fn test_possessive_modifier_is_not_matched() {
        let tagger = FixtureTagger::new();
        let entities = entity_set(&["system"]);
        let matches = extract_from_text(
            "The system's output is impressive.",
            "doc1",
            &entities,
            &tagger,
        )
        .unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_whole_word_boundary() {
        let tagger = FixtureTagger::new();
        let entities = entity_set(&["system"]);
        // "ecosystem" contains "system" as a substring but not as a word.
        let matches =
            extract_from_text("The ecosystem thrives.", "doc1", &entities, &tagger).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_one_match_per_qualifying_sentence() {
        let tagger = FixtureTagger::new();
        let entities = entity_set(&["model"]);
        let matches = extract_from_text(
            "The model performs well. It often errs.",
            "doc1",
            &entities,
            &tagger,
        )
        .unwrap();
        // Only the first sentence mentions the entity; "It" does not match.
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].sentence, "The model performs well.");
        assert_eq!(matches[0].masked_sentence, "<mask> performs well.");
        assert_eq!(matches[0].pos, "nsubj");
        assert_eq!(matches[0].verb, "perform");
    }

    #[test]
    fn test_multiple_entities_matching_one_chunk() {
        let tagger = FixtureTagger::new();
        let entities = entity_set(&["system", "model"]);
        let matches = extract_from_text(
            "The model system helps researchers.",
            "doc1",
            &entities,
            &tagger,
        )
        .unwrap();
        // One row per matching entity term for the same chunk.
        assert_eq!(matches.len(), 2);
        let terms: Vec<&str> = matches.iter().map(|m| m.original_term.as_str()).collect();
        assert!(terms.contains(&"system"));
        assert!(terms.contains(&"model"));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let tagger = FixtureTagger::new();
        let entities = entity_set(&["system"]);
        let text = "The system helps researchers. Researchers use the system.";
        let first = extract_from_text(text, "doc1", &entities, &tagger).unwrap();
        let second = extract_from_text(text, "doc1", &entities, &tagger).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_matches_to_frame_schema() {
        let tagger = FixtureTagger::new();
        let entities = entity_set(&["system"]);
        let matches =
            extract_from_text("The system helps researchers.", "doc1", &entities, &tagger)
                .unwrap();
        let df = matches_to_frame(&matches).unwrap();
        assert_eq!(df.height(), matches.len());
        let names: Vec<&str> = df.get_column_names().iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "sentence",
                "masked_sentence",
                "text_id",
                "POS",
                "verb",
                "original_term",
                "original_noun"
            ]
        );
    }
}
