//! Noun-Phrase Chunking and Clause-Role Labeling
//!
//! Deterministic passes over Penn-tagged tokens: base noun phrases are
//! maximal modifier+noun runs (a possessive marker closes a phrase), verb
//! groups are contiguous auxiliary/verb runs, and each chunk is assigned the
//! clause role the extractor filters on (nsubj/dobj, plus the excluded roles
//! nsubjpass/attr/pobj/poss for diagnostics).

use smallvec::SmallVec;

use super::lemma::lemmatize_verb;
use super::tagger::TaggedToken;

/// Clause role of a noun chunk relative to its governing verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepRole {
    /// Nominal subject of an active clause.
    Nsubj,
    /// Subject of a passive clause.
    NsubjPass,
    /// Direct object.
    Dobj,
    /// Predicate nominal after a copula.
    Attr,
    /// Object of a preposition.
    Pobj,
    /// Possessor (closed off by a possessive marker).
    Poss,
    /// Unattached.
    Dep,
}

impl DepRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepRole::Nsubj => "nsubj",
            DepRole::NsubjPass => "nsubjpass",
            DepRole::Dobj => "dobj",
            DepRole::Attr => "attr",
            DepRole::Pobj => "pobj",
            DepRole::Poss => "poss",
            DepRole::Dep => "dep",
        }
    }
}

/// One base noun phrase with its role and governing-verb lemma.
#[derive(Debug, Clone)]
pub struct NounChunk {
    /// Exact substring of the sentence covered by the chunk.
    pub text: String,
    pub role: DepRole,
    /// Lemma of the clause verb the chunk attaches to; empty when unattached.
    pub verb: String,
}

fn is_noun(tag: &str) -> bool {
    matches!(tag, "NN" | "NNS" | "NNP" | "NNPS" | "PRP")
}

fn is_np_modifier(tag: &str) -> bool {
    matches!(tag, "DT" | "PDT" | "PRP$" | "JJ" | "JJR" | "JJS" | "CD")
}

fn is_verb(tag: &str) -> bool {
    matches!(tag, "VB" | "VBD" | "VBG" | "VBN" | "VBP" | "VBZ" | "MD")
}

fn is_adverb(tag: &str) -> bool {
    matches!(tag, "RB" | "RBR" | "RBS")
}

fn is_be_or_get(word: &str) -> bool {
    matches!(
        word.to_lowercase().as_str(),
        "be" | "am" | "is" | "are" | "was" | "were" | "been" | "being" | "get" | "gets" | "got"
    )
}

#[derive(Debug)]
struct VerbGroup {
    start: usize,
    end: usize, // inclusive token index of last member
    lemma: String,
    passive: bool,
    copular: bool,
}

/// Token index span of one chunk, inclusive.
#[derive(Debug)]
struct ChunkSpan {
    start: usize,
    end: usize,
}

fn find_verb_groups(tokens: &[TaggedToken]) -> Vec<VerbGroup> {
    let mut groups = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if !is_verb(&tokens[i].tag) {
            i += 1;
            continue;
        }
        let start = i;
        let mut main = i;
        let mut j = i + 1;
        while j < tokens.len() && (is_verb(&tokens[j].tag) || is_adverb(&tokens[j].tag)) {
            if is_verb(&tokens[j].tag) {
                main = j;
            }
            j += 1;
        }
        let end = j - 1;

        let lemma = lemmatize_verb(&tokens[main].text, &tokens[main].tag);
        // "is designed", "gets used": auxiliary be/get followed by a past
        // participle head marks the clause passive.
        let passive = tokens[main].tag == "VBN"
            && tokens[start..main].iter().any(|t| is_be_or_get(&t.text));
        let copular = lemma == "be";

        groups.push(VerbGroup {
            start,
            end,
            lemma,
            passive,
            copular,
        });
        i = end + 1;
    }
    groups
}

fn find_chunk_spans(tokens: &[TaggedToken]) -> Vec<ChunkSpan> {
    let mut spans = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if !(is_np_modifier(&tokens[i].tag) || is_noun(&tokens[i].tag)) {
            i += 1;
            continue;
        }
        let start = i;
        let mut has_noun = false;
        let mut last_noun = i;
        while i < tokens.len() && (is_np_modifier(&tokens[i].tag) || is_noun(&tokens[i].tag)) {
            if is_noun(&tokens[i].tag) {
                has_noun = true;
                last_noun = i;
            }
            i += 1;
        }
        if has_noun {
            // Trailing modifiers after the last noun belong to the next
            // phrase, not this one.
            spans.push(ChunkSpan {
                start,
                end: last_noun,
            });
        }
    }
    spans
}

/// True when every token in the (exclusive) index range is an adverb.
fn only_adverbs_between(tokens: &[TaggedToken], from: usize, to: usize) -> bool {
    tokens[from..to].iter().all(|t| is_adverb(&t.tag))
}

/// Chunk a tagged sentence and assign clause roles.
///
/// `sentence` must be the string the token spans index into; chunk text is
/// sliced from it so downstream mask substitution operates on exact
/// substrings.
pub fn analyze(sentence: &str, tokens: &[TaggedToken]) -> Vec<NounChunk> {
    let groups = find_verb_groups(tokens);
    let spans = find_chunk_spans(tokens);

    let mut chunks: SmallVec<[NounChunk; 8]> = SmallVec::new();
    for span in &spans {
        let text = sentence[tokens[span.start].start..tokens[span.end].end].to_string();

        // Possessor: the chunk is immediately closed by a possessive marker.
        if tokens.get(span.end + 1).map(|t| t.tag.as_str()) == Some("POS") {
            chunks.push(NounChunk {
                text,
                role: DepRole::Poss,
                verb: String::new(),
            });
            continue;
        }

        // Prepositional object: governed by the preposition right before it.
        if span.start > 0 && matches!(tokens[span.start - 1].tag.as_str(), "IN" | "TO") {
            chunks.push(NounChunk {
                text,
                role: DepRole::Pobj,
                verb: String::new(),
            });
            continue;
        }

        // Subject: the chunk directly precedes a verb group (adverbs may
        // intervene: "It often errs").
        let next_group = groups
            .iter()
            .find(|g| g.start > span.end && only_adverbs_between(tokens, span.end + 1, g.start));
        if let Some(group) = next_group {
            chunks.push(NounChunk {
                text,
                role: if group.passive {
                    DepRole::NsubjPass
                } else {
                    DepRole::Nsubj
                },
                verb: group.lemma.clone(),
            });
            continue;
        }

        // Object or predicate: the chunk directly follows a verb group.
        let prev_group = groups
            .iter()
            .rev()
            .find(|g| g.end < span.start && only_adverbs_between(tokens, g.end + 1, span.start));
        if let Some(group) = prev_group {
            chunks.push(NounChunk {
                text,
                role: if group.copular {
                    DepRole::Attr
                } else {
                    DepRole::Dobj
                },
                verb: group.lemma.clone(),
            });
            continue;
        }

        chunks.push(NounChunk {
            text,
            role: DepRole::Dep,
            verb: String::new(),
        });
    }

    chunks.into_vec()
}
