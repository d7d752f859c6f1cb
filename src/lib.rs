//! AnthroScore Rust Implementation
//!
//! Corpus-level measurement of how anthropomorphically target entities are
//! portrayed in a collection of texts:
//! - `data`: CSV corpus and entity-list loading with Polars
//! - `parse/`: POS tagging, noun-phrase chunking, clause-role labeling
//! - `extract`: sentence matches with masked entity mentions
//! - `mlm`: pretrained RoBERTa masked-LM probability extraction
//! - `score`: per-sentence log-ratio scores and the corpus average
//!
//! The two pipeline stages (extractor, scorer) share only the persisted
//! sentence-match table; each is independently runnable.

pub mod data;
pub mod extract;
pub mod mlm;
pub mod parse;
pub mod pronouns;
pub mod score;

// Re-export commonly used types
pub use data::{load_entities, InputError};
pub use extract::{parse_sentences_from_file, EntitySet, SentenceMatch, MASK_PLACEHOLDER};
pub use mlm::{MaskPredictor, MaskedLm};
pub use parse::{PosTagger, TaggedToken, TransformerTagger};
pub use score::{score_file, ScoreReport};
