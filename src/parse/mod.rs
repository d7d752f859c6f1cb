//! Syntactic Analysis Layer
//!
//! Turns raw sentences into noun chunks with clause roles and governing-verb
//! lemmas, the inputs the extractor filters on. Tagging is delegated to a
//! pretrained token-classification pipeline; chunking, role labeling, and
//! lemmatization are deterministic passes over the tags.

pub mod chunker;
pub mod lemma;
pub mod tagger;

pub use chunker::{analyze, DepRole, NounChunk};
pub use lemma::lemmatize_verb;
pub use tagger::{PosTagger, TaggedToken, TransformerTagger};
