//! Part-of-Speech Tagging
//!
//! Wraps the pretrained MobileBERT English POS pipeline behind a small trait
//! so the chunking and extraction logic can be exercised on hand-tagged
//! fixtures without loading model weights.

use anyhow::{Context, Result};
use rust_bert::mobilebert::{
    MobileBertConfigResources, MobileBertModelResources, MobileBertVocabResources,
};
use rust_bert::pipelines::common::{ModelResource, ModelType};
use rust_bert::pipelines::token_classification::{
    LabelAggregationOption, TokenClassificationConfig, TokenClassificationModel,
};
use rust_bert::resources::RemoteResource;

/// One word of a sentence with its Penn Treebank tag and the byte span of the
/// word in the original sentence string.
#[derive(Debug, Clone)]
pub struct TaggedToken {
    pub text: String,
    pub tag: String,
    pub start: usize,
    pub end: usize,
}

/// Source of Penn Treebank tags for a sentence.
pub trait PosTagger {
    fn tag_sentence(&self, sentence: &str) -> Result<Vec<TaggedToken>>;
}

/// Production tagger backed by the pretrained MobileBERT English POS model,
/// loaded once onto the best available device (CUDA if present, else CPU).
pub struct TransformerTagger {
    model: TokenClassificationModel,
}

impl TransformerTagger {
    pub fn new() -> Result<Self> {
        let config = TokenClassificationConfig::new(
            ModelType::MobileBert,
            ModelResource::Torch(Box::new(RemoteResource::from_pretrained(
                MobileBertModelResources::MOBILEBERT_ENGLISH_POS,
            ))),
            RemoteResource::from_pretrained(MobileBertConfigResources::MOBILEBERT_ENGLISH_POS),
            RemoteResource::from_pretrained(MobileBertVocabResources::MOBILEBERT_ENGLISH_POS),
            None,  // merges resource only relevant with ModelType::Roberta
            false, // lowercase
            false,
            None,
            LabelAggregationOption::First,
        );

        let model = TokenClassificationModel::new(config)
            .with_context(|| "Failed to load POS tagging model")?;

        Ok(Self { model })
    }
}

impl PosTagger for TransformerTagger {
    fn tag_sentence(&self, sentence: &str) -> Result<Vec<TaggedToken>> {
        // Consolidate sub-tokens into words, drop special tokens.
        let mut outputs = self.model.predict(&[sentence], true, false);
        let tokens = outputs
            .pop()
            .ok_or_else(|| anyhow::anyhow!("POS pipeline returned no output"))?;

        // Pipeline offsets are char-based; slicing the sentence needs bytes.
        let byte_of: Vec<usize> = sentence.char_indices().map(|(b, _)| b).collect();
        let char_to_byte = |idx: usize| -> usize {
            byte_of.get(idx).copied().unwrap_or_else(|| sentence.len())
        };

        let mut tagged = Vec::with_capacity(tokens.len());
        for token in tokens {
            let Some(offset) = token.offset else {
                continue;
            };
            let start = char_to_byte(offset.begin as usize);
            let end = char_to_byte(offset.end as usize);
            if start >= end {
                continue;
            }
            tagged.push(TaggedToken {
                text: sentence[start..end].to_string(),
                tag: token.label,
                start,
                end,
            });
        }
        Ok(tagged)
    }
}
