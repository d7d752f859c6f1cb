//! Masked-Language Scoring Backend
//!
//! Loads the pretrained RoBERTa-base masked LM and its byte-BPE tokenizer
//! once, onto CUDA when present, and turns one masked sentence into the
//! probability of each pronoun token filling the mask. Sequences longer than
//! the model window are recentered around the mask before inference.

use anyhow::{Context, Result};
use rust_bert::bert::BertConfig;
use rust_bert::resources::{RemoteResource, ResourceProvider};
use rust_bert::roberta::{
    RobertaConfigResources, RobertaForMaskedLM, RobertaMergesResources, RobertaModelResources,
    RobertaVocabResources,
};
use rust_bert::Config;
use rust_tokenizers::tokenizer::{RobertaTokenizer, Tokenizer, TruncationStrategy};
use rust_tokenizers::vocab::Vocab;
use tch::{nn, Device, Kind, Tensor};

use crate::pronouns::PRONOUNS;

/// Model input window, in tokens.
pub const MAX_SEQ_LEN: usize = 512;
const HALF_WINDOW: usize = MAX_SEQ_LEN / 2;

/// Produces one pronoun-probability vector per masked sentence.
///
/// `None` marks a sentence whose mask could not be located (a data-quality
/// failure, not a fatal error); callers keep going.
pub trait MaskPredictor {
    fn pronoun_probs(&self, masked_sentence: &str) -> Result<Option<Vec<f64>>>;
}

/// RoBERTa-base masked LM plus paired tokenizer.
pub struct MaskedLm {
    tokenizer: RobertaTokenizer,
    model: RobertaForMaskedLM,
    device: Device,
    mask_token_id: i64,
    pronoun_ids: Vec<i64>,
    // Keeps the loaded weights alive for the model's lifetime.
    _var_store: nn::VarStore,
}

impl MaskedLm {
    /// Download (or reuse cached) pretrained resources and load the model
    /// onto the best available device.
    pub fn new() -> Result<Self> {
        let config_resource = RemoteResource::from_pretrained(RobertaConfigResources::ROBERTA);
        let vocab_resource = RemoteResource::from_pretrained(RobertaVocabResources::ROBERTA);
        let merges_resource = RemoteResource::from_pretrained(RobertaMergesResources::ROBERTA);
        let weights_resource = RemoteResource::from_pretrained(RobertaModelResources::ROBERTA);

        let config_path = config_resource.get_local_path()?;
        let vocab_path = vocab_resource.get_local_path()?;
        let merges_path = merges_resource.get_local_path()?;
        let weights_path = weights_resource.get_local_path()?;

        let device = Device::cuda_if_available();
        let mut var_store = nn::VarStore::new(device);

        let tokenizer = RobertaTokenizer::from_file(
            vocab_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Invalid vocab path"))?,
            merges_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Invalid merges path"))?,
            false,
            false,
        )
        .with_context(|| "Failed to load RoBERTa tokenizer")?;

        let config = BertConfig::from_file(config_path);
        let model = RobertaForMaskedLM::new(var_store.root(), &config);
        var_store
            .load(weights_path)
            .with_context(|| "Failed to load RoBERTa weights")?;

        let mask_token_id = tokenizer.vocab().token_to_id("<mask>");
        let pronoun_ids = PRONOUNS
            .iter()
            .map(|term| tokenizer.vocab().token_to_id(term))
            .collect();

        println!("Masked language model loaded on {:?}", device);

        Ok(Self {
            tokenizer,
            model,
            device,
            mask_token_id,
            pronoun_ids,
            _var_store: var_store,
        })
    }
}

impl MaskPredictor for MaskedLm {
    fn pronoun_probs(&self, masked_sentence: &str) -> Result<Option<Vec<f64>>> {
        let encoded = self.tokenizer.encode(
            masked_sentence,
            None,
            MAX_SEQ_LEN,
            &TruncationStrategy::DoNotTruncate,
            0,
        );

        let Some((window, mask_pos)) = recenter_window(&encoded.token_ids, self.mask_token_id)
        else {
            log::warn!("No mask token found in: {}", masked_sentence);
            return Ok(None);
        };
        if window.len() < encoded.token_ids.len() {
            log::debug!(
                "Recentered {}-token sequence to the model window",
                encoded.token_ids.len()
            );
        }

        let input = Tensor::from_slice(&window)
            .to_device(self.device)
            .unsqueeze(0);
        let output = tch::no_grad(|| {
            self.model
                .forward_t(Some(&input), None, None, None, None, None, None, false)
        });

        let probs = output
            .prediction_scores
            .get(0)
            .get(mask_pos as i64)
            .softmax(-1, Kind::Float);
        let scores = self
            .pronoun_ids
            .iter()
            .map(|&id| probs.double_value(&[id]))
            .collect();

        Ok(Some(scores))
    }
}

/// Locate the mask and, if the sequence exceeds the model window, slice a
/// nominally symmetric window around it, clamped at the sequence boundaries.
///
/// Returns the (possibly windowed) token ids and the mask position within
/// them; `None` when no mask token is present at all.
pub fn recenter_window(token_ids: &[i64], mask_token_id: i64) -> Option<(Vec<i64>, usize)> {
    let mask_pos = token_ids.iter().position(|&id| id == mask_token_id)?;

    if token_ids.len() <= MAX_SEQ_LEN {
        return Some((token_ids.to_vec(), mask_pos));
    }

    let mut start = mask_pos.saturating_sub(HALF_WINDOW);
    if start + MAX_SEQ_LEN > token_ids.len() {
        start = token_ids.len() - MAX_SEQ_LEN;
    }
    let window = token_ids[start..start + MAX_SEQ_LEN].to_vec();
    Some((window, mask_pos - start))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASK: i64 = -1;

    #[test]
    fn test_short_sequence_is_untouched() {
        let ids = vec![0, 5, MASK, 7, 2];
        let (window, pos) = recenter_window(&ids, MASK).unwrap();
        assert_eq!(window, ids);
        assert_eq!(pos, 2);
    }

    #[test]
    fn test_missing_mask_yields_none() {
        let ids = vec![0, 5, 7, 2];
        assert!(recenter_window(&ids, MASK).is_none());
    }

    #[test]
    fn test_long_sequence_centers_on_mask() {
        // Mask deep inside a 2000-token sequence.
        let mut ids: Vec<i64> = (0..2000).collect();
        ids[1000] = MASK;
        let (window, pos) = recenter_window(&ids, MASK).unwrap();
        assert_eq!(window.len(), MAX_SEQ_LEN);
        assert_eq!(window[pos], MASK);
        assert_eq!(pos, HALF_WINDOW);
    }

    #[test]
    fn test_window_clamps_at_sequence_start() {
        let mut ids: Vec<i64> = (0..2000).collect();
        ids[10] = MASK;
        let (window, pos) = recenter_window(&ids, MASK).unwrap();
        assert_eq!(window.len(), MAX_SEQ_LEN);
        assert_eq!(pos, 10);
        assert_eq!(window[pos], MASK);
        assert_eq!(window[0], 0);
    }

    #[test]
    fn test_window_clamps_at_sequence_end() {
        let mut ids: Vec<i64> = (0..2000).collect();
        ids[1990] = MASK;
        let (window, pos) = recenter_window(&ids, MASK).unwrap();
        assert_eq!(window.len(), MAX_SEQ_LEN);
        assert_eq!(window[pos], MASK);
        assert_eq!(pos, MAX_SEQ_LEN - (2000 - 1990));
        assert_eq!(*window.last().unwrap(), 1999);
    }
}
