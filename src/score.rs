//! Anthropomorphism Scorer
//!
//! Walks the persisted sentence-match table one row at a time, reads the
//! pronoun probability mass at each mask, and derives the per-sentence
//! AnthroScore and the corpus average. Rows whose mask cannot be resolved
//! score NaN and flow through unfiltered.

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;
use std::path::Path;

use crate::data;
use crate::mlm::MaskPredictor;
use crate::pronouns::partition_mass;

/// Progress/maintenance interval, in sentences.
pub const REPORT_INTERVAL: usize = 100;

/// Outcome of one scoring run.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub input_file: String,
    pub output_file: String,
    pub sentence_count: usize,
    pub mean_anthroscore: f64,
}

/// Log ratio of human- to non-human-pronoun probability mass.
///
/// Zero mass in either group produces a non-finite score; that is the
/// documented behavior, not an error.
pub fn anthroscore_from_probs(probs: &[f64]) -> f64 {
    let (human, nonhuman) = partition_mass(probs);
    human.ln() - nonhuman.ln()
}

/// Score every row of the persisted sentence table, append the `anthroscore`
/// column, rewrite the table in place, and return the corpus report.
///
/// Strictly sequential: one sentence, one inference call at a time. Tensor
/// buffers from each iteration are released when it ends; the fixed-interval
/// hook reports progress during long runs.
pub fn score_file<M: MaskPredictor>(
    table_path: &Path,
    input_path: &Path,
    predictor: &M,
) -> Result<ScoreReport> {
    let mut df = data::read_sentence_table(table_path)?;
    let masked = data::column_as_string(&df, "masked_sentence")?;

    let mut scores: Vec<f64> = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        if idx > 0 && idx % REPORT_INTERVAL == 0 {
            println!("Calculating sentence {}", idx);
        }
        let score = match masked.get(idx) {
            Some(sentence) if !sentence.trim().is_empty() => {
                match predictor.pronoun_probs(sentence)? {
                    Some(probs) => anthroscore_from_probs(&probs),
                    None => f64::NAN,
                }
            }
            _ => {
                log::warn!("Row {} has no masked sentence", idx);
                f64::NAN
            }
        };
        scores.push(score);
    }

    let mean = mean_score(&scores);
    df.with_column(Series::new("anthroscore".into(), scores.clone()))
        .with_context(|| "Failed to append anthroscore column")?;
    data::write_csv(&mut df, table_path)?;

    Ok(ScoreReport {
        input_file: input_path.display().to_string(),
        output_file: table_path.display().to_string(),
        sentence_count: scores.len(),
        mean_anthroscore: mean,
    })
}

/// Arithmetic mean; non-finite row scores propagate into the result.
fn mean_score(scores: &[f64]) -> f64 {
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Persist the run report as pretty-printed JSON.
pub fn write_summary(report: &ScoreReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .with_context(|| "Failed to serialize run summary")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write summary: {}", path.display()))?;
    Ok(())
}
