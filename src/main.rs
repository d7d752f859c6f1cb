//! AnthroScore command-line pipeline: extract entity-mention sentences from
//! a CSV corpus, mask them, score each mask with a masked LM, and report the
//! corpus-average AnthroScore.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use anthroscore::{
    data, extract, score, EntitySet, MaskedLm, TransformerTagger,
};

#[derive(Parser, Debug)]
#[command(name = "anthroscore")]
#[command(about = "Compute AnthroScore for a set of entities across a set of texts")]
#[command(version)]
struct Args {
    /// Input CSV file of text(s) to compute AnthroScore on
    #[arg(long)]
    input_file: PathBuf,

    /// Column of the input CSV containing the text(s)
    #[arg(long)]
    text_column_name: String,

    /// Entities to compute AnthroScore for
    #[arg(
        long,
        num_args = 1..,
        conflicts_with = "entity_filename",
        required_unless_present = "entity_filename"
    )]
    entities: Vec<String>,

    /// Newline-delimited .txt file of entities to compute AnthroScore for
    #[arg(long)]
    entity_filename: Option<PathBuf>,

    /// Where to store parsed sentences with AnthroScores
    /// (defaults to <input stem>_parsed.csv)
    #[arg(long)]
    output_file: Option<PathBuf>,

    /// ID column to record for every sentence parsed, optional
    #[arg(long)]
    text_id_name: Option<String>,

    /// Optional JSON file for the run summary
    #[arg(long)]
    summary_file: Option<PathBuf>,
}

fn default_output_path(input: &PathBuf) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_parsed.csv", stem))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let output_file = args
        .output_file
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input_file));

    // Fail fast on malformed arguments before any model loads.
    data::validate_csv_extension(&args.input_file)?;
    data::validate_csv_extension(&output_file)?;
    let entities = data::load_entities(&args.entities, args.entity_filename.as_deref())?;
    let entity_set = EntitySet::new(&entities)?;

    // Both pretrained components are initialized once, up front.
    let tagger = TransformerTagger::new()?;
    let masked_lm = MaskedLm::new()?;

    extract::parse_sentences_from_file(
        &args.input_file,
        &entity_set,
        &args.text_column_name,
        args.text_id_name.as_deref(),
        &output_file,
        &tagger,
    )?;

    let report = score::score_file(&output_file, &args.input_file, &masked_lm)?;

    println!(
        "Average AnthroScore in {}: {:.3}",
        report.input_file, report.mean_anthroscore
    );
    println!(
        "AnthroScores for each sentence saved in {}",
        report.output_file
    );

    if let Some(summary_path) = &args.summary_file {
        score::write_summary(&report, summary_path)?;
        println!("Run summary saved in {}", summary_path.display());
    }

    Ok(())
}
