use anyhow::Result;
use tracing::info_span;

use ctm_cli::pipeline::{PipelineConfig, inspect_criteria, run_pipeline};
use ctm_cli::types::{CriteriaSummary, MatchSummary};
use ctm_model::MatchOptions;

use crate::cli::{CriteriaArgs, MatchArgs, RecognizerArgs};

pub fn run_match(args: &MatchArgs) -> Result<MatchSummary> {
    let span = info_span!("match_run", dry_run = args.dry_run);
    let _guard = span.enter();

    let mut options = recognizer_options(&args.recognizer);
    if let Some(year) = args.reference_year {
        options = options.with_reference_year(year);
    }
    if args.sequential {
        options = options.sequential();
    } else if let Some(threads) = args.threads {
        options = options.with_threads(threads);
    }

    let config = PipelineConfig {
        patients_dir: args.patients_dir.clone(),
        trials_dir: args.trials_dir.clone(),
        options,
        lexicon: args.recognizer.lexicon.clone(),
        output_dir: (!args.dry_run).then(|| args.output_dir.clone()),
        format: args.format.into(),
    };
    run_pipeline(&config)
}

pub fn run_criteria(args: &CriteriaArgs) -> Result<CriteriaSummary> {
    let options = recognizer_options(&args.recognizer);
    inspect_criteria(&args.trials_dir, args.recognizer.lexicon.as_deref(), &options)
}

fn recognizer_options(args: &RecognizerArgs) -> MatchOptions {
    let options = MatchOptions::default();
    if args.disease_labels.is_empty() {
        options
    } else {
        options.with_disease_labels(args.disease_labels.clone())
    }
}
