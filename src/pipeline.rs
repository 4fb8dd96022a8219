use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::lexicon::aggregator::{aggregate, join_frequencies};
use crate::lexicon::animacy::AnimacyClassifier;
use crate::parsing::freq_parser::{build_lemgram_frequencies, FrequencyStats};
use crate::parsing::lmf_parser::{parse_lmf_file, LexiconStats};
use crate::parsing::record_tsv::{
    read_sampler_input, write_records, write_staged, write_unmatched, ReadStats,
};
use crate::report_io::{save_sampling_report, SamplingReport};
use crate::sampling::sampler::{stratified_sample, ClassSample, CLASS_ORDER};
use crate::types::lexicon_data::Animacy;

/// Inputs of the join command, resolved from CLI flags and config.
#[derive(Debug, Clone)]
pub struct JoinArgs {
    pub saldo_xml: PathBuf,
    pub stats: PathBuf,
    pub out: PathBuf,
    pub unmatched: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinSummary {
    pub lexicon: LexiconStats,
    pub frequency: FrequencyStats,
    pub records: usize,
    pub animate: usize,
    pub inanimate: usize,
    pub unknown: usize,
    pub unmatched: usize,
}

/// Classifies the lexicon, joins it with the frequency table and writes the
/// join TSV plus the unmatched report. Both files are staged and moved into
/// place only once both were written.
pub fn run_join(config: &Config, args: &JoinArgs) -> Result<JoinSummary> {
    info!("[1/4] Parsing lexicon {}", args.saldo_xml.display());
    let parsed = parse_lmf_file(&args.saldo_xml)?;
    info!(
        entries = parsed.stats.entries,
        senses = parsed.stats.senses,
        primary_edges = parsed.stats.primary_edges,
        skipped_entries = parsed.stats.skipped_entries,
        skipped_senses = parsed.stats.skipped_senses,
        declared_senses = parsed.graph.declared_sense_count(),
        "lexicon loaded"
    );

    info!("[2/4] Building lemma frequencies (NN only) from {}", args.stats.display());
    let (frequencies, frequency_stats) = build_lemgram_frequencies(&args.stats)?;
    info!(
        lemgrams = frequencies.len(),
        rows_kept = frequency_stats.kept,
        rows_skipped = frequency_stats.skipped,
        "frequencies loaded"
    );

    info!("[3/4] Aggregating animacy and paths per lemgram");
    let roots = config.lexicon.animate_root_set();
    let mut classifier = AnimacyClassifier::new(&parsed.graph, &roots);
    let aggregation = aggregate(&mut classifier, &config.lexicon.noun_pos);

    info!("[4/4] Joining and writing {}", args.out.display());
    let joined = join_frequencies(&parsed.graph, &aggregation, &frequencies);
    write_staged(&[args.out.as_path(), args.unmatched.as_path()], |staged| {
        write_records(&staged[0], &joined.records)?;
        write_unmatched(&staged[1], &joined.unmatched)
    })?;

    let count = |label: Animacy| joined.records.iter().filter(|r| r.animacy == label).count();
    let summary = JoinSummary {
        lexicon: parsed.stats,
        frequency: frequency_stats,
        records: joined.records.len(),
        animate: count(Animacy::Animate),
        inanimate: count(Animacy::Inanimate),
        unknown: count(Animacy::Unknown),
        unmatched: joined.unmatched.len(),
    };
    info!(
        rows = summary.records,
        animate = summary.animate,
        inanimate = summary.inanimate,
        unknown = summary.unknown,
        "Done. Wrote {}",
        args.out.display()
    );
    info!(
        "Unmatched lemgrams: {} (see {})",
        summary.unmatched,
        args.unmatched.display()
    );
    Ok(summary)
}

/// Inputs of the sample command, resolved from CLI flags and config.
#[derive(Debug, Clone)]
pub struct SampleArgs {
    pub tsv: PathBuf,
    pub n: usize,
    pub bins: usize,
    pub seed: u64,
    pub out_prefix: String,
    pub report: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSummary {
    pub input: ReadStats,
    pub effective_bins: usize,
    pub animate: usize,
    pub inanimate: usize,
    pub animate_path: PathBuf,
    pub inanimate_path: PathBuf,
}

pub fn sample_output_paths(prefix: &str) -> (PathBuf, PathBuf) {
    (
        PathBuf::from(format!("{}_animate.tsv", prefix)),
        PathBuf::from(format!("{}_inanimate.tsv", prefix)),
    )
}

fn log_class(class: &ClassSample) {
    let mut per_bin = vec![0usize; class.capacity.len()];
    for &bin in &class.record_bins {
        per_bin[bin] += 1;
    }
    info!(
        class = %class.animacy,
        n = class.records.len(),
        population = class.population,
        "per-bin counts {:?}",
        per_bin
    );
}

/// Draws the two stratified samples from a join TSV and writes them.
pub fn run_sample(args: &SampleArgs) -> Result<SampleSummary> {
    let (records, input) = read_sampler_input(&args.tsv)?;
    info!(
        kept = input.kept,
        unknown = input.unknown_label,
        non_positive = input.non_positive,
        malformed = input.malformed,
        "read {}",
        args.tsv.display()
    );

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let sample = stratified_sample(&records, args.n, args.bins, &mut rng)?;
    info!(
        requested_bins = args.bins,
        effective_bins = sample.binning.bin_count(),
        "desired per bin {:?}",
        sample.desired_per_bin
    );

    let (animate_path, inanimate_path) = sample_output_paths(&args.out_prefix);
    write_staged(&[animate_path.as_path(), inanimate_path.as_path()], |staged| {
        write_records(&staged[0], &sample.animate.records)?;
        write_records(&staged[1], &sample.inanimate.records)
    })?;
    for class in CLASS_ORDER.iter().filter_map(|&a| sample.class(a)) {
        log_class(class);
    }

    if let Some(report_path) = &args.report {
        let report = SamplingReport::from_sample(&sample, args.bins, args.seed);
        save_sampling_report(&report, report_path)?;
        info!("report written to {}", report_path.display());
    }

    Ok(SampleSummary {
        input,
        effective_bins: sample.binning.bin_count(),
        animate: sample.animate.records.len(),
        inanimate: sample.inanimate.records.len(),
        animate_path,
        inanimate_path,
    })
}
