use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use tracing::error;

use saldo_animacy::config::{self, Config};
use saldo_animacy::logging::init_tracing;
use saldo_animacy::pipeline::{run_join, run_sample, JoinArgs, SampleArgs};

#[derive(Parser, Debug)]
#[command(version, about = "SALDO animacy classification and frequency-stratified sampling")]
struct Cli {
    /// Optional TOML run configuration; flags override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Join lexicon animacy and paths with lemma frequencies.
    Join {
        /// Path to saldo.xml (LMF format).
        #[arg(long)]
        saldo_xml: PathBuf,
        /// Frequency stats file: plain, .gz or single-file .zip.
        #[arg(long)]
        stats: PathBuf,
        /// Output TSV (writtenForm, lemgram, frequency, animacy, path).
        #[arg(long, default_value = "lemma_freq_animacy_paths.tsv")]
        out: PathBuf,
        /// Lemgrams seen in the frequency data but not in the lexicon.
        #[arg(long, default_value = "unmatched_lemgrams.txt")]
        unmatched: PathBuf,
    },
    /// Frequency-stratified sampling of animate vs inanimate lemmas.
    Sample {
        /// Join output TSV.
        #[arg(long)]
        tsv: PathBuf,
        /// Number of items per class.
        #[arg(long)]
        n: usize,
        /// Quantile bins on log10(frequency).
        #[arg(long)]
        bins: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        out_prefix: Option<String>,
        /// Optional JSON report of the run.
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut project_config = match &cli.config {
        Some(path) => config::load_config_from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Command::Join {
            saldo_xml,
            stats,
            out,
            unmatched,
        } => {
            run_join(
                &project_config,
                &JoinArgs {
                    saldo_xml,
                    stats,
                    out,
                    unmatched,
                },
            )?;
        }
        Command::Sample {
            tsv,
            n,
            bins,
            seed,
            out_prefix,
            report,
        } => {
            let sampling = &mut project_config.sampling;
            if let Some(bins) = bins {
                sampling.bins = bins;
            }
            if let Some(seed) = seed {
                sampling.seed = seed;
            }
            if let Some(prefix) = out_prefix {
                sampling.out_prefix = prefix;
            }
            project_config.validate()?;

            run_sample(&SampleArgs {
                tsv,
                n,
                bins: project_config.sampling.bins,
                seed: project_config.sampling.seed,
                out_prefix: project_config.sampling.out_prefix.clone(),
                report,
            })?;
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let cli = Cli::parse();
    run(cli).map_err(|e| {
        error!("{}", e);
        e
    })
}
