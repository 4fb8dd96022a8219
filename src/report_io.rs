use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{AnimacyError, Result};
use crate::sampling::quantile::quantile_sorted;
use crate::sampling::sampler::{ClassSample, StratifiedSample};
use crate::types::lexicon_data::Animacy;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FrequencySummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub max: f64,
}

impl FrequencySummary {
    pub fn from_counts(frequencies: &[u64]) -> Option<Self> {
        let mut sorted: Vec<f64> = frequencies.iter().map(|&f| f as f64).collect();
        sorted.sort_by(f64::total_cmp);
        let q = |p| quantile_sorted(&sorted, p);
        Some(FrequencySummary {
            count: sorted.len(),
            mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
            min: q(0.0)?,
            p10: q(0.1)?,
            p25: q(0.25)?,
            p50: q(0.5)?,
            p75: q(0.75)?,
            p90: q(0.9)?,
            max: q(1.0)?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClassReport {
    pub animacy: Animacy,
    pub population: usize,
    pub sample_size: usize,
    pub capacity_per_bin: Vec<usize>,
    pub sampled_per_bin: Vec<usize>,
    pub frequency: Option<FrequencySummary>,
}

impl ClassReport {
    fn from_sample(class: &ClassSample, bin_count: usize) -> Self {
        let mut sampled_per_bin = vec![0usize; bin_count];
        for &bin in &class.record_bins {
            sampled_per_bin[bin] += 1;
        }
        let frequencies: Vec<u64> = class.records.iter().map(|r| r.frequency).collect();
        ClassReport {
            animacy: class.animacy,
            population: class.population,
            sample_size: class.records.len(),
            capacity_per_bin: class.capacity.clone(),
            sampled_per_bin,
            frequency: FrequencySummary::from_counts(&frequencies),
        }
    }
}

/// Snapshot of one sampling run, written next to the sample files.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SamplingReport {
    pub requested_per_class: usize,
    pub requested_bins: usize,
    pub effective_bins: usize,
    pub seed: u64,
    pub log10_edges: Vec<f64>,
    pub combined_per_bin: Vec<usize>,
    pub desired_per_bin: Vec<usize>,
    pub classes: Vec<ClassReport>,
}

impl SamplingReport {
    pub fn from_sample(sample: &StratifiedSample, requested_bins: usize, seed: u64) -> Self {
        let bin_count = sample.binning.bin_count();
        SamplingReport {
            requested_per_class: sample.requested,
            requested_bins,
            effective_bins: bin_count,
            seed,
            log10_edges: sample.binning.edges.clone(),
            combined_per_bin: sample.binning.counts.clone(),
            desired_per_bin: sample.desired_per_bin.clone(),
            classes: vec![
                ClassReport::from_sample(&sample.animate, bin_count),
                ClassReport::from_sample(&sample.inanimate, bin_count),
            ],
        }
    }
}

/// Saves the report as pretty-printed JSON.
pub fn save_sampling_report(report: &SamplingReport, file_path: &Path) -> Result<()> {
    let file = File::create(file_path).map_err(|e| AnimacyError::io(file_path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush().map_err(|e| AnimacyError::io(file_path, e))
}

pub fn load_sampling_report(file_path: &Path) -> Result<SamplingReport> {
    let file = File::open(file_path).map_err(|e| AnimacyError::io(file_path, e))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
