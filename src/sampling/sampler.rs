use rand::seq::index;
use rand::Rng;

use super::allocation::{allocate_for_class, desired_per_bin};
use super::quantile::{assign_quantile_bins, Binning};
use crate::error::{AnimacyError, Result};
use crate::types::lexicon_data::{Animacy, LabeledRecord};

/// Draw order of the classes; part of the reproducibility contract.
pub const CLASS_ORDER: [Animacy; 2] = [Animacy::Animate, Animacy::Inanimate];

#[derive(Debug, Clone)]
pub struct ClassSample {
    pub animacy: Animacy,
    pub population: usize,
    /// Class records available per bin.
    pub capacity: Vec<usize>,
    /// Units drawn per bin.
    pub allocation: Vec<usize>,
    pub records: Vec<LabeledRecord>,
    /// Bin of each sampled record, aligned with `records`.
    pub record_bins: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct StratifiedSample {
    pub requested: usize,
    pub binning: Binning,
    pub desired_per_bin: Vec<usize>,
    pub animate: ClassSample,
    pub inanimate: ClassSample,
}

impl StratifiedSample {
    pub fn class(&self, animacy: Animacy) -> Option<&ClassSample> {
        match animacy {
            Animacy::Animate => Some(&self.animate),
            Animacy::Inanimate => Some(&self.inanimate),
            Animacy::Unknown => None,
        }
    }
}

/// Draws one frequency-stratified sample per class.
///
/// Bins are quantiles of log10(frequency) over both classes together, and both
/// classes aim for the same per-bin targets. Records with `unknown` animacy or
/// zero frequency are ignored. `rng` is consumed in ascending bin order,
/// animate before inanimate.
pub fn stratified_sample<R: Rng + ?Sized>(
    records: &[LabeledRecord],
    n: usize,
    bins: usize,
    rng: &mut R,
) -> Result<StratifiedSample> {
    if bins == 0 {
        return Err(AnimacyError::InvalidConfig(
            "bin count must be at least 1".to_string(),
        ));
    }
    let eligible: Vec<&LabeledRecord> = records
        .iter()
        .filter(|r| r.frequency > 0 && r.animacy != Animacy::Unknown)
        .collect();
    let log_f: Vec<f64> = eligible.iter().map(|r| (r.frequency as f64).log10()).collect();
    let binning = assign_quantile_bins(&log_f, bins);
    let desired = desired_per_bin(&binning.counts, n);

    let [animate, inanimate] = CLASS_ORDER.map(|animacy| {
        draw_class(&eligible, &binning, &desired, animacy, n, &mut *rng)
    });

    Ok(StratifiedSample {
        requested: n,
        binning,
        desired_per_bin: desired,
        animate,
        inanimate,
    })
}

fn draw_class<R: Rng + ?Sized>(
    eligible: &[&LabeledRecord],
    binning: &Binning,
    desired: &[usize],
    animacy: Animacy,
    n: usize,
    rng: &mut R,
) -> ClassSample {
    let bin_count = binning.bin_count();
    let mut pools: Vec<Vec<usize>> = vec![Vec::new(); bin_count];
    for (i, record) in eligible.iter().enumerate() {
        if record.animacy == animacy {
            pools[binning.assignments[i]].push(i);
        }
    }
    let capacity: Vec<usize> = pools.iter().map(Vec::len).collect();
    let allocation = allocate_for_class(desired, &capacity, n);

    let mut records = Vec::new();
    let mut record_bins = Vec::new();
    for (bin, pool) in pools.iter().enumerate() {
        let take = allocation[bin];
        if take == 0 {
            continue;
        }
        let picked: Vec<usize> = if take >= pool.len() {
            pool.clone()
        } else {
            index::sample(rng, pool.len(), take)
                .into_iter()
                .map(|j| pool[j])
                .collect()
        };
        for i in picked {
            records.push(eligible[i].clone());
            record_bins.push(bin);
        }
    }

    ClassSample {
        animacy,
        population: capacity.iter().sum(),
        capacity,
        allocation,
        records,
        record_bins,
    }
}
