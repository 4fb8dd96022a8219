/// Quantile of already-sorted values, linear interpolation between order
/// statistics. Returns `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = position.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let t = position - lo as f64;
    let (a, b) = (sorted[lo], sorted[hi]);
    let diff = b - a;
    Some(if t >= 0.5 { b - diff * (1.0 - t) } else { a + diff * t })
}

/// `bins + 1` evenly spaced quantile edges with coinciding edges collapsed.
pub fn quantile_edges(values: &[f64], bins: usize) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let step = 1.0 / bins as f64;
    let mut edges: Vec<f64> = (0..=bins)
        .filter_map(|k| {
            let p = if k == bins { 1.0 } else { k as f64 * step };
            quantile_sorted(&sorted, p)
        })
        .collect();
    edges.dedup();
    edges
}

/// Assignment of every value to a quantile bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Binning {
    /// Surviving edges, ascending.
    pub edges: Vec<f64>,
    /// Bin index per input value, aligned with the input.
    pub assignments: Vec<usize>,
    /// Occupancy per bin; its length is the effective bin count.
    pub counts: Vec<usize>,
}

impl Binning {
    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }
}

/// Splits `values` into at most `bins` quantile bins.
///
/// The lowest edge is inclusive and every other interval is right-closed.
/// Bins left empty by collapsed edges are dropped and the rest renumbered
/// `0..B'`. A constant input lands in a single bin.
pub fn assign_quantile_bins(values: &[f64], bins: usize) -> Binning {
    let edges = quantile_edges(values, bins.max(1));

    let raw: Vec<usize> = values
        .iter()
        .map(|&x| {
            if edges.len() < 2 {
                return 0;
            }
            let right = edges.partition_point(|&e| e < x).clamp(1, edges.len() - 1);
            right - 1
        })
        .collect();

    let raw_bins = edges.len().saturating_sub(1).max(1);
    let mut occupied = vec![0usize; raw_bins];
    for &b in &raw {
        occupied[b] += 1;
    }
    let mut renumber = vec![usize::MAX; raw_bins];
    let mut counts = Vec::new();
    for (b, &count) in occupied.iter().enumerate() {
        if count > 0 {
            renumber[b] = counts.len();
            counts.push(count);
        }
    }

    Binning {
        edges,
        assignments: raw.iter().map(|&b| renumber[b]).collect(),
        counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_quantiles() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&sorted, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&sorted, 1.0), Some(4.0));
        assert_eq!(quantile_sorted(&sorted, 0.5), Some(2.5));
        assert!((quantile_sorted(&sorted, 0.25).unwrap() - 1.75).abs() < 1e-12);
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn distinct_values_fill_equal_bins() {
        let values: Vec<f64> = (1..=8).map(|v| v as f64).collect();
        let binning = assign_quantile_bins(&values, 4);
        assert_eq!(binning.bin_count(), 4);
        assert_eq!(binning.counts, vec![2, 2, 2, 2]);
        assert_eq!(binning.assignments, vec![0, 0, 1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn minimum_lands_in_first_bin() {
        let binning = assign_quantile_bins(&[5.0, 1.0, 3.0], 2);
        assert_eq!(binning.assignments, vec![1, 0, 0]);
    }

    #[test]
    fn duplicate_edges_collapse() {
        let mut values = vec![0.0; 7];
        values.extend([1.0, 2.0, 3.0]);
        let binning = assign_quantile_bins(&values, 5);
        assert!(binning.bin_count() < 5);
        assert_eq!(binning.counts.iter().sum::<usize>(), values.len());
        assert!(binning.counts.iter().all(|&c| c > 0));
        assert!(binning.assignments[..7].iter().all(|&b| b == 0));
        for pair in binning.edges.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn constant_input_is_one_bin() {
        let binning = assign_quantile_bins(&[2.0; 6], 4);
        assert_eq!(binning.edges, vec![2.0]);
        assert_eq!(binning.counts, vec![6]);
        assert_eq!(binning.assignments, vec![0; 6]);
    }

    #[test]
    fn empty_input_has_no_bins() {
        let binning = assign_quantile_bins(&[], 4);
        assert_eq!(binning.bin_count(), 0);
        assert!(binning.assignments.is_empty());
    }
}
