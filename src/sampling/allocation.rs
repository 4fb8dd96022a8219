use std::cmp::Ordering;

/// Largest-remainder apportionment of `total` units over real-valued targets.
///
/// Floors every target, then hands the leftover units one by one to the
/// largest fractional remainders (ties go to the lower index).
pub fn largest_remainder(targets: &[f64], total: usize) -> Vec<usize> {
    let mut alloc: Vec<usize> = targets.iter().map(|t| t.max(0.0).floor() as usize).collect();
    let placed: usize = alloc.iter().sum();
    let leftover = total.saturating_sub(placed);

    let mut order: Vec<usize> = (0..targets.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = targets[a] - targets[a].floor();
        let rb = targets[b] - targets[b].floor();
        rb.total_cmp(&ra).then(a.cmp(&b))
    });
    for &i in order.iter().cycle().take(leftover) {
        alloc[i] += 1;
    }
    alloc
}

/// Per-bin sample sizes summing to `n`, proportional to the combined bin
/// populations. Independent of class.
pub fn desired_per_bin(bin_counts: &[usize], n: usize) -> Vec<usize> {
    let population: usize = bin_counts.iter().sum();
    if population == 0 {
        return vec![0; bin_counts.len()];
    }
    let targets: Vec<f64> = bin_counts
        .iter()
        .map(|&c| c as f64 * n as f64 / population as f64)
        .collect();
    largest_remainder(&targets, n)
}

fn by_descending<'a>(values: &'a [usize]) -> impl Fn(&usize, &usize) -> Ordering + 'a {
    move |&a, &b| values[b].cmp(&values[a]).then(a.cmp(&b))
}

/// Adapts the class-independent `desired` allocation to one class's per-bin
/// `capacity`.
///
/// Each bin is clipped to what it holds; the shortfall against `n` is handed
/// out one unit per round to bins with spare capacity, most spare first with
/// ties to the lower index. The result never exceeds `min(n, Σcapacity)`.
pub fn allocate_for_class(desired: &[usize], capacity: &[usize], n: usize) -> Vec<usize> {
    let mut need: Vec<usize> = desired
        .iter()
        .zip(capacity)
        .map(|(&d, &c)| d.min(c))
        .collect();
    let mut spare: Vec<usize> = capacity.iter().zip(&need).map(|(&c, &k)| c - k).collect();
    let mut shortfall = n.saturating_sub(need.iter().sum());

    while shortfall > 0 {
        let mut open: Vec<usize> = (0..spare.len()).filter(|&i| spare[i] > 0).collect();
        if open.is_empty() {
            break;
        }
        open.sort_by(by_descending(&spare));
        for i in open {
            if shortfall == 0 {
                break;
            }
            need[i] += 1;
            spare[i] -= 1;
            shortfall -= 1;
        }
    }

    let achievable = n.min(capacity.iter().sum());
    let mut total: usize = need.iter().sum();
    while total > achievable {
        let fullest = (0..need.len())
            .min_by(by_descending(&need))
            .filter(|&i| need[i] > 0);
        match fullest {
            Some(i) => {
                need[i] -= 1;
                total -= 1;
            }
            None => break,
        }
    }
    need
}
