use std::collections::HashSet;

use super::sense_graph::{SenseGraph, SenseId};

/// Sense ids from a starting sense toward a terminal node.
pub type SensePath = Vec<SenseId>;

pub const PATH_SEPARATOR: &str = " \u{2192} ";

/// Enumerates every root-ward path from `start`, following all primary parents.
///
/// A branch ends at a node without parents, or when it reaches a node already
/// on the branch; that node is appended once more so cyclic input still yields
/// finite paths. Never returns an empty list.
pub fn paths_to_roots(graph: &SenseGraph, start: SenseId) -> Vec<SensePath> {
    walk(graph, start, &[])
}

fn walk(graph: &SenseGraph, current: SenseId, prefix: &[SenseId]) -> Vec<SensePath> {
    let closes_cycle = prefix.contains(&current);
    let parents = graph.parents(current);

    let mut extended = Vec::with_capacity(prefix.len() + 1);
    extended.extend_from_slice(prefix);
    extended.push(current);

    if closes_cycle || parents.is_empty() {
        return vec![extended];
    }
    parents
        .iter()
        .flat_map(|&parent| walk(graph, parent, &extended))
        .collect()
}

/// First shortest path in enumeration order.
fn first_shortest<'a, I>(paths: I) -> Option<&'a SensePath>
where
    I: IntoIterator<Item = &'a SensePath>,
{
    let mut best: Option<&SensePath> = None;
    for path in paths {
        match best {
            Some(current) if current.len() <= path.len() => {}
            _ => best = Some(path),
        }
    }
    best
}

/// Picks the shortest path ending in `targets`, else the shortest overall.
/// Equal lengths keep whichever path was enumerated first.
pub fn pick_best_path<'a>(paths: &'a [SensePath], targets: &HashSet<SenseId>) -> Option<&'a SensePath> {
    if paths.is_empty() {
        return None;
    }
    let reaching = paths
        .iter()
        .filter(|p| p.last().map_or(false, |last| targets.contains(last)));
    first_shortest(reaching).or_else(|| first_shortest(paths))
}

/// Shortest among already-picked candidates, earliest on ties.
pub fn shortest_of<'a>(candidates: &[&'a SensePath]) -> Option<&'a SensePath> {
    first_shortest(candidates.iter().copied())
}

pub fn render_path(graph: &SenseGraph, path: &[SenseId]) -> String {
    path.iter()
        .map(|&id| graph.display_form(id))
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}
