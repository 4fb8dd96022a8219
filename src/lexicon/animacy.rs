use std::collections::HashSet;

use super::sense_graph::{normalize_key, SenseGraph, SenseId};

/// Outcome of one traversal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Animate,
    Inanimate,
    /// Not animate along the explored branches, but a branch ran into a node
    /// already visited during this query and not yet memoised.
    Cyclic,
}

/// Decides whether a sense inherits animacy from one of the configured roots.
///
/// A sense is animate when it is a root or when any primary parent is animate.
/// Results are memoised for the lifetime of the classifier; a memo slot is
/// written at most once.
pub struct AnimacyClassifier<'g> {
    graph: &'g SenseGraph,
    root_keys: HashSet<String>,
    roots: HashSet<SenseId>,
    memo: Vec<Option<bool>>,
}

impl<'g> AnimacyClassifier<'g> {
    pub fn new(graph: &'g SenseGraph, animate_roots: &HashSet<String>) -> Self {
        let root_keys: HashSet<String> = animate_roots.iter().map(|r| normalize_key(r)).collect();
        let roots = root_keys.iter().filter_map(|r| graph.get_id(r)).collect();
        AnimacyClassifier {
            graph,
            root_keys,
            roots,
            memo: vec![None; graph.size()],
        }
    }

    pub fn graph(&self) -> &'g SenseGraph {
        self.graph
    }

    /// Root ids present in the graph.
    pub fn root_ids(&self) -> &HashSet<SenseId> {
        &self.roots
    }

    pub fn is_root(&self, id: SenseId) -> bool {
        self.roots.contains(&id)
    }

    pub fn memoized(&self, id: SenseId) -> Option<bool> {
        self.memo.get(id as usize).copied().flatten()
    }

    /// Classifies a sense by key. Keys missing from the graph are leaves.
    pub fn is_animate_key(&mut self, raw_key: &str) -> bool {
        match self.graph.get_id(raw_key) {
            Some(id) => self.is_animate(id),
            None => self.root_keys.contains(&normalize_key(raw_key)),
        }
    }

    pub fn is_animate(&mut self, id: SenseId) -> bool {
        if (id as usize) >= self.memo.len() {
            return false;
        }
        if let Some(cached) = self.memo[id as usize] {
            return cached;
        }
        let mut visited = HashSet::new();
        let animate = self.resolve(id, &mut visited) == Resolution::Animate;
        // The query node's own answer is final even when a branch looped back to it.
        self.record(id, animate);
        animate
    }

    fn record(&mut self, id: SenseId, value: bool) {
        let slot = &mut self.memo[id as usize];
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    // `visited` spans the whole query: an animate hit returns straight up the
    // stack, so any node seen again is either non-animate or still open.
    fn resolve(&mut self, id: SenseId, visited: &mut HashSet<SenseId>) -> Resolution {
        if let Some(cached) = self.memo[id as usize] {
            return if cached {
                Resolution::Animate
            } else {
                Resolution::Inanimate
            };
        }
        if visited.contains(&id) {
            return Resolution::Cyclic;
        }
        if self.is_root(id) {
            self.record(id, true);
            return Resolution::Animate;
        }

        visited.insert(id);
        let graph = self.graph;
        let mut cyclic = false;
        for &parent in graph.parents(id) {
            match self.resolve(parent, visited) {
                Resolution::Animate => {
                    self.record(id, true);
                    return Resolution::Animate;
                }
                Resolution::Cyclic => cyclic = true,
                Resolution::Inanimate => {}
            }
        }

        // A negative that leaned on an already visited node is left unmemoised.
        if cyclic {
            Resolution::Cyclic
        } else {
            self.record(id, false);
            Resolution::Inanimate
        }
    }
}
