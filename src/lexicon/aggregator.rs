use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::animacy::AnimacyClassifier;
use super::paths::{paths_to_roots, pick_best_path, render_path, shortest_of, SensePath};
use super::sense_graph::{SenseGraph, SenseId};
use crate::types::lexicon_data::{Animacy, LabeledRecord};

/// Per-lemgram label and rendered explanatory path (empty when unknown).
#[derive(Debug, Default, Clone)]
pub struct Aggregation {
    pub labels: HashMap<String, Animacy>,
    pub paths: HashMap<String, String>,
}

impl Aggregation {
    pub fn count(&self, animacy: Animacy) -> usize {
        self.labels.values().filter(|&&a| a == animacy).count()
    }
}

fn best_path_for(graph: &SenseGraph, sense: SenseId, classifier: &AnimacyClassifier) -> Option<SensePath> {
    let paths = paths_to_roots(graph, sense);
    pick_best_path(&paths, classifier.root_ids()).cloned()
}

fn shortest_owned(candidates: &[SensePath]) -> Option<&SensePath> {
    let refs: Vec<&SensePath> = candidates.iter().collect();
    shortest_of(&refs)
}

/// Reduces every lemma group of the graph to one label and one path.
///
/// Only senses tagged `noun_pos` take part. A group is animate when any noun
/// sense is animate and yields a path; otherwise inanimate when any noun sense
/// yields a path; otherwise unknown. Lemgrams without any declared sense get
/// no label at all.
pub fn aggregate(classifier: &mut AnimacyClassifier, noun_pos: &str) -> Aggregation {
    let graph = classifier.graph();
    let mut aggregation = Aggregation::default();

    for group in graph.lemma_groups().iter().filter(|g| !g.senses.is_empty()) {
        let nouns: Vec<SenseId> = group
            .senses
            .iter()
            .copied()
            .filter(|&s| graph.info(s).map_or(false, |info| info.pos == noun_pos))
            .collect();

        let (label, path) = label_group(graph, classifier, &nouns);
        aggregation.labels.insert(group.lemgram.clone(), label);
        aggregation.paths.insert(
            group.lemgram.clone(),
            path.map(|p| render_path(graph, &p)).unwrap_or_default(),
        );
    }
    aggregation
}

fn label_group(
    graph: &SenseGraph,
    classifier: &mut AnimacyClassifier,
    nouns: &[SenseId],
) -> (Animacy, Option<SensePath>) {
    if nouns.is_empty() {
        return (Animacy::Unknown, None);
    }

    let animate: Vec<SenseId> = nouns
        .iter()
        .copied()
        .filter(|&s| classifier.is_animate(s))
        .collect();
    if !animate.is_empty() {
        let candidates: Vec<SensePath> = animate
            .iter()
            .filter_map(|&s| best_path_for(graph, s, classifier))
            .collect();
        if let Some(best) = shortest_owned(&candidates) {
            return (Animacy::Animate, Some(best.clone()));
        }
    }

    let candidates: Vec<SensePath> = nouns
        .iter()
        .filter_map(|&s| best_path_for(graph, s, classifier))
        .collect();
    match shortest_owned(&candidates) {
        Some(best) => (Animacy::Inanimate, Some(best.clone())),
        None => (Animacy::Unknown, None),
    }
}

#[derive(Debug, Default, Clone)]
pub struct JoinOutput {
    /// Sorted by descending frequency, then surface form, then lemgram.
    pub records: Vec<LabeledRecord>,
    /// Sorted unique lemgrams with a frequency but no classification.
    pub unmatched: Vec<String>,
}

fn fallback_form(lemgram: &str) -> &str {
    lemgram.split("..").next().unwrap_or(lemgram)
}

/// Joins the per-lemgram labels with frequency counts, one record per lemgram
/// present in `frequencies`.
pub fn join_frequencies(
    graph: &SenseGraph,
    aggregation: &Aggregation,
    frequencies: &HashMap<String, u64>,
) -> JoinOutput {
    let mut unmatched = BTreeSet::new();
    let mut records: Vec<LabeledRecord> = frequencies
        .iter()
        .map(|(lemgram, &frequency)| {
            let written_form = graph
                .lemma_group(lemgram)
                .map(|g| g.written_form.as_str())
                .filter(|form| !form.is_empty())
                .unwrap_or_else(|| fallback_form(lemgram))
                .to_string();
            let animacy = match aggregation.labels.get(lemgram) {
                Some(&label) => label,
                None => {
                    debug!(lemgram = %lemgram, "lemgram missing from lexicon");
                    unmatched.insert(lemgram.clone());
                    Animacy::Unknown
                }
            };
            LabeledRecord {
                written_form,
                lemgram: lemgram.clone(),
                frequency,
                animacy,
                path: aggregation.paths.get(lemgram).cloned().unwrap_or_default(),
            }
        })
        .collect();

    records.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.written_form.cmp(&b.written_form))
            .then_with(|| a.lemgram.cmp(&b.lemgram))
    });

    JoinOutput {
        records,
        unmatched: unmatched.into_iter().collect(),
    }
}
