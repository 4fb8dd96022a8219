use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

use crate::types::lexicon_data::SenseInfo;

/// Index into the graph's flat sense tables.
pub type SenseId = u32;

fn dash_variants() -> &'static Regex {
    static DASHES: OnceLock<Regex> = OnceLock::new();
    DASHES.get_or_init(|| Regex::new("[\u{2010}-\u{2014}]").expect("dash class is a valid pattern"))
}

/// Canonical form of a sense id or lemgram key.
///
/// Trims, applies NFC, folds the U+2010..U+2014 dashes to `-` and collapses
/// pipe-wrapped compound keys such as `|förslag..nn.1|` to their last segment.
pub fn normalize_key(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let composed: String = trimmed.nfc().collect();
    let key = dash_variants().replace_all(&composed, "-").into_owned();

    if key.contains('|') {
        if let Some(last) = key.split('|').map(str::trim).filter(|p| !p.is_empty()).last() {
            return last.to_string();
        }
    }
    key
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LemmaGroup {
    pub lemgram: String,
    /// First written form seen for this lemgram.
    pub written_form: String,
    pub senses: Vec<SenseId>,
}

/// Arena of senses and their primary-parent edges.
///
/// Every id that appears anywhere, as a declared sense or only as an edge
/// target, gets a slot; `info` is `None` for ids the lexicon never declared.
#[derive(Debug, Default, Clone)]
pub struct SenseGraph {
    str_to_id: HashMap<String, SenseId>,
    id_to_str: Vec<String>,
    info: Vec<Option<SenseInfo>>,
    parents: Vec<Vec<SenseId>>,
    lemgram_index: HashMap<String, usize>,
    lemma_groups: Vec<LemmaGroup>,
    edge_count: usize,
}

impl SenseGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of a sense key, assigning a fresh slot if it is new.
    pub fn get_id_or_insert(&mut self, raw_key: &str) -> SenseId {
        let key = normalize_key(raw_key);
        if let Some(id) = self.str_to_id.get(&key) {
            return *id;
        }
        let id = self.id_to_str.len() as SenseId;
        self.str_to_id.insert(key.clone(), id);
        self.id_to_str.push(key);
        self.info.push(None);
        self.parents.push(Vec::new());
        id
    }

    pub fn get_id(&self, raw_key: &str) -> Option<SenseId> {
        let key = normalize_key(raw_key);
        if key.is_empty() {
            return None;
        }
        self.str_to_id.get(&key).copied()
    }

    pub fn get_str(&self, id: SenseId) -> Option<&str> {
        self.id_to_str.get(id as usize).map(String::as_str)
    }

    /// Number of sense slots, declared or referenced.
    pub fn size(&self) -> usize {
        self.id_to_str.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Registers the representative written form of a lemgram; the first call wins.
    pub fn declare_lemgram(&mut self, lemgram: &str, written_form: &str) {
        if lemgram.is_empty() || self.lemgram_index.contains_key(lemgram) {
            return;
        }
        self.lemgram_index
            .insert(lemgram.to_string(), self.lemma_groups.len());
        self.lemma_groups.push(LemmaGroup {
            lemgram: lemgram.to_string(),
            written_form: written_form.to_string(),
            senses: Vec::new(),
        });
    }

    /// Records a declared sense. A repeated id keeps the latest info but stays
    /// listed under every lemgram that declared it.
    pub fn add_sense(&mut self, raw_sense_id: &str, info: SenseInfo) -> SenseId {
        let id = self.get_id_or_insert(raw_sense_id);
        if !info.lemgram.is_empty() {
            self.declare_lemgram(&info.lemgram, &info.written_form);
            let group_idx = self.lemgram_index[&info.lemgram];
            self.lemma_groups[group_idx].senses.push(id);
        }
        self.info[id as usize] = Some(info);
        id
    }

    pub fn add_primary_parent(&mut self, child: SenseId, raw_parent: &str) {
        if normalize_key(raw_parent).is_empty() {
            return;
        }
        let parent = self.get_id_or_insert(raw_parent);
        self.parents[child as usize].push(parent);
        self.edge_count += 1;
    }

    /// Primary parents of a sense; empty for leaves and unknown ids.
    pub fn parents(&self, id: SenseId) -> &[SenseId] {
        self.parents
            .get(id as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn info(&self, id: SenseId) -> Option<&SenseInfo> {
        self.info.get(id as usize).and_then(Option::as_ref)
    }

    /// Written form for path rendering, falling back to the raw sense key.
    pub fn display_form(&self, id: SenseId) -> &str {
        match self.info(id) {
            Some(info) => info.written_form.as_str(),
            None => self.get_str(id).unwrap_or(""),
        }
    }

    pub fn lemma_groups(&self) -> &[LemmaGroup] {
        &self.lemma_groups
    }

    pub fn lemma_group(&self, lemgram: &str) -> Option<&LemmaGroup> {
        self.lemgram_index
            .get(lemgram)
            .map(|&idx| &self.lemma_groups[idx])
    }

    pub fn declared_sense_count(&self) -> usize {
        self.info.iter().filter(|i| i.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noun(form: &str, lemgram: &str) -> SenseInfo {
        SenseInfo {
            written_form: form.to_string(),
            pos: "nn".to_string(),
            lemgram: lemgram.to_string(),
        }
    }

    #[test]
    fn normalize_collapses_pipes_and_dashes() {
        assert_eq!(normalize_key("  |förslag..nn.1|  "), "förslag..nn.1");
        assert_eq!(normalize_key("|a..nn.1|b..nn.1|"), "b..nn.1");
        assert_eq!(normalize_key("e\u{2013}post..1"), "e-post..1");
        assert_eq!(normalize_key("e\u{2010}post..1"), "e-post..1");
        assert_eq!(normalize_key("|"), "|");
        assert_eq!(normalize_key("   "), "");
    }

    #[test]
    fn normalize_composes_decomposed_input() {
        let decomposed = "ma\u{0308}nniska..1";
        assert_eq!(normalize_key(decomposed), "människa..1");
    }

    #[test]
    fn ids_are_interned_on_normalised_keys() {
        let mut graph = SenseGraph::new();
        let a = graph.get_id_or_insert("person..1");
        let b = graph.get_id_or_insert(" |person..1| ");
        assert_eq!(a, b);
        assert_eq!(graph.size(), 1);
        assert_eq!(graph.get_id("person..1"), Some(a));
        assert_eq!(graph.get_id("sten..1"), None);
        assert_eq!(graph.get_str(a), Some("person..1"));
    }

    #[test]
    fn first_lemgram_form_wins() {
        let mut graph = SenseGraph::new();
        graph.declare_lemgram("son..nn.1", "son");
        graph.declare_lemgram("son..nn.1", "sonen");
        graph.add_sense("son..1", noun("son", "son..nn.1"));
        graph.add_sense("son..2", noun("sonne", "son..nn.1"));

        let group = graph.lemma_group("son..nn.1").unwrap();
        assert_eq!(group.written_form, "son");
        assert_eq!(group.senses.len(), 2);
    }

    #[test]
    fn undeclared_parents_render_as_their_key() {
        let mut graph = SenseGraph::new();
        let son = graph.add_sense("son..1", noun("son", "son..nn.1"));
        graph.add_primary_parent(son, "person..1");
        graph.add_primary_parent(son, "  ");

        let parent = graph.parents(son)[0];
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.display_form(son), "son");
        assert_eq!(graph.display_form(parent), "person..1");
        assert!(graph.parents(parent).is_empty());
        assert!(graph.parents(999).is_empty());
        assert_eq!(graph.declared_sense_count(), 1);
    }
}
