pub mod aggregator;
pub mod animacy;
pub mod paths;
pub mod sense_graph;

pub use aggregator::{aggregate, join_frequencies, Aggregation, JoinOutput};
pub use animacy::AnimacyClassifier;
pub use paths::{paths_to_roots, pick_best_path, render_path, SensePath};
pub use sense_graph::{normalize_key, SenseGraph, SenseId};
