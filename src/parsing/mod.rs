pub mod freq_parser;
pub mod lmf_parser;
pub mod record_tsv;

// Re-export the entry points used by the pipeline
pub use freq_parser::build_lemgram_frequencies;
pub use lmf_parser::{parse_lmf_file, ParsedLexicon};
pub use record_tsv::{read_sampler_input, write_records, write_unmatched};
