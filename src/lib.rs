pub mod config;
pub mod error;
pub mod logging;
pub mod types {
    pub mod lexicon_data;
}
pub mod parsing;
pub mod lexicon;
pub mod sampling;
pub mod report_io;
pub mod pipeline;

pub use error::{AnimacyError, Result};
pub use types::lexicon_data::{Animacy, LabeledRecord};
