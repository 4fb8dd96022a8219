use serde::{Deserialize, Serialize};
use std::fmt;

/// Lemma-level label. `Unknown` is a regular outcome, not an error.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Animacy {
    Animate,
    Inanimate,
    Unknown,
}

impl Animacy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Animacy::Animate => "animate",
            Animacy::Inanimate => "inanimate",
            Animacy::Unknown => "unknown",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "animate" => Some(Animacy::Animate),
            "inanimate" => Some(Animacy::Inanimate),
            "unknown" => Some(Animacy::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for Animacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenseInfo {
    pub written_form: String,
    pub pos: String,
    pub lemgram: String,
}

/// One row of the join output and the sampler's only input schema.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LabeledRecord {
    pub written_form: String,
    pub lemgram: String,
    pub frequency: u64,
    pub animacy: Animacy,
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_back() {
        for label in [Animacy::Animate, Animacy::Inanimate, Animacy::Unknown] {
            assert_eq!(Animacy::from_label(label.as_str()), Some(label));
        }
        assert_eq!(Animacy::from_label(" animate\r"), Some(Animacy::Animate));
        assert_eq!(Animacy::from_label("Animate"), None);
    }
}
