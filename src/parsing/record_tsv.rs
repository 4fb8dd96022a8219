use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::freq_parser::next_line_lossy;
use crate::error::{AnimacyError, Result};
use crate::types::lexicon_data::{Animacy, LabeledRecord};

pub const COLUMNS: [&str; 5] = ["writtenForm", "lemgram", "frequency", "animacy", "path"];

/// Outcome counters for reading a sampler input file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadStats {
    pub rows: usize,
    pub kept: usize,
    pub unknown_label: usize,
    pub non_positive: usize,
    pub malformed: usize,
}

/// Writes records with the five-column header.
pub fn write_records(path: &Path, records: &[LabeledRecord]) -> Result<()> {
    let io_err = |e| AnimacyError::io(path, e);
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{}", COLUMNS.join("\t")).map_err(io_err)?;
    for r in records {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}",
            r.written_form, r.lemgram, r.frequency, r.animacy, r.path
        )
        .map_err(io_err)?;
    }
    writer.flush().map_err(io_err)
}

/// Newline-separated keys, no trailing newline.
pub fn write_unmatched(path: &Path, lemgrams: &[String]) -> Result<()> {
    std::fs::write(path, lemgrams.join("\n")).map_err(|e| AnimacyError::io(path, e))
}

/// Sibling of `path` that output is written to before being moved into place.
pub fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

/// Lets `write` fill one staging file per target, then renames them onto the
/// targets. If `write` fails the staging files are removed and no target is
/// touched.
pub fn write_staged<F>(targets: &[&Path], write: F) -> Result<()>
where
    F: FnOnce(&[PathBuf]) -> Result<()>,
{
    let staged: Vec<PathBuf> = targets.iter().map(|t| staging_path(t)).collect();
    if let Err(e) = write(&staged) {
        for path in &staged {
            let _ = fs::remove_file(path);
        }
        return Err(e);
    }
    for (from, to) in staged.iter().zip(targets) {
        fs::rename(from, to).map_err(|e| AnimacyError::io(to, e))?;
    }
    Ok(())
}

/// Reads a join-output TSV for sampling, keeping animate and inanimate rows
/// with a positive frequency. Columns are located by header name.
pub fn read_sampler_input(path: &Path) -> Result<(Vec<LabeledRecord>, ReadStats)> {
    let io_err = |e| AnimacyError::io(path, e);
    let file = File::open(path).map_err(io_err)?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let header = next_line_lossy(&mut reader, &mut buf, path)?.unwrap_or_default();
    let positions: HashMap<&str, usize> = header
        .trim_end_matches('\r')
        .split('\t')
        .enumerate()
        .map(|(i, name)| (name.trim(), i))
        .collect();
    let mut index = [0usize; 5];
    for (slot, column) in index.iter_mut().zip(COLUMNS) {
        *slot = *positions.get(column).ok_or_else(|| AnimacyError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })?;
    }
    let [form_at, lemgram_at, freq_at, animacy_at, path_at] = index;

    let mut records = Vec::new();
    let mut stats = ReadStats::default();
    while let Some(line) = next_line_lossy(&mut reader, &mut buf, path)? {
        let line = line.as_str();
        if line.is_empty() {
            continue;
        }
        stats.rows += 1;
        let fields: Vec<&str> = line.split('\t').collect();
        let field = |i: usize| fields.get(i).copied();

        let (Some(form), Some(lemgram), Some(freq), Some(label)) =
            (field(form_at), field(lemgram_at), field(freq_at), field(animacy_at))
        else {
            stats.malformed += 1;
            continue;
        };
        let Ok(frequency) = freq.trim().parse::<i64>() else {
            stats.malformed += 1;
            continue;
        };
        let animacy = match Animacy::from_label(label) {
            Some(a @ (Animacy::Animate | Animacy::Inanimate)) => a,
            Some(Animacy::Unknown) => {
                stats.unknown_label += 1;
                continue;
            }
            None => {
                stats.malformed += 1;
                continue;
            }
        };
        if frequency <= 0 {
            stats.non_positive += 1;
            continue;
        }

        records.push(LabeledRecord {
            written_form: form.to_string(),
            lemgram: lemgram.to_string(),
            frequency: frequency as u64,
            animacy,
            path: field(path_at).unwrap_or("").to_string(),
        });
        stats.kept += 1;
    }
    Ok((records, stats))
}
