use flate2::read::MultiGzDecoder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{AnimacyError, Result};
use crate::lexicon::sense_graph::normalize_key;

const NOUN_TAG_PREFIX: &str = "NN";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyStats {
    pub lines: usize,
    pub kept: usize,
    pub skipped: usize,
}

/// Extracts `(lemgram, count)` from one stats row, or `None` if the row is not
/// a well-formed noun row. Columns: form, tag, lemgram, -, count, ...
pub fn parse_frequency_line(line: &str) -> Option<(String, u64)> {
    if !line.contains('\t') {
        return None;
    }
    let parts: Vec<&str> = line.split('\t').collect();
    if parts.len() < 5 || !parts[1].starts_with(NOUN_TAG_PREFIX) {
        return None;
    }
    let lemgram = normalize_key(parts[2]);
    if lemgram.chars().count() <= 1 {
        return None;
    }
    let count = parts[4].trim().parse::<u64>().ok()?;
    Some((lemgram, count))
}

/// Reads one line without its terminator, replacing invalid UTF-8.
/// Returns `None` at end of input.
pub(crate) fn next_line_lossy<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    path: &Path,
) -> Result<Option<String>> {
    buf.clear();
    let read = reader
        .read_until(b'\n', buf)
        .map_err(|e| AnimacyError::io(path, e))?;
    if read == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buf);
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

fn drain_lines<R, F>(mut reader: R, path: &Path, mut on_line: F) -> Result<()>
where
    R: BufRead,
    F: FnMut(&str),
{
    let mut buf = Vec::new();
    while let Some(line) = next_line_lossy(&mut reader, &mut buf, path)? {
        on_line(&line);
    }
    Ok(())
}

/// Streams the lines of a plain, `.gz` or single-member `.zip` text file.
/// Invalid UTF-8 is replaced rather than rejected.
pub fn for_each_line<F>(path: &Path, on_line: F) -> Result<()>
where
    F: FnMut(&str),
{
    let file = File::open(path).map_err(|e| AnimacyError::io(path, e))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("gz") => drain_lines(BufReader::new(MultiGzDecoder::new(file)), path, on_line),
        Some("zip") => {
            let zip_error = |source| AnimacyError::Zip {
                path: path.to_path_buf(),
                source,
            };
            let mut archive = zip::ZipArchive::new(file).map_err(zip_error)?;
            let member = (0..archive.len())
                .find(|&i| archive.by_index(i).map(|f| !f.is_dir()).unwrap_or(false))
                .ok_or_else(|| AnimacyError::EmptyArchive(path.to_path_buf()))?;
            let entry = archive.by_index(member).map_err(zip_error)?;
            drain_lines(BufReader::new(entry), path, on_line)
        }
        _ => drain_lines(BufReader::new(file), path, on_line),
    }
}

/// Sums noun-row counts per normalised lemgram.
pub fn build_lemgram_frequencies(path: &Path) -> Result<(HashMap<String, u64>, FrequencyStats)> {
    let mut sums: HashMap<String, u64> = HashMap::new();
    let mut stats = FrequencyStats::default();
    for_each_line(path, |line| {
        stats.lines += 1;
        match parse_frequency_line(line) {
            Some((lemgram, count)) => {
                *sums.entry(lemgram).or_insert(0) += count;
                stats.kept += 1;
            }
            None => stats.skipped += 1,
        }
    })?;
    Ok((sums, stats))
}
