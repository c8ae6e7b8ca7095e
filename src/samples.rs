use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::Result;
use crate::types::Sample;

/// Read a sample file, transparently decompressing it when the name ends in `.gz`.
///
/// One sample per line, either `<id>\t<rows>` or just `<rows>`, with rows
/// separated by commas. Blank lines and `#` comments are skipped. Samples
/// without an id are named after their 1-based line number (`line7`).
/// Rows are passed through untouched; validation happens at classification
/// time so that a bad sample is reported rather than aborting the file.
pub fn read_samples<P: AsRef<Path>>(path: P) -> Result<Vec<Sample>> {
    let path = path.as_ref();
    let f = File::open(path)?;

    let is_gz = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let reader: Box<dyn BufRead> = if is_gz {
        Box::new(BufReader::new(MultiGzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    };

    parse_samples(reader)
}

/// Parse samples from any buffered reader.
pub fn parse_samples<R: BufRead>(reader: R) -> Result<Vec<Sample>> {
    let mut samples = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (id, body) = match line.split_once('\t') {
            Some((id, body)) => (id.trim().to_string(), body),
            None => (format!("line{}", idx + 1), line),
        };

        let rows = body
            .split(',')
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();

        samples.push(Sample { id, rows });
    }

    log::debug!("parsed {} sample(s)", samples.len());
    Ok(samples)
}
