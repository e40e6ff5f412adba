//! CSV loading and export.
//!
//! The first row is the header. Cells are kept verbatim; export writes the
//! header followed by the selected rows unchanged.

use crate::error::{DeckError, Result};
use crate::record::{Record, RecordPool};
use crate::selection::Deck;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::{BufRead, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Cleans a path typed or pasted by a user.
///
/// Strips surrounding whitespace and one pair of double quotes, and turns
/// backslashes into forward slashes.
pub fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(unquoted.replace('\\', "/"))
}

/// Loads a pool from a CSV file.
pub fn load_pool(path: impl AsRef<Path>) -> Result<RecordPool> {
    let path = path.as_ref();
    let pool = read_pool(File::open(path)?)?;
    info!(path = %path.display(), records = pool.len(), "loaded pool");
    Ok(pool)
}

/// Reads a pool from any CSV source.
///
/// # Errors
///
/// [`DeckError::EmptyInput`] when there is no header row, and
/// [`DeckError::Csv`] for malformed or ragged input.
pub fn read_pool<R: Read>(reader: R) -> Result<RecordPool> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let header = to_vec(rdr.headers()?);
    if header.is_empty() {
        return Err(DeckError::EmptyInput);
    }

    let rows = rdr
        .records()
        .map(|record| record.map(|r| to_vec(&r)))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(RecordPool::new(header, rows))
}

/// Writes the pool header and the deck rows to a CSV file.
pub fn export_deck(path: impl AsRef<Path>, pool: &RecordPool, deck: &Deck) -> Result<()> {
    let path = path.as_ref();
    write_records(File::create(path)?, pool.header(), deck.records(pool))?;
    info!(path = %path.display(), records = deck.len(), "exported deck");
    Ok(())
}

/// Writes `header` (when non-empty) and `records` as CSV.
pub fn write_records<'a, W, I>(writer: W, header: &[String], records: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Record>,
{
    let mut wtr = WriterBuilder::new().flexible(true).from_writer(writer);
    if !header.is_empty() {
        wtr.write_record(header)?;
    }
    for record in records {
        wtr.write_record(record.cells())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Reads one identity per line, skipping blank lines.
pub fn read_identity_list<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut identities = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            identities.push(line.to_string());
        }
    }
    Ok(identities)
}

fn to_vec(record: &csv::StringRecord) -> Vec<String> {
    record.iter().map(|s| s.to_string()).collect()
}
