//! Records, feature columns and the candidate pool.
//!
//! A record is a row of string cells. Cell 0 is the display identity; the
//! remaining cells are boolean flags, set when the cell reads `"X"`
//! (case- and whitespace-insensitive). Records receive a stable
//! [`RecordId`] when the pool is built, and all set operations use that id,
//! so two rows with identical cells remain distinct.

use std::fmt;

/// Stable index of a record inside its [`RecordPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordId(pub usize);

impl RecordId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// 1-based index into a record's cells, interpreted as a boolean flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ColumnId(pub usize);

impl ColumnId {
    /// 0-based cell offset, `None` for the invalid column 0.
    pub fn offset(self) -> Option<usize> {
        self.0.checked_sub(1)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a cell carries the presence marker.
pub fn is_flag(cell: &str) -> bool {
    cell.trim().eq_ignore_ascii_case("x")
}

/// Normalized form used to match identity strings against cell 0.
pub fn identity_key(identity: &str) -> String {
    identity.trim().to_lowercase()
}

/// One immutable row of the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: RecordId,
    cells: Vec<String>,
}

impl Record {
    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Display identity (cell 0), empty for a row without cells.
    pub fn identity(&self) -> &str {
        self.cells.first().map(String::as_str).unwrap_or("")
    }

    pub fn cell(&self, column: ColumnId) -> Option<&str> {
        column
            .offset()
            .and_then(|i| self.cells.get(i))
            .map(String::as_str)
    }

    /// Whether the record is flagged in `column`. Out-of-range columns are unflagged.
    pub fn has_flag(&self, column: ColumnId) -> bool {
        self.cell(column).is_some_and(is_flag)
    }

    /// Whether the record is flagged in any of `columns`.
    pub fn has_any_flag(&self, columns: &[ColumnId]) -> bool {
        columns.iter().any(|&c| self.has_flag(c))
    }
}

/// The read-only candidate pool: a header row plus the records.
#[derive(Debug, Clone, Default)]
pub struct RecordPool {
    header: Vec<String>,
    records: Vec<Record>,
}

impl RecordPool {
    /// Builds a pool, assigning ids in row order.
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, cells)| Record {
                id: RecordId(i),
                cells,
            })
            .collect();
        Self { header, records }
    }

    /// Builds a pool without a header row.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self::new(Vec::new(), rows)
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Header label of `column`, if the pool has one.
    pub fn column_name(&self, column: ColumnId) -> Option<&str> {
        column
            .offset()
            .and_then(|i| self.header.get(i))
            .map(String::as_str)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this pool.
    pub fn get(&self, id: RecordId) -> &Record {
        &self.records[id.index()]
    }

    pub fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.records.iter().map(Record::id)
    }

    /// Number of cells every record is guaranteed to have.
    ///
    /// The narrowest row wins; an empty pool falls back to the header width.
    pub fn width(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.cells.len())
            .min()
            .unwrap_or(self.header.len())
    }

    /// Resolves identity strings against cell 0.
    ///
    /// Every record whose normalized identity matches one of `identities` is
    /// returned, in pool order. Identities that match nothing are returned
    /// separately. Blank identities are ignored.
    pub fn find_by_identity<S: AsRef<str>>(
        &self,
        identities: &[S],
    ) -> (Vec<RecordId>, Vec<String>) {
        let wanted: Vec<String> = identities
            .iter()
            .map(|s| identity_key(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();

        let matched: Vec<RecordId> = self
            .records
            .iter()
            .filter(|r| wanted.contains(&identity_key(r.identity())))
            .map(Record::id)
            .collect();

        let mut unmatched: Vec<String> = Vec::new();
        let mut seen: Vec<&String> = Vec::new();
        for (raw, key) in identities
            .iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| !s.is_empty())
            .zip(wanted.iter())
        {
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            if !self.records.iter().any(|r| identity_key(r.identity()) == *key) {
                unmatched.push(raw.to_string());
            }
        }

        (matched, unmatched)
    }

    /// Records carrying the flag in `column`.
    pub fn carriers(&self, column: ColumnId) -> impl Iterator<Item = &Record> + '_ {
        self.records.iter().filter(move |r| r.has_flag(column))
    }
}
