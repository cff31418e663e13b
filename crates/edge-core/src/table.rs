//! Shared CSV plumbing for the node and premine tables.
//!
//! Both tables carry a header row that is always skipped, use `,` as the
//! delimiter and have a fixed column count.

use std::fs::File;
use std::io;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{SourceError, SourceKind};

/// A data row with its 1-based line number in the source.
pub(crate) struct Row {
    pub line: u64,
    pub record: StringRecord,
}

impl Row {
    /// Field `index`, already trimmed.
    pub fn field(&self, index: usize) -> &str {
        self.record.get(index).unwrap_or_default()
    }

    pub fn malformed(&self, kind: SourceKind, reason: impl Into<String>) -> SourceError {
        SourceError::MalformedRow {
            kind,
            line: self.line,
            reason: reason.into(),
        }
    }
}

/// Open `path`, mapping an absent file to [`SourceError::SourceNotFound`].
pub(crate) fn open(kind: SourceKind, path: &Path) -> Result<File, SourceError> {
    File::open(path).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            SourceError::SourceNotFound {
                kind,
                path: path.to_path_buf(),
            }
        } else {
            SourceError::Read {
                kind,
                source: csv::Error::from(err),
            }
        }
    })
}

/// Read every data row, requiring exactly `columns` fields per row. The
/// header is skipped without looking at its width.
///
/// Stops at the first bad row; nothing is returned for a partially valid
/// table.
pub(crate) fn read_rows<R: io::Read>(
    kind: SourceKind,
    reader: R,
    columns: usize,
) -> Result<Vec<Row>, SourceError> {
    let mut csv = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv.records() {
        let record = result.map_err(|source| SourceError::Read { kind, source })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() != columns {
            return Err(SourceError::MalformedRow {
                kind,
                line,
                reason: format!("expected {} fields, found {}", columns, record.len()),
            });
        }
        rows.push(Row { line, record });
    }

    Ok(rows)
}
