use std::{collections::HashSet, io::Write, path::Path};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::debug;

use crate::error::{Error, Result};

/// Name of the metadata table inside a paper directory. The downloader
/// writes the metadata resource under the same name.
pub const METADATA_FILE: &str = "meta_data.csv";

/// Column holding the paper identifier (`paper_id` in the record files).
pub const KEY_COLUMN: &str = "sha";

/// An in-memory CSV table: one header row plus data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataTable {
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl MetadataTable {
    /// Read a whole CSV file. Rows may have differing lengths.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::MetadataFileNotFound(path.to_path_buf()));
        }

        let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;
        let headers = reader.headers()?.clone();
        let rows = reader
            .records()
            .collect::<std::result::Result<Vec<_>, csv::Error>>()?;

        debug!(
            path = %path.display(),
            rows = rows.len(),
            "loaded metadata table"
        );
        Ok(Self { headers, rows })
    }

    /// Keep only the rows whose `KEY_COLUMN` cell is one of `ids`.
    ///
    /// Row order is the table's own order, not the order of `ids`.
    pub fn retain_ids<S: AsRef<str>>(
        mut self,
        ids: &[S],
        path: &Path,
    ) -> Result<Self> {
        let key = self.column_index(KEY_COLUMN).ok_or_else(|| {
            Error::MetadataColumnNotFound {
                column: KEY_COLUMN,
                path: path.to_path_buf(),
            }
        })?;

        let wanted: HashSet<&str> = ids.iter().map(AsRef::as_ref).collect();
        self.rows
            .retain(|row| row.get(key).is_some_and(|id| wanted.contains(id)));
        Ok(self)
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Every cell of the named column, in row order. Short rows yield `""`.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).unwrap_or(""))
                .collect(),
        )
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Write the table, headers first, as CSV.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = WriterBuilder::new().flexible(true).from_writer(writer);
        out.write_record(&self.headers)?;
        for row in &self.rows {
            out.write_record(row)?;
        }
        out.flush()?;
        Ok(())
    }
}
