use std::{
    ffi::OsString,
    io,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    error::{Error, Result},
    metadata::{METADATA_FILE, MetadataTable},
    record::{self, Record},
    selection::{Selection, Slice, resolve_position},
    walker,
};

/// A directory of one-paper-per-file JSON records, indexed by position.
///
/// Construction only lists the directory. Each access reads and parses the
/// backing file again; nothing is cached. If the directory changes after
/// construction, later accesses may fail or see a different file at the
/// same position.
#[derive(Debug, Clone)]
pub struct Paperset {
    dir: PathBuf,
    index: Vec<OsString>,
}

/// Result of [`Paperset::select`].
#[derive(Debug, Clone, PartialEq)]
pub enum Selected {
    One(Record),
    Many(Vec<Record>),
}

impl Selected {
    pub fn into_vec(self) -> Vec<Record> {
        match self {
            Self::One(record) => vec![record],
            Self::Many(records) => records,
        }
    }
}

impl Paperset {
    /// Index `dir` in directory listing order.
    ///
    /// Listing order is whatever the filesystem returns and may differ
    /// between platforms; use [`Paperset::sorted`] for stable positions.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let index = walker::list_record_files(&dir)?;
        debug!(dir = %dir.display(), len = index.len(), "indexed paperset");
        Ok(Self { dir, index })
    }

    /// Index `dir` with filenames in lexicographic order.
    pub fn sorted(dir: impl AsRef<Path>) -> Result<Self> {
        let mut set = Self::new(dir)?;
        set.index.sort();
        Ok(set)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The position-to-filename index.
    pub fn filenames(&self) -> &[OsString] {
        &self.index
    }

    /// Full path of the file at `position`, without loading it.
    pub fn path_of(&self, position: isize) -> Result<PathBuf> {
        let idx = resolve_position(position, self.len())?;
        Ok(self.dir.join(&self.index[idx]))
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.dir.join(METADATA_FILE)
    }

    /// A file removed since construction is reported as a missing record.
    fn load(&self, idx: usize) -> Result<Record> {
        Record::load(&self.dir.join(&self.index[idx])).map_err(|e| match e {
            Error::Io(ref err) if err.kind() == io::ErrorKind::NotFound => {
                Error::RecordNotFound {
                    position: idx as isize,
                    len: self.len(),
                }
            }
            e => e,
        })
    }

    /// Load the record at `position`. Negative positions count from the end.
    pub fn get(&self, position: isize) -> Result<Record> {
        let idx = resolve_position(position, self.len())?;
        self.load(idx)
    }

    /// Load every record selected by `slice`, in slice order.
    pub fn slice(&self, slice: &Slice) -> Result<Vec<Record>> {
        slice
            .positions(self.len())?
            .into_iter()
            .map(|idx| self.load(idx))
            .collect()
    }

    /// Load a single position or a slice. A slice always yields
    /// [`Selected::Many`], even when it resolves to one record.
    pub fn select(&self, selection: Selection) -> Result<Selected> {
        match selection {
            Selection::Position(position) => {
                self.get(position).map(Selected::One)
            }
            Selection::Slice(slice) => self.slice(&slice).map(Selected::Many),
        }
    }

    /// Lazily load each record in index order.
    pub fn iter(&self) -> Iter<'_> {
        Iter { set: self, next: 0 }
    }

    /// Load every record and map it through `f`, stopping at the first file
    /// that fails to load.
    pub fn apply<T, F>(&self, mut f: F) -> Result<Vec<T>>
    where
        F: FnMut(&Record) -> T,
    {
        self.iter().map(|record| record.map(|r| f(&r))).collect()
    }

    /// Like [`Paperset::apply`], but `f` may fail too.
    pub fn try_apply<T, F>(&self, mut f: F) -> Result<Vec<T>>
    where
        F: FnMut(&Record) -> Result<T>,
    {
        self.iter().map(|record| f(&record?)).collect()
    }

    pub fn texts(&self) -> Result<Vec<String>> {
        self.try_apply(record::get_text)
    }

    pub fn abstracts(&self) -> Result<Vec<String>> {
        self.try_apply(record::get_abstract)
    }

    pub fn titles(&self) -> Result<Vec<String>> {
        self.try_apply(record::get_title)
    }

    /// Rows of `meta_data.csv` whose `sha` matches a paper in this set.
    ///
    /// The table is re-read on every call. Rows come back in the table's
    /// order, not in index order.
    pub fn get_metadata(&self) -> Result<MetadataTable> {
        let ids = self.try_apply(record::get_paper_id)?;
        let path = self.metadata_path();
        MetadataTable::load(&path)?.retain_ids(&ids, &path)
    }
}

/// Iterator returned by [`Paperset::iter`].
#[derive(Debug)]
pub struct Iter<'a> {
    set: &'a Paperset,
    next: usize,
}

impl Iterator for Iter<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.set.len() {
            return None;
        }
        let record = self.set.load(self.next);
        self.next += 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.set.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Paperset {
    type Item = Result<Record>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
