use std::io::Write;

use serde_json::json;
use tracing::debug;

use crate::{
    error::Result,
    paperset::Paperset,
    record::{Record, get_abstract, get_paper_id, get_text, get_title},
};

/// A set of query substrings, stored lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Queries(Vec<String>);

impl Queries {
    pub fn new<I, S>(queries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            queries
                .into_iter()
                .map(|q| q.as_ref().to_lowercase())
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Case-insensitive substring test against any query.
    pub fn matches(&self, haystack: &str) -> bool {
        if self.0.is_empty() {
            return false;
        }
        let haystack = haystack.to_lowercase();
        self.0.iter().any(|q| haystack.contains(q.as_str()))
    }
}

impl From<&str> for Queries {
    fn from(query: &str) -> Self {
        Self::new([query])
    }
}

impl From<String> for Queries {
    fn from(query: String) -> Self {
        Self::new([query])
    }
}

impl From<&[&str]> for Queries {
    fn from(queries: &[&str]) -> Self {
        Self::new(queries)
    }
}

impl<const N: usize> From<[&str; N]> for Queries {
    fn from(queries: [&str; N]) -> Self {
        Self::new(queries)
    }
}

impl From<Vec<&str>> for Queries {
    fn from(queries: Vec<&str>) -> Self {
        Self::new(queries)
    }
}

impl From<Vec<String>> for Queries {
    fn from(queries: Vec<String>) -> Self {
        Self::new(queries)
    }
}

/// Return every record whose body text or abstract contains any of
/// `queries`, ignoring case, in index order.
///
/// Each record is loaded once. The first load or accessor failure aborts
/// the search.
pub fn search(
    ps: &Paperset,
    queries: impl Into<Queries>,
) -> Result<Vec<Record>> {
    let queries = queries.into();
    let mut hits = Vec::new();

    for record in ps {
        let record = record?;
        if queries.matches(&get_text(&record)?)
            || queries.matches(&get_abstract(&record)?)
        {
            hits.push(record);
        }
    }

    debug!(
        queries = ?queries.as_slice(),
        scanned = ps.len(),
        hits = hits.len(),
        "search finished"
    );
    Ok(hits)
}

fn display_id(record: &Record) -> String {
    get_paper_id(record)
        .unwrap_or_else(|_| record.source().display().to_string())
}

/// Format results for human-readable terminal output.
pub fn format_human<W: Write>(out: &mut W, results: &[Record]) -> Result<()> {
    if results.is_empty() {
        writeln!(out, "No results found.")?;
        return Ok(());
    }

    for (i, record) in results.iter().enumerate() {
        writeln!(out, "{:>3}. {}", i + 1, display_id(record))?;
        if let Ok(title) = get_title(record)
            && !title.is_empty()
        {
            writeln!(out, "     {title}")?;
        }
    }
    writeln!(out, "\n{} result(s)", results.len())?;
    Ok(())
}

/// Format results as a JSON document holding the full records.
pub fn format_json<W: Write>(
    out: &mut W,
    results: &[Record],
    queries: &Queries,
) -> Result<()> {
    let doc = json!({
        "queries": queries.as_slice(),
        "result_count": results.len(),
        "results": results,
    });
    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out)?;
    Ok(())
}

/// Format results as plain file paths (one per line).
pub fn format_files<W: Write>(out: &mut W, results: &[Record]) -> Result<()> {
    for record in results {
        writeln!(out, "{}", record.source().display())?;
    }
    Ok(())
}
