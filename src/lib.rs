//! cotools - lazy access to a directory of CORD-19 paper records.
//!
//! A [`Paperset`] indexes a directory of one-paper-per-file JSON documents
//! without reading them. Records are loaded and parsed only when a position
//! or slice is accessed, and are never cached. On top of that sit a
//! case-insensitive substring [`search`](search::search), a join against the
//! `meta_data.csv` table stored alongside the papers, and a [`Downloader`]
//! that fetches and unpacks the published CORD-19 archives.
//!
//! # Quick start
//!
//! ```no_run
//! use cotools::{Paperset, Slice, record, search};
//!
//! let papers = Paperset::new("data/comm_use_subset").unwrap();
//! println!("{} papers", papers.len());
//!
//! let first = papers.get(0).unwrap();
//! println!("{}", record::get_title(&first).unwrap());
//!
//! let some = papers.slice(&Slice::range(10, 20)).unwrap();
//! assert!(some.len() <= 10);
//!
//! for hit in search::search(&papers, ["covid", "sars-cov-2"]).unwrap() {
//!     println!("{}", record::get_paper_id(&hit).unwrap());
//! }
//!
//! let metadata = papers.get_metadata().unwrap();
//! println!("{} metadata rows", metadata.len());
//! ```

pub mod cli;
pub mod data_dir;
pub mod download;
pub mod error;
pub mod metadata;
pub mod paperset;
pub mod record;
pub mod search;
pub mod selection;
#[cfg(test)]
pub(crate) mod test_support;
pub mod walker;

pub use data_dir::DataDir;
pub use download::{Downloader, Resource, ResourceKind, Transport};
pub use error::{Error, Result};
pub use metadata::{METADATA_FILE, MetadataTable};
pub use paperset::{Paperset, Selected};
pub use record::Record;
pub use selection::{Selection, Slice};
