use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Seek, Write},
    path::{Path, PathBuf},
};

use flate2::read::GzDecoder;
use kdam::{BarExt, tqdm};
use tracing::{debug, info};

use crate::{error::Result, metadata::METADATA_FILE};

const CHUNK_SIZE: usize = 64 * 1024;
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A `.tar.gz` bundle of record files.
    Archive,
    /// The CSV metadata table.
    Metadata,
}

/// A named remote file to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    pub name: &'static str,
    pub url: &'static str,
    pub kind: ResourceKind,
}

impl Resource {
    /// Name of the file the resource is saved as in the target directory.
    pub fn file_name(&self) -> String {
        match self.kind {
            ResourceKind::Archive => format!("{}.tar.gz", self.name),
            ResourceKind::Metadata => METADATA_FILE.to_string(),
        }
    }
}

macro_rules! cord19_archive {
    ($name:literal) => {
        Resource {
            name: $name,
            url: concat!(
                "https://ai2-semanticscholar-cord-19.s3-us-west-2.amazonaws.com",
                "/2020-03-13/",
                $name,
                ".tar.gz"
            ),
            kind: ResourceKind::Archive,
        }
    };
}

/// The CORD-19 subsets and metadata table fetched by default.
pub const DEFAULT_RESOURCES: [Resource; 5] = [
    cord19_archive!("comm_use_subset"),
    cord19_archive!("noncomm_use_subset"),
    cord19_archive!("pmc_custom_license"),
    cord19_archive!("biorxiv_medrxiv"),
    Resource {
        name: "meta_data",
        url: "https://ai2-semanticscholar-cord-19.s3-us-west-2.amazonaws.com/2020-03-27/metadata.csv",
        kind: ResourceKind::Metadata,
    },
];

/// An open response body.
pub struct Fetched {
    pub body: Box<dyn Read>,
    /// Body length in bytes, when the server reports it.
    pub len: Option<u64>,
}

/// Something that can open a URL for reading.
pub trait Transport {
    fn fetch(&self, url: &str) -> Result<Fetched>;
}

/// Blocking HTTP transport. Non-success statuses are errors.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("cotools/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str) -> Result<Fetched> {
        let response = self.client.get(url).send()?.error_for_status()?;
        let len = response.content_length();
        Ok(Fetched {
            body: Box::new(response),
            len,
        })
    }
}

/// Fetches resources into a directory, one after another, then unpacks
/// whatever gzip-compressed tar archives it finds there.
///
/// There is no retry, resume or checksum step; the first error aborts.
pub struct Downloader<T = HttpTransport> {
    transport: T,
    resources: Vec<Resource>,
    progress: bool,
}

impl Downloader<HttpTransport> {
    /// A downloader for [`DEFAULT_RESOURCES`] over HTTP.
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new()?))
    }
}

impl<T: Transport> Downloader<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            resources: DEFAULT_RESOURCES.to_vec(),
            progress: true,
        }
    }

    pub fn resources(mut self, resources: Vec<Resource>) -> Self {
        self.resources = resources;
        self
    }

    /// Show a byte-count progress bar on stderr while fetching.
    pub fn progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Fetch every resource into `dir` (created if missing), then extract
    /// the archives. Returns the paths of the archives that were unpacked.
    pub fn download(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        for resource in &self.resources {
            let target = dir.join(resource.file_name());
            info!(name = resource.name, url = resource.url, "downloading");
            let bytes = self.fetch_to(resource, &target)?;
            info!(path = %target.display(), bytes, "downloaded");
        }

        extract_archives(dir)
    }

    fn fetch_to(&self, resource: &Resource, target: &Path) -> Result<u64> {
        let Fetched { mut body, len } = self.transport.fetch(resource.url)?;
        let mut out = BufWriter::new(File::create(target)?);

        let mut bar = tqdm!(
            total = len.unwrap_or(0) as usize,
            desc = resource.name,
            unit = "B",
            unit_scale = true,
            disable = !self.progress
        );

        let mut buf = vec![0; CHUNK_SIZE];
        let mut written = 0u64;
        loop {
            let n = body.read(&mut buf)?;
            if n == 0 {
                break;
            }
            out.write_all(&buf[..n])?;
            written += n as u64;
            bar.update(n)?;
        }
        out.flush()?;

        Ok(written)
    }
}

/// Unpack every gzip-compressed tar archive directly inside `dir` into
/// `dir`, deleting each archive afterwards.
///
/// Other files are left as they are. Subdirectories are never touched, so
/// subsets extracted by an earlier run survive.
pub fn extract_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        paths.push(entry?.path());
    }
    paths.sort();

    let mut extracted = Vec::new();
    for path in paths {
        if path.is_dir() {
            debug!(path = %path.display(), "leaving directory in place");
            continue;
        }
        if !path.is_file() || !is_tar_gz(&path)? {
            continue;
        }

        info!(path = %path.display(), "extracting");
        let file = BufReader::new(File::open(&path)?);
        tar::Archive::new(GzDecoder::new(file)).unpack(dir)?;
        std::fs::remove_file(&path)?;
        extracted.push(path);
    }

    Ok(extracted)
}

/// Whether `path` is a gzip stream that starts with a readable tar header.
pub fn is_tar_gz(path: &Path) -> Result<bool> {
    let mut file = File::open(path)?;
    let mut magic = Vec::with_capacity(GZIP_MAGIC.len());
    (&mut file)
        .take(GZIP_MAGIC.len() as u64)
        .read_to_end(&mut magic)?;
    if magic != GZIP_MAGIC {
        return Ok(false);
    }

    file.rewind()?;
    let mut archive = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
    let first = match archive.entries() {
        Ok(mut entries) => entries.next(),
        Err(_) => return Ok(false),
    };
    Ok(matches!(first, Some(Ok(_))))
}
