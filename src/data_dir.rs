use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DATA_DIR_ENV_VAR: &str = "COTOOLS_DATA_DIR";

/// Directory the downloader writes into.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Resolve the data directory from, in order of priority:
    /// 1. An explicit path (from --dir)
    /// 2. The COTOOLS_DATA_DIR environment variable
    /// 3. The current directory
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        Self::resolve_with(explicit, std::env::var_os(DATA_DIR_ENV_VAR))
    }

    fn resolve_with(
        explicit: Option<&Path>,
        env: Option<std::ffi::OsString>,
    ) -> Result<Self> {
        let root = match (explicit, env) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(val)) if !val.is_empty() => PathBuf::from(val),
            _ => PathBuf::from("."),
        };

        std::fs::create_dir_all(&root).map_err(|e| {
            Error::Config(format!(
                "data directory {} does not exist and could not be created: {e}",
                root.display()
            ))
        })?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
