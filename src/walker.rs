use std::{ffi::OsString, path::Path};

use tracing::{debug, trace};

use crate::{
    error::{Error, Result},
    metadata::METADATA_FILE,
};

/// List the record files directly under `dir`.
///
/// Entries come back in the order the filesystem reports them, which is
/// platform dependent. Subdirectories, other non-regular entries and the
/// metadata table are skipped.
pub fn list_record_files(dir: &Path) -> Result<Vec<OsString>> {
    if !dir.is_dir() {
        return Err(Error::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();

        if name == METADATA_FILE {
            continue;
        }

        // Follows symlinks, so a link to a regular file is kept.
        if !entry.path().is_file() {
            trace!(
                name = %name.to_string_lossy(),
                "skipping non-file entry"
            );
            continue;
        }

        names.push(name);
    }

    debug!(dir = %dir.display(), count = names.len(), "listed record files");
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_regular_files() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.json"), "{}").unwrap();
        std::fs::write(tmp.path().join("b.json"), "{}").unwrap();

        let mut names = list_record_files(tmp.path()).unwrap();
        names.sort();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn skips_metadata_and_directories() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.json"), "{}").unwrap();
        std::fs::write(tmp.path().join(METADATA_FILE), "sha\n").unwrap();
        std::fs::create_dir(tmp.path().join("nested")).unwrap();
        std::fs::write(tmp.path().join("nested").join("b.json"), "{}")
            .unwrap();

        let names = list_record_files(tmp.path()).unwrap();
        assert_eq!(names, vec!["a.json"]);
    }

    #[test]
    fn does_not_filter_by_extension() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "not json").unwrap();

        let names = list_record_files(tmp.path()).unwrap();
        assert_eq!(names, vec!["notes.txt"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn keeps_non_utf8_names_intact() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let tmp = tempfile::tempdir().unwrap();
        let name = OsStr::from_bytes(b"p\xff.json");
        std::fs::write(tmp.path().join(name), "{}").unwrap();

        let names = list_record_files(tmp.path()).unwrap();
        assert_eq!(names, vec![name.to_os_string()]);
    }

    #[test]
    fn missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let err = list_record_files(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::DirectoryNotFound(_)));
    }

    #[test]
    fn file_instead_of_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("file.json");
        std::fs::write(&file, "{}").unwrap();

        let err = list_record_files(&file).unwrap_err();
        assert!(matches!(err, Error::DirectoryNotFound(_)));
    }

    #[test]
    fn empty_directory() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(list_record_files(tmp.path()).unwrap().is_empty());
    }
}
