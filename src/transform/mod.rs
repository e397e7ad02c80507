pub mod rasterize;
pub mod split;
pub mod trim;

use crate::error::{PickError, Result};
use crate::page_range::PageSet;
use crate::pdf::Rasterizer;
use lopdf::Document;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Collaborators and settings every transform runs with.
pub struct TransformContext<'a> {
    pub rasterizer: &'a dyn Rasterizer,
    pub atomic_writes: bool,
    pub exhaustive_split_probe: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransformResult {
    pub mode: &'static str,
    pub success: bool,
    pub summary: String,
    pub total_pages: u32,
    /// Pages that were written, ascending.
    pub valid_pages: Vec<u32>,
    /// Requested pages the document doesn't have, as runs.
    pub invalid_pages: PageSet,
    pub outputs: Vec<PathBuf>,
}

/// Text appended to summaries when requested pages were out of range.
fn skipped_note(invalid: &PageSet, total_pages: u32) -> String {
    if invalid.is_empty() {
        String::new()
    } else {
        format!(
            "\n\nSkipped invalid pages: {} (PDF has {} pages)",
            invalid, total_pages
        )
    }
}

/// Create `path` and hand it to `write`.
///
/// With `atomic`, the bytes go to a temporary file in the same directory
/// that is renamed over `path` once `write` succeeds, so a failure never
/// leaves a truncated artifact behind.
pub(crate) fn write_artifact<F>(path: &Path, atomic: bool, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> std::result::Result<(), BoxError>,
{
    if !atomic {
        let mut file = File::create(path).map_err(|e| PickError::io(path, e))?;
        return write(&mut file).map_err(|e| PickError::io(path, e));
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".pdfpick-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| PickError::io(path, e))?;
    write(tmp.as_file_mut()).map_err(|e| PickError::io(path, e))?;
    tmp.persist(path).map_err(|e| PickError::io(path, e.error))?;
    Ok(())
}

pub(crate) fn save_pdf(doc: &mut Document, path: &Path, atomic: bool) -> Result<()> {
    write_artifact(path, atomic, |file| {
        let mut writer = BufWriter::new(file);
        doc.save_to(&mut writer).map_err(|e| e.to_string())?;
        writer.flush()?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_write_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        write_artifact(&path, true, |f| Ok(f.write_all(b"hello")?)).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_atomic_write_failure_keeps_old_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"old").unwrap();

        let err = write_artifact(&path, true, |f| {
            f.write_all(b"half")?;
            Err("encoder blew up".into())
        })
        .unwrap_err();

        assert!(matches!(err, PickError::Io { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), b"old");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_direct_write_failure_leaves_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"old").unwrap();

        let result = write_artifact(&path, false, |f| {
            f.write_all(b"half")?;
            Err("encoder blew up".into())
        });

        assert!(result.is_err());
        assert_eq!(std::fs::read(&path).unwrap(), b"half");
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.bin");
        for atomic in [true, false] {
            let err = write_artifact(&path, atomic, |_| Ok(())).unwrap_err();
            assert!(matches!(err, PickError::Io { .. }));
        }
    }

    #[test]
    fn test_skipped_note() {
        assert_eq!(skipped_note(&PageSet::default(), 5), "");

        let (_, invalid) = PageSet::parse("0,3,9-4000000000").unwrap().partition(5);
        assert_eq!(
            skipped_note(&invalid, 5),
            "\n\nSkipped invalid pages: 0,9-4000000000 (PDF has 5 pages)"
        );
    }
}
