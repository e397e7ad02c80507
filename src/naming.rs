//! Output paths: defaults per mode, artifact names, and the checks run
//! before anything is written.

use crate::error::{PickError, Result};
use crate::mode::{Mode, OutputKind, ParsedInput};
use std::path::{Path, PathBuf};

pub const PDF_EXTENSION: &str = "pdf";
pub const IMAGE_EXTENSION: &str = "png";

/// `dir/stem.pdf` becomes `dir/stem{suffix}.pdf`, or `dir/stem{suffix}` for
/// modes that write a directory of images.
pub fn default_output_path(input: &Path, mode: Mode) -> PathBuf {
    let stem = file_stem(input);
    let name = match mode.output_kind() {
        OutputKind::File | OutputKind::ChunkSeries => {
            format!("{}{}.{}", stem, mode.output_suffix(), PDF_EXTENSION)
        }
        OutputKind::ImageDirectory => format!("{}{}", stem, mode.output_suffix()),
    };
    input.with_file_name(name)
}

/// Refuse to write over the document being read.
pub fn validate(input: &Path, output: &Path) -> Result<()> {
    ensure_distinct(input, [output])
}

/// Fail with `SameFile` if any of `artifacts` resolves to `input`.
pub fn ensure_distinct<'a>(
    input: &Path,
    artifacts: impl IntoIterator<Item = &'a Path>,
) -> Result<()> {
    let input_resolved = input.canonicalize().map_err(|e| PickError::open(input, e))?;
    match artifacts.into_iter().find(|p| resolve(p) == input_resolved) {
        Some(artifact) => Err(PickError::SameFile(artifact.to_path_buf())),
        None => Ok(()),
    }
}

/// Canonicalize a path that may not exist yet by resolving its parent.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            parent
                .canonicalize()
                .map(|p| p.join(name))
                .unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

/// `out/doc_split.pdf` -> `out/doc_split_part{n}.pdf`
pub fn chunk_path(output: &Path, n: u32) -> PathBuf {
    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or(PDF_EXTENSION);
    output.with_file_name(format!("{}_part{}.{}", file_stem(output), n, ext))
}

/// `dir/{stem}_page{page}.png`
pub fn page_image_path(dir: &Path, stem: &str, page: u32) -> PathBuf {
    dir.join(format!("{}_page{}.{}", stem, page, IMAGE_EXTENSION))
}

pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}

/// Artifacts running `mode` would write that are already on disk, in the
/// order they would be written.
///
/// Split names every chunk when `split_total_pages` is known and only the
/// first otherwise. Rasterize looks in the output directory for images of
/// any requested page, so huge page ranges cost one directory listing.
pub fn existing_artifacts(
    mode: Mode,
    input: &Path,
    output: &Path,
    parsed: &ParsedInput,
    split_total_pages: Option<u32>,
) -> Vec<PathBuf> {
    match (mode, parsed) {
        (Mode::Selection, _) => [output.to_path_buf()]
            .into_iter()
            .filter(|p| p.exists())
            .collect(),
        (Mode::Split, ParsedInput::Chunk(size)) => {
            let count = split_total_pages.map_or(1, |total| size.chunk_count(total));
            (1..=count)
                .map(|n| chunk_path(output, n))
                .filter(|p| p.exists())
                .collect()
        }
        (Mode::Rasterize, ParsedInput::Pages(pages)) => {
            existing_page_images(output, &file_stem(input), |page| pages.contains(page))
        }
        _ => Vec::new(),
    }
}

fn existing_page_images(dir: &Path, stem: &str, wanted: impl Fn(u32) -> bool) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let prefix = format!("{}_page", stem);
    let suffix = format!(".{}", IMAGE_EXTENSION);

    let mut found: Vec<(u32, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            let digits = name.strip_prefix(&prefix)?.strip_suffix(&suffix)?;
            let page: u32 = digits.parse().ok()?;
            // "doc_page07.png" is not a name we would write.
            (page.to_string() == digits && wanted(page)).then(|| (page, entry.path()))
        })
        .collect();
    found.sort_by_key(|(page, _)| *page);
    found.into_iter().map(|(_, path)| path).collect()
}
