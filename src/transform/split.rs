use super::{save_pdf, TransformContext, TransformResult};
use crate::chunk_size::ChunkSize;
use crate::error::Result;
use crate::naming;
use crate::page_range::PageSet;
use crate::pdf::PdfDocument;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Write every `size` consecutive pages of `input` to `{base}_part{N}.pdf`.
///
/// Chunks already written stay on disk if a later one fails.
pub fn run(
    ctx: &TransformContext<'_>,
    input: &Path,
    size: ChunkSize,
    output: &Path,
) -> Result<TransformResult> {
    let doc = PdfDocument::open(input)?;
    let total_pages = doc.page_count();

    let mut written: Vec<PathBuf> = Vec::new();
    for (i, window) in size.windows(total_pages).iter().enumerate() {
        let chunk_path = naming::chunk_path(output, i as u32 + 1);
        let saved = doc
            .extract_pages(window)
            .and_then(|mut chunk| save_pdf(&mut chunk, &chunk_path, ctx.atomic_writes));

        if let Err(e) = saved {
            if !written.is_empty() {
                warn!(?written, failed = %chunk_path.display(), "leaving chunks written before the failure");
            }
            return Err(e);
        }
        info!(chunk = i + 1, pages = window.len(), output = %chunk_path.display(), "wrote chunk");
        written.push(chunk_path);
    }

    let output_dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let summary = if total_pages == 0 {
        "PDF has no pages; nothing to split".to_string()
    } else {
        format!(
            "Split {} pages into {} files of up to {} pages in {}",
            total_pages,
            written.len(),
            size,
            output_dir.display()
        )
    };

    Ok(TransformResult {
        mode: "split",
        success: true,
        summary,
        total_pages,
        valid_pages: (1..=total_pages).collect(),
        invalid_pages: PageSet::default(),
        outputs: written,
    })
}
