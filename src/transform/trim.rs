use super::{save_pdf, skipped_note, TransformContext, TransformResult};
use crate::error::{PickError, Result};
use crate::page_range::PageSet;
use crate::pdf::PdfDocument;
use std::path::Path;
use tracing::{info, warn};

/// Write the requested pages that exist in `input` to one new PDF.
pub fn run(
    ctx: &TransformContext<'_>,
    input: &Path,
    pages: &PageSet,
    output: &Path,
) -> Result<TransformResult> {
    let doc = PdfDocument::open(input)?;
    let total_pages = doc.page_count();

    let (valid, invalid) = pages.partition(total_pages);
    if !invalid.is_empty() {
        warn!(%invalid, total_pages, "skipping pages outside the document");
    }
    if valid.is_empty() {
        return Err(PickError::NoValidPages {
            total_pages,
            requested: pages.clone(),
        });
    }

    let mut new_doc = doc.extract_pages(&valid)?;
    save_pdf(&mut new_doc, output, ctx.atomic_writes)?;
    info!(pages = valid.len(), output = %output.display(), "wrote trimmed PDF");

    let summary = format!(
        "Successfully created PDF with {} pages{}",
        valid.len(),
        skipped_note(&invalid, total_pages)
    );

    Ok(TransformResult {
        mode: "selection",
        success: true,
        summary,
        total_pages,
        valid_pages: valid,
        invalid_pages: invalid,
        outputs: vec![output.to_path_buf()],
    })
}
