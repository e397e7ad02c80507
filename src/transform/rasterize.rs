use super::{skipped_note, write_artifact, TransformContext, TransformResult};
use crate::error::{PickError, Result};
use crate::naming;
use crate::page_range::PageSet;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Linear upscaling applied to every page, for legibility.
pub const RASTER_SCALE: f32 = 2.0;

/// Render each requested page that exists in `input` to
/// `output/{stem}_page{N}.png`, creating `output` if needed.
pub fn run(
    ctx: &TransformContext<'_>,
    input: &Path,
    pages: &PageSet,
    output: &Path,
) -> Result<TransformResult> {
    let doc = ctx.rasterizer.open(input)?;
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

    std::fs::create_dir_all(output).map_err(|e| PickError::io(output, e))?;

    let stem = naming::file_stem(input);
    let mut written: Vec<PathBuf> = Vec::new();
    for &page in &valid {
        let path = naming::page_image_path(output, &stem, page);
        let saved = doc.render(page, RASTER_SCALE).and_then(|image| {
            write_artifact(&path, ctx.atomic_writes, |file| {
                image.write_to(file, ImageFormat::Png)?;
                Ok(())
            })
        });

        if let Err(e) = saved {
            if !written.is_empty() {
                warn!(?written, failed_page = page, "leaving images written before the failure");
            }
            return Err(e);
        }
        info!(page, output = %path.display(), "wrote page image");
        written.push(path);
    }

    let summary = format!(
        "Successfully created {} images in {}{}",
        written.len(),
        output.display(),
        skipped_note(&invalid, total_pages)
    );

    Ok(TransformResult {
        mode: "rasterize",
        success: true,
        summary,
        total_pages,
        valid_pages: valid,
        invalid_pages: invalid,
        outputs: written,
    })
}
