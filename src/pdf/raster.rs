//! Page rendering.
//!
//! lopdf can restructure documents but not draw them, so rendering goes
//! through a separate backend behind [`Rasterizer`]. The production backend
//! is PDFium, loaded at runtime on first use.

use crate::error::{PickError, Result};
use image::RgbaImage;
use pdfium_render::prelude::{PdfDocument as PdfiumDocument, PdfRenderConfig, Pdfium};
use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use tracing::debug;

pub trait Rasterizer {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn RasterDocument + 'a>>;
}

/// An opened document that can render its pages.
pub trait RasterDocument {
    fn page_count(&self) -> u32;

    /// Render 1-based `page`, scaling its size in points by `scale`.
    fn render(&self, page: u32, scale: f32) -> Result<RgbaImage>;
}

pub struct PdfiumRasterizer {
    library_dir: Option<PathBuf>,
    pdfium: OnceCell<Pdfium>,
}

impl PdfiumRasterizer {
    pub fn new(library_dir: Option<PathBuf>) -> Self {
        PdfiumRasterizer {
            library_dir,
            pdfium: OnceCell::new(),
        }
    }

    fn pdfium(&self) -> Result<&Pdfium> {
        if let Some(pdfium) = self.pdfium.get() {
            return Ok(pdfium);
        }

        let bindings = match &self.library_dir {
            Some(dir) => {
                // Some releases append the file name to the string as-is.
                let mut dir = dir.to_string_lossy().into_owned();
                if !dir.ends_with(std::path::MAIN_SEPARATOR) {
                    dir.push(std::path::MAIN_SEPARATOR);
                }
                let lib = Pdfium::pdfium_platform_library_name_at_path(&dir);
                debug!(library = ?lib, "binding PDFium");
                Pdfium::bind_to_library(lib)
            }
            None => {
                debug!("binding system PDFium");
                Pdfium::bind_to_system_library()
            }
        }
        .map_err(|e| PickError::TransformFailed {
            mode: "rasterize",
            message: format!("failed to load PDFium: {}", e),
            source: None,
        })?;

        Ok(self.pdfium.get_or_init(|| Pdfium::new(bindings)))
    }
}

impl Rasterizer for PdfiumRasterizer {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn RasterDocument + 'a>> {
        let pdfium = self.pdfium()?;
        let path_str = path.to_string_lossy().into_owned();
        let doc = pdfium
            .load_pdf_from_file(&path_str, None)
            .map_err(|e| PickError::open(path, e.to_string()))?;
        Ok(Box::new(PdfiumPages { doc }))
    }
}

struct PdfiumPages<'a> {
    doc: PdfiumDocument<'a>,
}

impl RasterDocument for PdfiumPages<'_> {
    fn page_count(&self) -> u32 {
        self.doc.pages().len() as u32
    }

    fn render(&self, page: u32, scale: f32) -> Result<RgbaImage> {
        let render_failed = |message: String| PickError::TransformFailed {
            mode: "rasterize",
            message,
            source: None,
        };

        let index = page_index(page)
            .ok_or_else(|| render_failed(format!("page {} not found", page)))?;
        let pdf_page = self
            .doc
            .pages()
            .get(index)
            .map_err(|e| render_failed(format!("page {} not found: {}", page, e)))?;

        let bitmap = pdf_page
            .render_with_config(&PdfRenderConfig::new().scale_page_by_factor(scale))
            .map_err(|e| render_failed(format!("unable to render page {}: {}", page, e)))?;

        // pdfium-render links its own copy of `image`; move the pixels across by value.
        let rendered = bitmap.as_image().to_rgba8();
        let (width, height) = (rendered.width(), rendered.height());
        RgbaImage::from_raw(width, height, rendered.into_raw())
            .ok_or_else(|| render_failed(format!("page {} produced a malformed bitmap", page)))
    }
}

/// PDFium addresses pages by a 0-based `u16`.
fn page_index(page: u32) -> Option<u16> {
    page.checked_sub(1).and_then(|i| u16::try_from(i).ok())
}
