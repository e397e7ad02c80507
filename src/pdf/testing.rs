//! Fixtures shared by the unit tests.

use crate::error::{PickError, Result};
use crate::pdf::raster::{RasterDocument, Rasterizer};
use crate::pdf::PdfDocument;
use image::{Rgba, RgbaImage};
use lopdf::{dictionary, Document, Object};
use std::path::{Path, PathBuf};

/// Write a PDF with `num_pages` blank pages to `dir/name`. Each page carries
/// a `PageTag` entry holding its 1-based position in this file.
pub fn write_test_pdf(dir: &Path, name: &str, num_pages: u32) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for i in 1..=num_pages {
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "PageTag" => i as i64,
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => num_pages as i64,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

/// The `PageTag` of every page, in page order.
pub fn page_tags(doc: &Document) -> Vec<u32> {
    doc.get_pages()
        .values()
        .map(|&id| {
            doc.get_dictionary(id)
                .unwrap()
                .get(b"PageTag")
                .unwrap()
                .as_i64()
                .unwrap() as u32
        })
        .collect()
}

pub fn tags_in_file(path: &Path) -> Vec<u32> {
    page_tags(&Document::load(path).unwrap())
}

/// Renders every page as a small solid image; reads page counts with lopdf.
#[derive(Default)]
pub struct FakeRasterizer {
    /// Rendering this page fails.
    pub fail_on: Option<u32>,
}

impl Rasterizer for FakeRasterizer {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn RasterDocument + 'a>> {
        let doc = PdfDocument::open(path)?;
        Ok(Box::new(FakePages {
            page_count: doc.page_count(),
            fail_on: self.fail_on,
        }))
    }
}

struct FakePages {
    page_count: u32,
    fail_on: Option<u32>,
}

impl RasterDocument for FakePages {
    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn render(&self, page: u32, scale: f32) -> Result<RgbaImage> {
        if self.fail_on == Some(page) {
            return Err(PickError::TransformFailed {
                mode: "rasterize",
                message: format!("unable to render page {}", page),
                source: None,
            });
        }
        let side = (8.0 * scale) as u32;
        Ok(RgbaImage::from_pixel(side, side, Rgba([page as u8, 0, 0, 255])))
    }
}
