pub mod document;
pub mod raster;
#[cfg(test)]
pub mod testing;

pub use document::PdfDocument;
pub use raster::{PdfiumRasterizer, Rasterizer};
