use crate::error::{PickError, Result};
use lopdf::{Document, Object};
use std::path::Path;

pub struct PdfDocument {
    pub doc: Document,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let doc = Document::load(path).map_err(|e| PickError::open(path, e))?;
        Ok(PdfDocument { doc })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get metadata from the document info dictionary
    pub fn get_info(&self) -> PdfInfo {
        let mut info = PdfInfo::default();

        if let Ok(Object::Reference(info_ref)) = self.doc.trailer.get(b"Info") {
            if let Ok(Object::Dictionary(dict)) = self.doc.get_object(*info_ref) {
                info.title = get_string_from_dict(dict, b"Title");
                info.author = get_string_from_dict(dict, b"Author");
                info.creator = get_string_from_dict(dict, b"Creator");
                info.producer = get_string_from_dict(dict, b"Producer");
            }
        }

        info.page_count = self.page_count();
        info
    }

    /// Build a new document holding only `pages` (1-based), in document order.
    ///
    /// `pages` must be ascending and every page must exist; callers
    /// partition out-of-range pages first.
    pub fn extract_pages(&self, pages: &[u32]) -> Result<Document> {
        let total = self.page_count();
        if let Some(&page) = pages.iter().find(|&&p| p == 0 || p > total) {
            return Err(PickError::TransformFailed {
                mode: "extract",
                message: format!("page {} is out of range (1-{})", page, total),
                source: None,
            });
        }

        let mut new_doc = self.doc.clone();
        let pages_to_delete: Vec<u32> = (1..=total)
            .filter(|p| pages.binary_search(p).is_err())
            .collect();
        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
            new_doc.prune_objects();
        }

        Ok(new_doc)
    }
}

#[derive(Debug, Default, Clone)]
pub struct PdfInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub page_count: u32,
}

fn get_string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| match obj {
        Object::String(bytes, _) => decode_pdf_string(bytes),
        _ => None,
    })
}

fn decode_pdf_string(bytes: &[u8]) -> Option<String> {
    // UTF-16BE with BOM, otherwise treat as PDFDocEncoding (approximated by Latin-1)
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let u16_chars: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        String::from_utf16(&u16_chars).ok()
    } else {
        Some(bytes.iter().map(|&b| b as char).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testing::{page_tags, write_test_pdf};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PdfDocument::open(dir.path().join("nope.pdf")).err().unwrap();
        assert!(matches!(err, PickError::Open { .. }));
    }

    #[test]
    fn test_open_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.pdf");
        std::fs::write(&path, b"definitely not a pdf").unwrap();
        assert!(matches!(
            PdfDocument::open(&path),
            Err(PickError::Open { .. })
        ));
    }

    #[test]
    fn test_page_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_pdf(dir.path(), "doc.pdf", 7);
        assert_eq!(PdfDocument::open(&path).unwrap().page_count(), 7);
    }

    #[test]
    fn test_extract_keeps_requested_pages_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_pdf(dir.path(), "doc.pdf", 6);
        let doc = PdfDocument::open(&path).unwrap();

        let extracted = doc.extract_pages(&[2, 4, 5]).unwrap();
        assert_eq!(page_tags(&extracted), vec![2, 4, 5]);
    }

    #[test]
    fn test_extract_scattered_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_pdf(dir.path(), "doc.pdf", 40);
        let doc = PdfDocument::open(&path).unwrap();

        let wanted: Vec<u32> = (1..=40).step_by(3).collect();
        let extracted = doc.extract_pages(&wanted).unwrap();
        assert_eq!(page_tags(&extracted), wanted);
    }

    #[test]
    fn test_extract_rejects_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_pdf(dir.path(), "doc.pdf", 3);
        let doc = PdfDocument::open(&path).unwrap();
        assert!(doc.extract_pages(&[4]).is_err());
        assert!(doc.extract_pages(&[0]).is_err());
    }

    #[test]
    fn test_decode_utf16() {
        let bytes = [0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_pdf_string(&bytes).as_deref(), Some("Hi"));
        assert_eq!(decode_pdf_string(b"plain").as_deref(), Some("plain"));
    }
}
