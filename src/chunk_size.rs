use crate::error::{PickError, Result};
use std::fmt;
use std::num::{IntErrorKind, NonZeroU32};

/// Number of pages per output file when splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSize(NonZeroU32);

impl ChunkSize {
    /// Parse a positive page count. Sizes beyond any possible document are
    /// clamped, since they all mean "one chunk".
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let n: i64 = match s.parse() {
            Ok(n) => n,
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => i64::MAX,
            Err(e) if *e.kind() == IntErrorKind::NegOverflow => i64::MIN,
            Err(_) => {
                return Err(PickError::InvalidFormat(format!("Invalid chunk size: {:?}", s)));
            }
        };

        if n <= 0 {
            return Err(PickError::InvalidFormat(format!(
                "Chunk size must be a positive integer, got {}",
                s
            )));
        }
        let n = u32::try_from(n).unwrap_or(u32::MAX);
        Ok(ChunkSize(NonZeroU32::new(n).unwrap_or(NonZeroU32::MAX)))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// The 1-based page windows for a document of `total_pages` pages.
    /// The last window may be shorter; an empty document has none.
    pub fn windows(self, total_pages: u32) -> Vec<Vec<u32>> {
        let pages: Vec<u32> = (1..=total_pages).collect();
        pages
            .chunks(self.get() as usize)
            .map(|chunk| chunk.to_vec())
            .collect()
    }

    /// How many files splitting `total_pages` pages produces.
    pub fn chunk_count(self, total_pages: u32) -> u32 {
        total_pages.div_ceil(self.get())
    }
}

impl fmt::Display for ChunkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_positive() {
        assert_eq!(ChunkSize::parse("4").unwrap().get(), 4);
        assert_eq!(ChunkSize::parse(" 12 ").unwrap().get(), 12);
    }

    #[test]
    fn test_parse_rejects_non_positive() {
        for s in ["0", "-3", "-99999999999999999999999"] {
            assert!(matches!(
                ChunkSize::parse(s),
                Err(PickError::InvalidFormat(_))
            ));
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for s in ["", "four", "2.5", "1-3", "+"] {
            assert!(matches!(
                ChunkSize::parse(s),
                Err(PickError::InvalidFormat(_))
            ));
        }
    }

    #[test]
    fn test_windows() {
        let size = ChunkSize::parse("4").unwrap();
        let windows = size.windows(10);
        let lens: Vec<usize> = windows.iter().map(|w| w.len()).collect();
        assert_eq!(lens, vec![4, 4, 2]);
        assert_eq!(windows[2], vec![9, 10]);
        assert_eq!(size.chunk_count(10), 3);
    }

    #[test]
    fn test_windows_cover_every_page_once() {
        for total in [1u32, 5, 7, 12, 13] {
            for k in 1..=6 {
                let size = ChunkSize::parse(&k.to_string()).unwrap();
                let windows = size.windows(total);
                assert_eq!(windows.len() as u32, size.chunk_count(total));
                let flat: Vec<u32> = windows.iter().flatten().copied().collect();
                assert_eq!(flat, (1..=total).collect::<Vec<_>>());
                for window in &windows[..windows.len() - 1] {
                    assert_eq!(window.len() as u32, k);
                }
            }
        }
    }

    #[test]
    fn test_oversized_chunk_gives_one_window() {
        let size = ChunkSize::parse("50").unwrap();
        assert_eq!(size.windows(10).len(), 1);
    }

    #[test]
    fn test_huge_size_is_clamped() {
        for s in ["4294967295", "5000000000", "99999999999999999999999"] {
            let size = ChunkSize::parse(s).unwrap();
            assert_eq!(size.get(), u32::MAX, "{}", s);
            assert_eq!(size.chunk_count(10), 1);
            assert_eq!(size.windows(10), vec![(1..=10).collect::<Vec<u32>>()]);
        }
    }

    #[test]
    fn test_empty_document_gives_no_windows() {
        let size = ChunkSize::parse("3").unwrap();
        assert!(size.windows(0).is_empty());
        assert_eq!(size.chunk_count(0), 0);
    }
}
