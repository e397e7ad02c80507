use crate::error::{PickError, Result};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt;
use std::ops::RangeInclusive;

/// A set of 1-based page numbers, kept as sorted, disjoint, non-adjacent
/// inclusive runs so that "1-4294967295" costs one entry.
///
/// Numbers are not checked against any document here; `0` or numbers past
/// the end are partitioned out by the transforms and reported as skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSet {
    runs: Vec<RangeInclusive<u32>>,
}

impl PageSet {
    /// Parse a page specification like "1-3,5,6-9,11".
    ///
    /// Whitespace anywhere is ignored, as are empty segments ("1,,3").
    /// A specification with no pages at all is rejected.
    pub fn parse(s: &str) -> Result<Self> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();

        let mut runs = Vec::new();
        for part in compact.split(',') {
            if part.is_empty() {
                continue;
            }

            if let Some((start, end)) = part.split_once('-') {
                let start = parse_page_number(start, part)?;
                let end = parse_page_number(end, part)?;
                if start > end {
                    return Err(PickError::InvalidFormat(format!(
                        "Invalid range {} (start > end)",
                        part
                    )));
                }
                runs.push(start..=end);
            } else {
                let page = parse_page_number(part, part)?;
                runs.push(page..=page);
            }
        }

        if runs.is_empty() {
            return Err(PickError::InvalidFormat("No pages specified".into()));
        }

        Ok(Self::from_runs(runs))
    }

    /// Sort and coalesce overlapping or touching runs.
    fn from_runs(mut runs: Vec<RangeInclusive<u32>>) -> Self {
        runs.sort_by_key(|r| *r.start());

        let mut merged: Vec<RangeInclusive<u32>> = Vec::with_capacity(runs.len());
        for run in runs {
            match merged.last_mut() {
                Some(last) if *run.start() <= last.end().saturating_add(1) => {
                    if run.end() > last.end() {
                        *last = *last.start()..=*run.end();
                    }
                }
                _ => merged.push(run),
            }
        }
        PageSet { runs: merged }
    }

    pub fn runs(&self) -> &[RangeInclusive<u32>] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn contains(&self, page: u32) -> bool {
        let i = self.runs.partition_point(|r| *r.end() < page);
        self.runs.get(i).is_some_and(|r| r.contains(&page))
    }

    /// Split into the pages that exist in a document of `total_pages` pages,
    /// ascending, and the runs that fall outside it.
    ///
    /// Only the valid side is expanded, so its length is bounded by the
    /// document.
    pub fn partition(&self, total_pages: u32) -> (Vec<u32>, PageSet) {
        let mut valid = Vec::new();
        let mut invalid = Vec::new();

        for run in &self.runs {
            let (start, end) = (*run.start(), *run.end());
            if start == 0 {
                invalid.push(0..=0);
            }

            let lo = start.max(1);
            let hi = end.min(total_pages);
            if lo <= hi {
                valid.extend(lo..=hi);
            }

            if let Some(past_end) = total_pages.checked_add(1) {
                if end >= past_end {
                    invalid.push(start.max(past_end)..=end);
                }
            }
        }

        (valid, Self::from_runs(invalid))
    }
}

fn parse_page_number(s: &str, segment: &str) -> Result<u32> {
    s.parse::<u32>().map_err(|_| {
        PickError::InvalidFormat(format!("Invalid page number {:?} in {:?}", s, segment))
    })
}

fn write_run(f: &mut impl fmt::Write, run: &RangeInclusive<u32>) -> fmt::Result {
    if run.start() == run.end() {
        write!(f, "{}", run.start())
    } else {
        write!(f, "{}-{}", run.start(), run.end())
    }
}

/// Renders the canonical form: consecutive runs collapse to "a-b".
impl fmt::Display for PageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, run) in self.runs.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write_run(f, run)?;
        }
        Ok(())
    }
}

/// Serialized as a list of runs in canonical form, e.g. `["1-3", "5"]`.
impl Serialize for PageSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.runs.len()))?;
        for run in &self.runs {
            let mut text = String::new();
            write_run(&mut text, run).map_err(serde::ser::Error::custom)?;
            seq.serialize_element(&text)?;
        }
        seq.end()
    }
}
