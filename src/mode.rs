//! The processing modes a caller can pick from.
//!
//! Each mode bundles a parser for its text input, an overwrite probe, and a
//! transform. [`ModeRegistry`] holds the fixed list and resolves names.

use crate::chunk_size::ChunkSize;
use crate::error::{PickError, Result};
use crate::naming;
use crate::page_range::PageSet;
use crate::transform::{self, TransformContext, TransformResult};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Keep a subset of pages in one new PDF.
    Selection,
    /// Cut the whole document into fixed-size PDFs.
    Split,
    /// Render pages to PNG images.
    Rasterize,
}

/// What a mode writes at its output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    File,
    /// `{base}_part{N}.pdf` next to the output path.
    ChunkSeries,
    /// `{stem}_page{N}.png` inside the output path.
    ImageDirectory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedInput {
    Pages(PageSet),
    Chunk(ChunkSize),
}

impl fmt::Display for ParsedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedInput::Pages(pages) => write!(f, "pages {}", pages),
            ParsedInput::Chunk(size) => write!(f, "chunks of {}", size),
        }
    }
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Selection, Mode::Split, Mode::Rasterize];

    pub fn name(self) -> &'static str {
        match self {
            Mode::Selection => "selection",
            Mode::Split => "split",
            Mode::Rasterize => "rasterize",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Mode::Selection => &["trim"],
            Mode::Split => &[],
            Mode::Rasterize => &["images"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Selection => "Create Trimmed PDF",
            Mode::Split => "Split PDF",
            Mode::Rasterize => "Export Pages as Images",
        }
    }

    pub fn input_label(self) -> &'static str {
        match self {
            Mode::Selection | Mode::Rasterize => "Page Ranges",
            Mode::Split => "Pages per File",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Mode::Selection | Mode::Rasterize => "e.g., 1-3,5,6-9,11",
            Mode::Split => "e.g., 10",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            Mode::Selection => "Examples: 1-3,5,6-9,11  or  1,3,5  or  10-20",
            Mode::Split => "Every N pages go to a new file; the last file may be shorter",
            Mode::Rasterize => "Each page becomes a PNG at twice its size",
        }
    }

    pub fn output_suffix(self) -> &'static str {
        match self {
            Mode::Selection => "_trimmed",
            Mode::Split => "_split",
            Mode::Rasterize => "_images",
        }
    }

    pub fn output_kind(self) -> OutputKind {
        match self {
            Mode::Selection => OutputKind::File,
            Mode::Split => OutputKind::ChunkSeries,
            Mode::Rasterize => OutputKind::ImageDirectory,
        }
    }

    pub fn parse_input(self, raw: &str) -> Result<ParsedInput> {
        match self {
            Mode::Selection | Mode::Rasterize => PageSet::parse(raw).map(ParsedInput::Pages),
            Mode::Split => ChunkSize::parse(raw).map(ParsedInput::Chunk),
        }
    }

    /// Whether running this mode would replace one of the `existing`
    /// artifacts. Split only counts its first chunk unless the exhaustive
    /// probe is on.
    pub fn check_overwrite(
        self,
        ctx: &TransformContext<'_>,
        output: &Path,
        existing: &[PathBuf],
    ) -> bool {
        let exists = match self {
            Mode::Split if !ctx.exhaustive_split_probe => {
                let first = naming::chunk_path(output, 1);
                existing.iter().any(|p| *p == first)
            }
            _ => !existing.is_empty(),
        };
        debug!(mode = self.name(), output = %output.display(), exists, "overwrite probe");
        exists
    }

    pub fn transform(
        self,
        ctx: &TransformContext<'_>,
        input: &Path,
        parsed: &ParsedInput,
        output: &Path,
    ) -> Result<TransformResult> {
        match (self, parsed) {
            (Mode::Selection, ParsedInput::Pages(pages)) => {
                transform::trim::run(ctx, input, pages, output)
            }
            (Mode::Split, ParsedInput::Chunk(size)) => {
                transform::split::run(ctx, input, *size, output)
            }
            (Mode::Rasterize, ParsedInput::Pages(pages)) => {
                transform::rasterize::run(ctx, input, pages, output)
            }
            (mode, parsed) => Err(PickError::TransformFailed {
                mode: mode.name(),
                message: format!("cannot run on {}", parsed),
                source: None,
            }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct ModeRegistry {
    modes: Vec<Mode>,
}

impl Default for ModeRegistry {
    fn default() -> Self {
        ModeRegistry {
            modes: Mode::ALL.to_vec(),
        }
    }
}

impl ModeRegistry {
    /// Look up a mode by name or alias, ignoring case.
    pub fn resolve(&self, name: &str) -> Result<Mode> {
        let name = name.trim();
        self.modes
            .iter()
            .copied()
            .find(|mode| {
                mode.name().eq_ignore_ascii_case(name)
                    || mode.aliases().iter().any(|a| a.eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| PickError::UnknownMode(name.to_string()))
    }

    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolve_names_and_aliases() {
        let registry = ModeRegistry::default();
        assert_eq!(registry.resolve("selection").unwrap(), Mode::Selection);
        assert_eq!(registry.resolve("Trim").unwrap(), Mode::Selection);
        assert_eq!(registry.resolve("SPLIT").unwrap(), Mode::Split);
        assert_eq!(registry.resolve(" images ").unwrap(), Mode::Rasterize);
    }

    #[test]
    fn test_resolve_unknown() {
        let err = ModeRegistry::default().resolve("merge").unwrap_err();
        assert!(matches!(err, PickError::UnknownMode(name) if name == "merge"));
    }

    #[test]
    fn test_registry_order() {
        assert_eq!(
            ModeRegistry::default().modes(),
            &[Mode::Selection, Mode::Split, Mode::Rasterize]
        );
    }

    #[test]
    fn test_parsers_per_mode() {
        assert!(matches!(
            Mode::Selection.parse_input("1-3"),
            Ok(ParsedInput::Pages(_))
        ));
        assert!(matches!(
            Mode::Rasterize.parse_input("2"),
            Ok(ParsedInput::Pages(_))
        ));
        assert!(matches!(
            Mode::Split.parse_input("4"),
            Ok(ParsedInput::Chunk(size)) if size.get() == 4
        ));
        assert!(matches!(
            Mode::Split.parse_input("1-3"),
            Err(PickError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_suffixes_are_distinct() {
        let suffixes: std::collections::HashSet<_> =
            Mode::ALL.iter().map(|m| m.output_suffix()).collect();
        assert_eq!(suffixes.len(), Mode::ALL.len());
    }
}
