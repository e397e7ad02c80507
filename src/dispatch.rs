//! Turns a caller's request into a finished transform.
//!
//! Running is split in two so the caller can be asked before anything is
//! overwritten: [`Dispatcher::prepare`] validates, parses and probes without
//! touching the filesystem, and [`PreparedJob::run`] does the writing.

use crate::config::Config;
use crate::error::{PickError, Result};
use crate::mode::{Mode, ModeRegistry, ParsedInput};
use crate::naming;
use crate::pdf::{PdfDocument, PdfiumRasterizer, Rasterizer};
use crate::transform::{TransformContext, TransformResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One invocation: which mode to run on which file, with the user's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub mode: String,
    pub input: PathBuf,
    pub raw_input: String,
    pub output: Option<PathBuf>,
}

impl Request {
    pub fn new(mode: impl Into<String>, input: impl Into<PathBuf>, raw_input: impl Into<String>) -> Self {
        Request {
            mode: mode.into(),
            input: input.into(),
            raw_input: raw_input.into(),
            output: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Overwrite,
    Abort,
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Completed(TransformResult),
    /// Existing output was found and the caller declined to replace it.
    Aborted,
}

/// The channel used to ask whether existing output may be replaced.
pub trait ConfirmOverwrite {
    fn ask_overwrite(&mut self, mode: Mode, output: &Path) -> bool;
}

impl<F> ConfirmOverwrite for F
where
    F: FnMut(Mode, &Path) -> bool,
{
    fn ask_overwrite(&mut self, mode: Mode, output: &Path) -> bool {
        self(mode, output)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DispatchOptions {
    pub atomic_writes: bool,
    pub exhaustive_split_probe: bool,
}

impl From<&Config> for DispatchOptions {
    fn from(cfg: &Config) -> Self {
        DispatchOptions {
            atomic_writes: cfg.output.atomic_writes,
            exhaustive_split_probe: cfg.split.exhaustive_overwrite_probe,
        }
    }
}

pub struct Dispatcher {
    registry: ModeRegistry,
    rasterizer: Box<dyn Rasterizer>,
    options: DispatchOptions,
}

impl Dispatcher {
    pub fn new(rasterizer: Box<dyn Rasterizer>, options: DispatchOptions) -> Self {
        Dispatcher {
            registry: ModeRegistry::default(),
            rasterizer,
            options,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            Box::new(PdfiumRasterizer::new(cfg.rasterize.pdfium_library_dir.clone())),
            DispatchOptions::from(cfg),
        )
    }

    pub fn registry(&self) -> &ModeRegistry {
        &self.registry
    }

    fn context(&self) -> TransformContext<'_> {
        TransformContext {
            rasterizer: self.rasterizer.as_ref(),
            atomic_writes: self.options.atomic_writes,
            exhaustive_split_probe: self.options.exhaustive_split_probe,
        }
    }

    /// Resolve, validate, parse and probe. Nothing is written.
    ///
    /// Every artifact the mode would write is checked against the input, not
    /// just the output path.
    pub fn prepare(&self, request: &Request) -> Result<PreparedJob<'_>> {
        let mode = self.registry.resolve(&request.mode)?;
        let output = request.output.clone().ok_or(PickError::MissingOutputPath)?;
        naming::validate(&request.input, &output)?;

        let parsed = mode.parse_input(&request.raw_input)?;
        debug!(%mode, input = %parsed, "parsed request");

        // Chunk names depend on the page count, and any of them may land on
        // the input.
        let split_total_pages = match parsed {
            ParsedInput::Chunk(_) => Some(PdfDocument::open(&request.input)?.page_count()),
            ParsedInput::Pages(_) => None,
        };
        let existing = naming::existing_artifacts(
            mode,
            &request.input,
            &output,
            &parsed,
            split_total_pages,
        );
        naming::ensure_distinct(&request.input, existing.iter().map(PathBuf::as_path))?;

        let conflicts = mode.check_overwrite(&self.context(), &output, &existing);

        Ok(PreparedJob {
            dispatcher: self,
            mode,
            input: request.input.clone(),
            output,
            parsed,
            conflicts,
        })
    }

    /// Prepare and run, asking `confirm` only if output already exists.
    pub fn execute(&self, request: &Request, confirm: &mut dyn ConfirmOverwrite) -> Result<Outcome> {
        let job = self.prepare(request)?;
        let decision = if job.requires_confirmation() && !confirm.ask_overwrite(job.mode, &job.output) {
            Confirmation::Abort
        } else {
            Confirmation::Overwrite
        };
        job.run(decision)
    }
}

/// A validated request waiting to run.
pub struct PreparedJob<'a> {
    dispatcher: &'a Dispatcher,
    mode: Mode,
    input: PathBuf,
    output: PathBuf,
    parsed: ParsedInput,
    conflicts: bool,
}

impl PreparedJob<'_> {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn parsed(&self) -> &ParsedInput {
        &self.parsed
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Whether running would overwrite existing output.
    pub fn requires_confirmation(&self) -> bool {
        self.conflicts
    }

    /// Run the transform, unless existing output would be replaced without
    /// `Confirmation::Overwrite`.
    pub fn run(self, decision: Confirmation) -> Result<Outcome> {
        if self.conflicts && decision != Confirmation::Overwrite {
            info!(mode = %self.mode, output = %self.output.display(), "overwrite declined");
            return Ok(Outcome::Aborted);
        }

        let ctx = self.dispatcher.context();
        let result = self
            .mode
            .transform(&ctx, &self.input, &self.parsed, &self.output)?;
        Ok(Outcome::Completed(result))
    }
}
