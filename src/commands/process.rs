use crate::dispatch::{ConfirmOverwrite, Dispatcher, Outcome, Request};
use crate::mode::Mode;
use crate::naming;
use crate::transform::TransformResult;
use anyhow::Result;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Asks on the terminal. Without a terminal the answer is "no".
pub struct PromptConfirm {
    pub assume_yes: bool,
}

impl ConfirmOverwrite for PromptConfirm {
    fn ask_overwrite(&mut self, mode: Mode, output: &Path) -> bool {
        if self.assume_yes {
            return true;
        }

        let stdin = io::stdin();
        if !stdin.is_terminal() {
            warn!(output = %output.display(), "output exists and stdin is not a terminal; pass --yes to overwrite");
            return false;
        }

        eprint!(
            "{} output already exists at {}\nOverwrite? [y/N] ",
            mode,
            output.display()
        );
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if stdin.lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// Run `mode_name` on `path`, writing to `output` or the mode's default path.
pub fn run(
    dispatcher: &Dispatcher,
    mode_name: &str,
    path: &Path,
    raw_input: &str,
    output: Option<PathBuf>,
    confirm: &mut dyn ConfirmOverwrite,
    json: bool,
) -> Result<Option<TransformResult>> {
    let mode = dispatcher.registry().resolve(mode_name)?;
    let output = output.unwrap_or_else(|| naming::default_output_path(path, mode));
    let request = Request::new(mode.name(), path, raw_input).with_output(output);

    match dispatcher.execute(&request, confirm)? {
        Outcome::Completed(result) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.summary);
                for artifact in &result.outputs {
                    println!("  {}", artifact.display());
                }
            }
            Ok(Some(result))
        }
        Outcome::Aborted => {
            eprintln!("Aborted; existing output left untouched.");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchOptions;
    use crate::pdf::testing::{write_test_pdf, FakeRasterizer};

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(
            Box::new(FakeRasterizer::default()),
            DispatchOptions {
                atomic_writes: true,
                exhaustive_split_probe: false,
            },
        )
    }

    #[test]
    fn test_uses_default_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_test_pdf(dir.path(), "report.pdf", 4);

        let mut confirm = PromptConfirm { assume_yes: false };
        let result = run(&dispatcher(), "trim", &input, "1-2", None, &mut confirm, false)
            .unwrap()
            .unwrap();
        assert_eq!(result.outputs, vec![dir.path().join("report_trimmed.pdf")]);
    }

    #[test]
    fn test_assume_yes_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_test_pdf(dir.path(), "report.pdf", 4);
        let output = dir.path().join("report_trimmed.pdf");
        std::fs::write(&output, b"old").unwrap();

        let mut confirm = PromptConfirm { assume_yes: true };
        let result = run(&dispatcher(), "selection", &input, "3", Some(output.clone()), &mut confirm, true)
            .unwrap();
        assert!(result.is_some());
        assert_ne!(std::fs::read(&output).unwrap(), b"old");
    }

    #[test]
    fn test_unknown_mode_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_test_pdf(dir.path(), "report.pdf", 1);
        let mut confirm = PromptConfirm { assume_yes: true };
        assert!(run(&dispatcher(), "shuffle", &input, "1", None, &mut confirm, false).is_err());
    }
}
