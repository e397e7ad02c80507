use crate::mode::{Mode, ModeRegistry, OutputKind};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ModeDescription {
    pub name: &'static str,
    pub label: &'static str,
    pub input_label: &'static str,
    pub placeholder: &'static str,
    pub help: &'static str,
    pub output_suffix: &'static str,
    pub output_kind: OutputKind,
}

impl From<Mode> for ModeDescription {
    fn from(mode: Mode) -> Self {
        ModeDescription {
            name: mode.name(),
            label: mode.label(),
            input_label: mode.input_label(),
            placeholder: mode.placeholder(),
            help: mode.help(),
            output_suffix: mode.output_suffix(),
            output_kind: mode.output_kind(),
        }
    }
}

pub fn describe(registry: &ModeRegistry) -> Vec<ModeDescription> {
    registry.modes().iter().copied().map(ModeDescription::from).collect()
}

pub fn run(registry: &ModeRegistry, json: bool) -> Result<()> {
    let modes = describe(registry);

    if json {
        println!("{}", serde_json::to_string_pretty(&modes)?);
        return Ok(());
    }

    for mode in modes {
        println!("{} ({})", mode.name, mode.label);
        println!("  {}: {}", mode.input_label, mode.placeholder);
        println!("  {}", mode.help);
    }

    Ok(())
}
