//! Prepare command handler (dry run)

use std::path::Path;

use anyhow::{Context, Result};

use chatlens::analyzer::{PreparedInput, Route};
use chatlens::AnalyzerService;

use super::{load_config, read_input};

/// Route and prepare a transcript without calling any backend.
#[cfg(not(tarpaulin_include))]
pub fn handle(
    config_path: Option<&Path>,
    kind: &str,
    file: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let transcript = read_input(file)?;

    let service = AnalyzerService::from_config_with_env(&config, |_| None);
    let (route, input) = service.plan(kind, &transcript)?;

    println!("{}", describe(&route, &input, transcript.len()));

    if let Some(path) = output {
        std::fs::write(path, prepared_text(&input))
            .with_context(|| format!("Failed to write prepared text: {}", path.display()))?;
        println!("Prepared text written to: {}", path.display());
    }
    Ok(())
}

fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Text that would be sent, halves separated by a rule.
pub fn prepared_text(input: &PreparedInput) -> String {
    match input {
        PreparedInput::Whole { text, .. } => text.clone(),
        PreparedInput::Split {
            first_half,
            second_half,
        } => format!("{}\n\n----- second half -----\n\n{}", first_half, second_half),
    }
}

/// Human-readable summary of a routing and preparation decision.
pub fn describe(route: &Route, input: &PreparedInput, raw_bytes: usize) -> String {
    let mut lines = vec![
        format!("Kind:        {} ({})", route.kind, route.kind.alias()),
        format!("Backend:     {}", route.role),
        format!("Max tokens:  {}", route.max_output_tokens),
        format!("Input:       {}", format_size(raw_bytes as u64)),
    ];
    match input {
        PreparedInput::Whole { text, truncated } => {
            lines.push(format!(
                "Prepared:    whole, {} chars{}",
                text.chars().count(),
                if *truncated { " (truncated)" } else { "" }
            ));
        }
        PreparedInput::Split {
            first_half,
            second_half,
        } => {
            lines.push(format!(
                "Prepared:    split, first half {} chars, second half {} chars",
                first_half.chars().count(),
                second_half.chars().count()
            ));
        }
    }
    lines.join("\n")
}
