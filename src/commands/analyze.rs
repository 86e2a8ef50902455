//! Analyze command handler
//!
//! Uses the AnalyzerService facade:
//! 1. Load config and resolve credentials
//! 2. Read the transcript (or a JSON request)
//! 3. Run the analysis
//! 4. Print the result or the error, plain or as a JSON envelope

use std::path::Path;

use anyhow::{Context, Result};

use chatlens::analyzer::{AnalyzeReply, AnalyzeRequest, AnalyzeResponse};
use chatlens::AnalyzerService;

use super::{exit_code, load_config, read_input};

/// Analyze a transcript and print the result.
///
/// Returns the process exit code: 0 on success, 2 for client errors and 1
/// for everything else.
#[cfg(not(tarpaulin_include))]
pub fn handle(
    config_path: Option<&Path>,
    kind: &str,
    file: Option<&Path>,
    json: bool,
    as_request: bool,
) -> Result<i32> {
    let config = load_config(config_path)?;
    let input = read_input(file)?;

    let request = if as_request {
        serde_json::from_str::<AnalyzeRequest>(&input).context("Failed to parse JSON request")?
    } else {
        AnalyzeRequest {
            kind: kind.to_string(),
            transcript: input,
            part: None,
        }
    };

    let service = AnalyzerService::from_config(&config);
    let reply = service.analyze_request(&request);
    print_reply(&reply, json)?;

    Ok(exit_code(reply.status))
}

fn print_reply(reply: &AnalyzeReply, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&reply.body)?);
        return Ok(());
    }
    match &reply.body {
        AnalyzeResponse::Success { result } => println!("{}", result),
        AnalyzeResponse::Failure { error } => eprintln!("Error: {}", error),
    }
    Ok(())
}
