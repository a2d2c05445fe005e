//! encode and decode commands

use std::process::ExitCode;

use shed_core::Decoded;

use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the encode command
pub fn run_encode(context: &Context, value: &str, json: bool) -> Result<ExitCode> {
    let codec = context.config.codec()?;
    let encoded = if json {
        let document: serde_json::Value = serde_json::from_str(value)
            .map_err(|e| CliError::user(format!("Value is not valid JSON: {e}")))?;
        codec.encode_json(&document)
    } else {
        codec.encode_text(value)
    };
    println!("{encoded}");
    Ok(ExitCode::SUCCESS)
}

/// Run the decode command
pub fn run_decode(context: &Context, value: &str) -> Result<ExitCode> {
    let codec = context.config.codec()?;
    let decoded = codec
        .decode(value)
        .map_err(shed_core::Error::from)?;
    match decoded {
        Decoded::Json(document) => println!("{}", serde_json::to_string_pretty(&document)?),
        Decoded::Text(text) => println!("{text}"),
    }
    Ok(ExitCode::SUCCESS)
}
