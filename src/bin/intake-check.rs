//! Offline payload checker.
//!
//! Runs a JSON file through the same validation and sanitization the
//! gateway applies, without touching the network. Handy when support
//! needs to know why a submission keeps bouncing.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use contract_gateway::submission::sanitize::sanitize_value;
use contract_gateway::submission::validate::{validate_contract, validate_lead};

#[derive(Debug, Parser)]
#[command(name = "intake-check", version, about = "Validate an intake payload offline")]
struct Cli {
    /// Path to a JSON payload file.
    payload: PathBuf,

    /// Check against the lead schema instead of the contract schema.
    #[arg(long)]
    lead: bool,

    /// Print the sanitized payload on success.
    #[arg(long)]
    show_sanitized: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let raw = match fs::read_to_string(&cli.payload) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("error: cannot read {}: {e}", cli.payload.display());
            return ExitCode::FAILURE;
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("error: not valid JSON: {e}");
            return ExitCode::FAILURE;
        }
    };

    let errors = if cli.lead {
        validate_lead(&value).err()
    } else {
        validate_contract(&value).err()
    };

    if let Some(errors) = errors {
        eprintln!("{} violation(s):", errors.len());
        for error in errors {
            eprintln!("  {error}");
        }
        return ExitCode::FAILURE;
    }

    println!("payload is valid");
    if cli.show_sanitized {
        match serde_json::to_string_pretty(&sanitize_value(value)) {
            Ok(pretty) => println!("{pretty}"),
            Err(e) => {
                eprintln!("error: cannot render sanitized payload: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
