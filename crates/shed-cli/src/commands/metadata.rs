//! set-metadata and show commands

use std::process::ExitCode;

use colored::Colorize;
use shed_core::{ExtractionResult, MetadataRecord, Outcome};
use shed_vcs::RevisionSource;

use crate::cli::RepoTarget;
use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the set-metadata command
pub fn run_set_metadata(
    context: &Context,
    target: &RepoTarget,
    revision: Option<&str>,
    json: bool,
) -> Result<ExitCode> {
    let (repository, source) = context.open(target)?;
    let revision = match revision {
        Some(revision) => revision.to_string(),
        None => {
            source
                .tip()?
                .ok_or_else(|| CliError::user("Repository has no changesets"))?
                .revision
        }
    };

    let result = context
        .extractor
        .set_repository_metadata(&repository, &source, &revision)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&source.revision_label(&result.revision)?, &result);
    }

    Ok(if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_result(label: &str, result: &ExtractionResult) {
    match result.outcome {
        Outcome::Success => println!(
            "{} Metadata set for revision {}",
            "OK".green().bold(),
            label.cyan()
        ),
        Outcome::PartialSuccess => println!(
            "{} Metadata set for revision {} with problems",
            "WARN".yellow().bold(),
            label.cyan()
        ),
        Outcome::Error => println!(
            "{} No metadata set for revision {}",
            "FAIL".red().bold(),
            label.cyan()
        ),
    }
    if let Some(strategy) = result.strategy {
        println!("{}: {}", "Record".dimmed(), strategy);
    }
    if let Some(document) = &result.document {
        for tool in document.tools() {
            println!("  {} {} {}", "+".green(), tool.id.cyan(), tool.version);
        }
        for workflow in document.workflows() {
            println!(
                "  {} workflow {}",
                "+".green(),
                workflow.name().unwrap_or("(unnamed)").cyan()
            );
        }
    }
    if !result.message.is_empty() {
        println!();
        println!("{}", result.message.trim_end());
    }
}

/// Run the show command
pub fn run_show(
    context: &Context,
    target: &RepoTarget,
    revision: Option<&str>,
    json: bool,
) -> Result<ExitCode> {
    let (repository, source) = context.open(target)?;
    let store = context.extractor.store();
    let record = match revision {
        Some(revision) => store.by_revision(&repository.id, revision)?,
        None => store.latest(&repository.id)?,
    };
    let Some(record) = record else {
        let what = revision.map_or_else(|| "this repository".to_string(), |r| format!("revision {r}"));
        return Err(CliError::user(format!("No metadata has been set for {what}")));
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_record(&source.revision_label(&record.changeset_revision)?, &record);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_record(label: &str, record: &MetadataRecord) {
    println!("{} {}", "Revision".bold(), label.cyan());
    if record.malicious {
        println!("{}", "Flagged as malicious".red().bold());
    }
    println!();

    let metadata = &record.metadata;
    println!("{}:", "Tools".bold());
    if metadata.tools().is_empty() {
        println!("  {}", "None".dimmed());
    }
    for tool in metadata.tools() {
        println!("  {} {} ({})", tool.id.cyan(), tool.version, tool.name);
        println!("    {}: {}", "guid".dimmed(), tool.guid);
        println!("    {}: {}", "config".dimmed(), tool.tool_config);
    }

    if !metadata.workflows().is_empty() {
        println!();
        println!("{}:", "Workflows".bold());
        for workflow in metadata.workflows() {
            println!("  {}", workflow.name().unwrap_or("(unnamed)").cyan());
        }
    }

    if !metadata.datatypes().is_empty() {
        println!();
        println!("{}:", "Datatypes".bold());
        for datatype in metadata.datatypes() {
            println!("  {} {}", datatype.extension.cyan(), datatype.dtype.dimmed());
        }
    }
}
