//! revisions command

use std::collections::HashMap;
use std::process::ExitCode;

use colored::Colorize;
use serde::Serialize;
use shed_vcs::{Changeset, RevisionSource};

use crate::cli::RepoTarget;
use crate::context::Context;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct RevisionEntry {
    #[serde(flatten)]
    changeset: Changeset,
    label: String,
    is_tip: bool,
    /// A metadata record exists, so the revision can be installed
    downloadable: bool,
    malicious: bool,
}

/// Run the revisions command
pub fn run_revisions(context: &Context, target: &RepoTarget, json: bool) -> Result<ExitCode> {
    let (repository, source) = context.open(target)?;
    let records: HashMap<String, bool> = context
        .extractor
        .downloadable_revisions(&repository)?
        .into_iter()
        .map(|record| (record.changeset_revision, record.malicious))
        .collect();

    let changesets = source.changesets()?;
    let tip_revision = changesets.last().map(|c| c.revision.clone());
    let entries: Vec<RevisionEntry> = changesets
        .into_iter()
        .rev()
        .map(|changeset| RevisionEntry {
            label: changeset.label(),
            is_tip: tip_revision.as_deref() == Some(changeset.revision.as_str()),
            downloadable: records.contains_key(&changeset.revision),
            malicious: records.get(&changeset.revision).copied().unwrap_or(false),
            changeset,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Repository".bold(), repository.id.cyan());
    if entries.is_empty() {
        println!("  {}", "No changesets".dimmed());
    }
    for entry in &entries {
        let mut flags = Vec::new();
        if entry.is_tip {
            flags.push("tip".green().to_string());
        }
        if entry.downloadable {
            flags.push("installable".cyan().to_string());
        }
        if entry.malicious {
            flags.push("malicious".red().to_string());
        }
        println!(
            "  {} {} {} {}",
            entry.label.bold(),
            entry.changeset.author.dimmed(),
            entry.changeset.message,
            flags.join(" ")
        );
    }
    Ok(ExitCode::SUCCESS)
}
