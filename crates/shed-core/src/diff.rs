//! Decides how freshly extracted metadata is persisted.

use std::collections::HashSet;

use serde::Serialize;
use shed_meta::MetadataDocument;
use tracing::debug;

use crate::MetadataRecord;

/// How a document reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStrategy {
    /// A new installable version: create a record
    Create,
    /// Refinement of the current version: rewrite the latest record
    UpdateLatest,
    /// Reset of a historical revision: rewrite that revision's record
    OverwriteRevision,
}

impl std::fmt::Display for RecordStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::UpdateLatest => "update latest",
            Self::OverwriteRevision => "overwrite revision",
        })
    }
}

/// Pick the strategy for `document` extracted from the tip.
pub fn tip_strategy(latest: Option<&MetadataRecord>, document: &MetadataDocument) -> RecordStrategy {
    let Some(latest) = latest else {
        return RecordStrategy::Create;
    };
    if new_tool_version_required(&latest.metadata, document)
        || new_workflow_version_required(Some(latest), document)
    {
        RecordStrategy::Create
    } else {
        RecordStrategy::UpdateLatest
    }
}

/// Whether the tools in `document` amount to a new installable version
/// relative to `saved`.
///
/// A changed version of a tool present in both, or a tool id the saved
/// document never had, needs a new record. A saved document without tools
/// is simply extended.
pub fn new_tool_version_required(saved: &MetadataDocument, document: &MetadataDocument) -> bool {
    if !document.has_tools() || !saved.has_tools() {
        return false;
    }

    for tool in document.tools() {
        let mut saved_versions = saved.tool_versions(&tool.id).peekable();
        if saved_versions.peek().is_some() && !saved_versions.any(|v| v == tool.version) {
            debug!(tool = %tool.id, version = %tool.version, "Tool version changed");
            return true;
        }
    }

    let saved_ids: HashSet<&str> = saved.tools().iter().map(|t| t.id.as_str()).collect();
    if let Some(tool) = document
        .tools()
        .iter()
        .find(|tool| !saved_ids.contains(tool.id.as_str()))
    {
        debug!(tool = %tool.id, "Tool id not in latest record");
        return true;
    }
    false
}

/// Workflows carry no version of their own, so they only force a record
/// when the repository has none.
pub fn new_workflow_version_required(
    latest: Option<&MetadataRecord>,
    document: &MetadataDocument,
) -> bool {
    document.has_workflows() && latest.is_none()
}
