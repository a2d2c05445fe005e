//! Exported workflow recognition.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Field every exported workflow carries.
pub const WORKFLOW_MARKER: &str = "a_galaxy_workflow";

/// Marker value that accepts a document as a workflow export.
const MARKER_ACCEPTED: &str = "true";

/// An exported workflow, kept as the document the owner uploaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowDescriptor(pub Value);

impl WorkflowDescriptor {
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }
}

/// Parse `content` as an exported workflow.
///
/// Returns `Ok(None)` when the marker is present with any value other than
/// `"true"`; such files are deliberately disabled exports. A document
/// without the marker is rejected.
pub fn parse_workflow(content: &[u8]) -> Result<Option<WorkflowDescriptor>> {
    let document: Value = serde_json::from_slice(content)?;
    let Some(object) = document.as_object() else {
        return Err(Error::NotAWorkflow {
            reason: "document is not a JSON object".into(),
        });
    };
    let marker = object.get(WORKFLOW_MARKER).ok_or_else(|| Error::NotAWorkflow {
        reason: format!("missing '{WORKFLOW_MARKER}' field"),
    })?;
    let accepted = match marker {
        Value::String(s) => s == MARKER_ACCEPTED,
        _ => false,
    };
    Ok(accepted.then_some(WorkflowDescriptor(document)))
}
