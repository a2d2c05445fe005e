//! Globally unique tool identifiers.

use serde::{Deserialize, Serialize};

/// The repository coordinates a tool guid is derived from.
///
/// Guids take the form `host/repos/owner/repository/tool_id/tool_version` and
/// must be reproduced exactly so tools match across instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidContext {
    pub host: String,
    pub owner: String,
    pub repository: String,
}

impl GuidContext {
    pub fn new(
        host: impl Into<String>,
        owner: impl Into<String>,
        repository: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            owner: owner.into(),
            repository: repository.into(),
        }
    }

    pub fn tool_guid(&self, tool_id: &str, tool_version: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}/{}",
            self.host, self.owner, self.repository, tool_id, tool_version
        )
    }
}
