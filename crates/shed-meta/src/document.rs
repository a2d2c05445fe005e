//! The persisted metadata document and its builder.

use serde::{Deserialize, Serialize};

use crate::{
    DatatypeDescriptor, DatatypesConfig, RequirementDescriptor, TestCaseDescriptor,
    ToolDescriptor, WorkflowDescriptor,
};

/// Persisted form of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolMetadata {
    pub id: String,
    pub guid: String,
    pub name: String,
    pub version: String,
    pub description: String,
    pub version_string_cmd: Option<String>,
    pub tool_config: String,
    #[serde(default)]
    pub requirements: Vec<RequirementDescriptor>,
    #[serde(default)]
    pub tests: Vec<TestCaseDescriptor>,
}

impl From<&ToolDescriptor> for ToolMetadata {
    fn from(tool: &ToolDescriptor) -> Self {
        Self {
            id: tool.id.clone(),
            guid: tool.guid.clone(),
            name: tool.name.clone(),
            version: tool.version.clone(),
            description: tool.description.clone(),
            version_string_cmd: tool.version_string_cmd.clone(),
            tool_config: tool.tool_config.clone(),
            requirements: tool.requirements.clone(),
            tests: tool.tests.clone(),
        }
    }
}

/// Metadata extracted from one repository revision.
///
/// Every key is optional and omitted from the serialized form when the
/// revision provides nothing for it. Built once through
/// [`MetadataDocumentBuilder`]; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetadataDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolMetadata>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    workflows: Option<Vec<WorkflowDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    datatype_files: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    datatypes: Option<Vec<DatatypeDescriptor>>,
}

impl MetadataDocument {
    pub fn builder() -> MetadataDocumentBuilder {
        MetadataDocumentBuilder::default()
    }

    pub fn tools(&self) -> &[ToolMetadata] {
        self.tools.as_deref().unwrap_or_default()
    }

    pub fn workflows(&self) -> &[WorkflowDescriptor] {
        self.workflows.as_deref().unwrap_or_default()
    }

    pub fn datatype_files(&self) -> &[String] {
        self.datatype_files.as_deref().unwrap_or_default()
    }

    pub fn datatypes(&self) -> &[DatatypeDescriptor] {
        self.datatypes.as_deref().unwrap_or_default()
    }

    pub fn has_tools(&self) -> bool {
        self.tools.is_some()
    }

    pub fn has_workflows(&self) -> bool {
        self.workflows.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_none()
            && self.workflows.is_none()
            && self.datatype_files.is_none()
            && self.datatypes.is_none()
    }

    /// Whether the revision provides anything a consumer can install.
    pub fn is_installable(&self) -> bool {
        self.has_tools() || self.has_workflows()
    }

    /// Versions recorded for the tool `id`.
    pub fn tool_versions<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> {
        self.tools()
            .iter()
            .filter(move |tool| tool.id == id)
            .map(|tool| tool.version.as_str())
    }

    /// Copy of this document with sequences in a canonical order, for
    /// comparing documents produced by different walks.
    pub fn normalized(&self) -> Self {
        let mut normalized = self.clone();
        if let Some(tools) = normalized.tools.as_mut() {
            tools.sort_by(|a, b| a.guid.cmp(&b.guid).then(a.tool_config.cmp(&b.tool_config)));
        }
        if let Some(workflows) = normalized.workflows.as_mut() {
            workflows.sort_by_key(|workflow| workflow.0.to_string());
        }
        if let Some(files) = normalized.datatype_files.as_mut() {
            files.sort();
        }
        if let Some(datatypes) = normalized.datatypes.as_mut() {
            datatypes.sort_by(|a, b| a.extension.cmp(&b.extension));
        }
        normalized
    }
}

/// Accumulates parser output for one extraction.
#[derive(Debug, Default)]
pub struct MetadataDocumentBuilder {
    tools: Vec<ToolMetadata>,
    workflows: Vec<WorkflowDescriptor>,
    datatype_files: Vec<String>,
    datatypes: Vec<DatatypeDescriptor>,
}

impl MetadataDocumentBuilder {
    pub fn add_tool(&mut self, tool: &ToolDescriptor) -> &mut Self {
        self.tools.push(ToolMetadata::from(tool));
        self
    }

    pub fn add_workflow(&mut self, workflow: WorkflowDescriptor) -> &mut Self {
        self.workflows.push(workflow);
        self
    }

    pub fn add_datatypes(&mut self, config: DatatypesConfig) -> &mut Self {
        self.datatype_files
            .extend(config.datatype_files.unwrap_or_default());
        self.datatypes.extend(config.datatypes.unwrap_or_default());
        self
    }

    pub fn build(self) -> MetadataDocument {
        fn section<T>(items: Vec<T>) -> Option<Vec<T>> {
            (!items.is_empty()).then_some(items)
        }
        MetadataDocument {
            tools: section(self.tools),
            workflows: section(self.workflows),
            datatype_files: section(self.datatype_files),
            datatypes: section(self.datatypes),
        }
    }
}
