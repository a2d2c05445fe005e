//! Definition file parsing for the tool shed.
//!
//! Turns tool configs, datatype registration documents and exported
//! workflows into typed descriptors, and assembles them into the metadata
//! document that is persisted per repository revision.

pub mod data_table;
pub mod datatypes;
pub mod document;
pub mod error;
pub mod guid;
pub mod invalid;
pub mod tool;
pub mod tool_type;
pub mod workflow;
pub mod xml;

pub use data_table::{ToolDataTable, parse_tool_data_table_conf};
pub use datatypes::{
    DatatypeDescriptor, DatatypesConfig, parse_datatypes_config, parse_datatypes_str,
};
pub use document::{MetadataDocument, MetadataDocumentBuilder, ToolMetadata};
pub use error::{Error, Result};
pub use guid::GuidContext;
pub use invalid::InvalidFile;
pub use tool::{
    DataTableRef, DynamicOptions, FABFILE_REQUIREMENT, InputParam, RequirementDescriptor,
    TestCaseDescriptor, ToolDescriptor, ToolParser,
};
pub use tool_type::{ToolType, ToolTypeRegistry};
pub use workflow::{WORKFLOW_MARKER, WorkflowDescriptor, parse_workflow};
