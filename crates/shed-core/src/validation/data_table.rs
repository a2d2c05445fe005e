use shed_meta::{Result, ToolDataTable, parse_tool_data_table_conf};

/// Validates a repository's tool data table sample before tools may depend
/// on it.
pub trait ToolDataTableValidator: Send + Sync {
    fn validate(&self, content: &str) -> Result<Vec<ToolDataTable>>;
}

/// Requires a well-formed `<tables>` document in which every table has a
/// name and columns.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlToolDataTableValidator;

impl ToolDataTableValidator for XmlToolDataTableValidator {
    fn validate(&self, content: &str) -> Result<Vec<ToolDataTable>> {
        parse_tool_data_table_conf(content)
    }
}
