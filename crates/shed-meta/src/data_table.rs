//! Tool data table registration parsing (`tool_data_table_conf.xml.sample`).

use crate::xml::Element;
use crate::{Error, Result};

/// A shared data table declared by a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDataTable {
    pub name: String,
    pub columns: Vec<String>,
    /// Location files backing the table
    pub files: Vec<String>,
}

/// Parse a tool data table registration document.
///
/// Every table must carry a name and a non-empty column list.
pub fn parse_tool_data_table_conf(content: &str) -> Result<Vec<ToolDataTable>> {
    let root = Element::parse(content)?;
    if root.name != "tables" {
        return Err(Error::UnexpectedRoot {
            expected: "tables".into(),
            found: root.name,
        });
    }

    root.children_named("table")
        .map(|table| -> Result<ToolDataTable> {
            let name = table
                .non_empty_attr("name")
                .ok_or_else(|| Error::missing_attribute("table", "name"))?
                .to_string();
            let columns: Vec<String> = table
                .child("columns")
                .and_then(Element::text)
                .map(|text| {
                    text.split(',')
                        .map(str::trim)
                        .filter(|c| !c.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            if columns.is_empty() {
                return Err(Error::MissingElement {
                    parent: format!("table {name}"),
                    element: "columns".into(),
                });
            }
            let files = table
                .children_named("file")
                .filter_map(|file| file.non_empty_attr("path"))
                .map(str::to_string)
                .collect();
            Ok(ToolDataTable {
                name,
                columns,
                files,
            })
        })
        .collect()
}
