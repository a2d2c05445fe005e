//! Datatype registration parsing (`datatypes_conf.xml`).

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::xml::Element;
use crate::{Error, Result};

/// One `<datatype>` registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatatypeDescriptor {
    pub extension: String,
    /// Implementing type, `module:Class`
    pub dtype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
}

/// The optional sections of a datatype registration document.
///
/// A section is `None` when the document does not declare any entries for
/// it, so the corresponding metadata key can be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DatatypesConfig {
    pub datatype_files: Option<Vec<String>>,
    pub datatypes: Option<Vec<DatatypeDescriptor>>,
}

impl DatatypesConfig {
    pub fn is_empty(&self) -> bool {
        self.datatype_files.is_none() && self.datatypes.is_none()
    }
}

/// Parse the registration document at `path`, resolving includes against
/// its directory.
///
/// Included files must live under `repository_root`.
pub fn parse_datatypes_config(path: &Path, repository_root: &Path) -> Result<DatatypesConfig> {
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let root = Element::parse_file(path)?.resolve_includes(base_dir, repository_root)?;
    parse_root(&root)
}

/// Parse an in-memory registration document without include resolution.
pub fn parse_datatypes_str(content: &str) -> Result<DatatypesConfig> {
    parse_root(&Element::parse(content)?)
}

fn parse_root(root: &Element) -> Result<DatatypesConfig> {
    if root.name != "datatypes" {
        return Err(Error::UnexpectedRoot {
            expected: "datatypes".into(),
            found: root.name.clone(),
        });
    }

    let datatype_files: Vec<String> = root
        .children_named("datatype_files")
        .flat_map(|section| section.children_named("datatype_file"))
        .filter_map(|entry| match entry.non_empty_attr("name") {
            Some(name) => Some(name.to_string()),
            None => {
                warn!("Skipping <datatype_file> without a name");
                None
            }
        })
        .collect();

    let datatypes = root
        .children_named("registration")
        .flat_map(|section| section.children_named("datatype"))
        .map(|entry| -> Result<DatatypeDescriptor> {
            Ok(DatatypeDescriptor {
                extension: entry
                    .non_empty_attr("extension")
                    .ok_or_else(|| Error::missing_attribute("datatype", "extension"))?
                    .to_string(),
                dtype: entry
                    .non_empty_attr("type")
                    .ok_or_else(|| Error::missing_attribute("datatype", "type"))?
                    .to_string(),
                mimetype: entry.non_empty_attr("mimetype").map(str::to_string),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        datatype_files = datatype_files.len(),
        datatypes = datatypes.len(),
        "Parsed datatype registrations"
    );
    Ok(DatatypesConfig {
        datatype_files: (!datatype_files.is_empty()).then_some(datatype_files),
        datatypes: (!datatypes.is_empty()).then_some(datatypes),
    })
}
