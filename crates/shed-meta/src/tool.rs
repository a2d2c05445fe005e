//! Tool config parsing.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::xml::Element;
use crate::{Error, GuidContext, Result, ToolType, ToolTypeRegistry};

/// Version assumed when a tool config does not declare one.
pub const DEFAULT_TOOL_VERSION: &str = "1.0.0";

/// Requirement type reserved for fabrication scripts.
pub const FABFILE_REQUIREMENT: &str = "fabfile";

/// A software requirement declared by a tool.
///
/// Serialized flat as `{name, type, version}` or
/// `{name, type: "fabfile", fabfile, method}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RequirementFields", try_from = "RequirementFields")]
pub enum RequirementDescriptor {
    /// A requirement resolved by the installing instance; `kind` is the
    /// declared type (`package`, `binary`, `set_environment`, ...)
    Versioned {
        name: String,
        kind: String,
        version: Option<String>,
    },
    /// A fabrication script that builds the requirement
    Fabfile {
        name: String,
        fabfile: String,
        method: Option<String>,
    },
}

impl RequirementDescriptor {
    pub fn name(&self) -> &str {
        match self {
            Self::Versioned { name, .. } | Self::Fabfile { name, .. } => name,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Self::Versioned { kind, .. } => kind,
            Self::Fabfile { .. } => FABFILE_REQUIREMENT,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RequirementFields {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fabfile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    method: Option<String>,
}

impl From<RequirementDescriptor> for RequirementFields {
    fn from(requirement: RequirementDescriptor) -> Self {
        match requirement {
            RequirementDescriptor::Versioned {
                name,
                kind,
                version,
            } => Self {
                name,
                kind,
                version,
                fabfile: None,
                method: None,
            },
            RequirementDescriptor::Fabfile {
                name,
                fabfile,
                method,
            } => Self {
                name,
                kind: FABFILE_REQUIREMENT.to_string(),
                version: None,
                fabfile: Some(fabfile),
                method,
            },
        }
    }
}

impl TryFrom<RequirementFields> for RequirementDescriptor {
    type Error = String;

    fn try_from(fields: RequirementFields) -> std::result::Result<Self, Self::Error> {
        if fields.kind == FABFILE_REQUIREMENT {
            if fields.version.is_some() {
                return Err(format!("fabfile requirement '{}' has a version", fields.name));
            }
            let fabfile = fields
                .fabfile
                .ok_or_else(|| format!("fabfile requirement '{}' has no fabfile", fields.name))?;
            return Ok(Self::Fabfile {
                name: fields.name,
                fabfile,
                method: fields.method,
            });
        }
        if fields.fabfile.is_some() || fields.method.is_some() {
            return Err(format!(
                "{} requirement '{}' cannot name a fabfile or method",
                fields.kind, fields.name
            ));
        }
        Ok(Self::Versioned {
            name: fields.name,
            kind: fields.kind,
            version: fields.version,
        })
    }
}

/// A functional test declared by a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseDescriptor {
    pub name: String,
    /// Input values that name test-data files
    pub required_files: Vec<String>,
    /// `(parameter name, value)` pairs
    pub inputs: Vec<(String, String)>,
    /// `(output name, expected file)` pairs
    pub outputs: Vec<(String, String)>,
}

/// A shared tool data table a parameter draws its options from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTableRef {
    pub name: String,
    /// Location file of the table that has not been provided yet
    pub missing_index_file: Option<String>,
}

/// Where a data-driven select parameter computes its choices from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DynamicOptions {
    /// Location file that has been resolved
    pub index_file: Option<String>,
    /// Location file that is declared but not yet provided
    pub missing_index_file: Option<String>,
    pub data_table: Option<DataTableRef>,
    /// Name of a declared data table that is not yet registered
    pub missing_data_table_name: Option<String>,
}

impl DynamicOptions {
    /// Whether the options depend on a shared tool data table.
    pub fn needs_data_table(&self) -> bool {
        self.data_table.is_some() || self.missing_data_table_name.is_some()
    }

    /// The location file the options depend on, resolved or not.
    pub fn required_index_file(&self) -> Option<&str> {
        self.index_file
            .as_deref()
            .or(self.missing_index_file.as_deref())
    }
}

/// An input parameter of a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputParam {
    pub name: String,
    pub param_type: String,
    /// Choices are computed at runtime rather than listed statically
    pub is_dynamic: bool,
    pub options: Option<DynamicOptions>,
}

impl InputParam {
    fn from_element(element: &Element) -> Result<Self> {
        let name = element
            .non_empty_attr("name")
            .ok_or_else(|| Error::missing_attribute("param", "name"))?
            .to_string();
        let param_type = element.attr("type").unwrap_or("text").to_string();

        let options = element.child("options").and_then(|options| {
            let index_file = options.non_empty_attr("from_file");
            let table = options.non_empty_attr("from_data_table");
            if index_file.is_none() && table.is_none() {
                return None;
            }
            Some(DynamicOptions {
                index_file: None,
                missing_index_file: index_file.map(str::to_string),
                data_table: table.map(|name| DataTableRef {
                    name: name.to_string(),
                    missing_index_file: None,
                }),
                missing_data_table_name: table.map(str::to_string),
            })
        });
        let is_dynamic = param_type == "select"
            && (element.child("options").is_some() || element.attr("dynamic_options").is_some());

        Ok(Self {
            name,
            param_type,
            is_dynamic,
            options: if is_dynamic { options } else { None },
        })
    }
}

/// Everything extracted from one tool config.
///
/// Rebuilt on every extraction; only its [`ToolMetadata`](crate::ToolMetadata)
/// form is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub id: String,
    pub guid: String,
    pub name: String,
    pub version: String,
    pub description: String,
    pub version_string_cmd: Option<String>,
    /// Repository-relative path of the config file
    pub tool_config: String,
    pub tool_type: ToolType,
    pub requirements: Vec<RequirementDescriptor>,
    pub tests: Vec<TestCaseDescriptor>,
    pub inputs: Vec<InputParam>,
    /// Code files the config loads, relative to the config's directory
    pub code_files: Vec<String>,
}

impl ToolDescriptor {
    /// Input parameters whose choices are computed from external data.
    pub fn dynamic_inputs_mut(&mut self) -> impl Iterator<Item = &mut InputParam> {
        self.inputs.iter_mut().filter(|param| param.is_dynamic)
    }
}

/// Parses tool configs for one repository.
#[derive(Debug, Clone)]
pub struct ToolParser {
    registry: ToolTypeRegistry,
    guid: GuidContext,
}

impl ToolParser {
    pub fn new(guid: GuidContext) -> Self {
        Self {
            registry: ToolTypeRegistry::with_builtins(),
            guid,
        }
    }

    pub fn with_registry(mut self, registry: ToolTypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Parse the file at `path`, recorded as `tool_config`.
    ///
    /// Returns `Ok(None)` when the document is XML but not a tool config.
    pub fn parse_file(&self, path: &Path, tool_config: &str) -> Result<Option<ToolDescriptor>> {
        let root = Element::parse_file(path)?;
        self.parse_element(&root, tool_config)
    }

    /// Parse an in-memory document recorded as `tool_config`.
    pub fn parse_str(&self, content: &str, tool_config: &str) -> Result<Option<ToolDescriptor>> {
        let root = Element::parse(content)?;
        self.parse_element(&root, tool_config)
    }

    fn parse_element(&self, root: &Element, tool_config: &str) -> Result<Option<ToolDescriptor>> {
        if root.name != "tool" {
            debug!(file = %tool_config, root = %root.name, "Not a tool config");
            return Ok(None);
        }

        let tool_type = self.resolve_tool_type(root)?;
        let id = root
            .non_empty_attr("id")
            .ok_or_else(|| Error::missing_attribute("tool", "id"))?
            .to_string();
        let name = root
            .non_empty_attr("name")
            .ok_or_else(|| Error::missing_attribute("tool", "name"))?
            .to_string();
        let version = root
            .non_empty_attr("version")
            .unwrap_or(DEFAULT_TOOL_VERSION)
            .to_string();
        let description = root
            .child("description")
            .and_then(Element::text)
            .unwrap_or_default()
            .to_string();
        let version_string_cmd = root
            .child("version_command")
            .and_then(Element::text)
            .map(str::to_string);

        let inputs = parse_inputs(root, tool_type)?;
        let requirements = parse_requirements(root)?;
        let tests = parse_tests(root, &inputs)?;
        let code_files = root
            .children_named("code")
            .filter_map(|code| code.non_empty_attr("file"))
            .map(str::to_string)
            .collect();

        debug!(file = %tool_config, tool = %id, version = %version, tool_type = %tool_type, "Parsed tool config");
        Ok(Some(ToolDescriptor {
            guid: self.guid.tool_guid(&id, &version),
            id,
            name,
            version,
            description,
            version_string_cmd,
            tool_config: tool_config.to_string(),
            tool_type,
            requirements,
            tests,
            inputs,
            code_files,
        }))
    }

    /// An explicit class override wins over a `tool_type` tag.
    fn resolve_tool_type(&self, root: &Element) -> Result<ToolType> {
        if let Some(type_elem) = root.child("type") {
            let class = type_elem
                .non_empty_attr("class")
                .ok_or_else(|| Error::missing_attribute("type", "class"))?;
            return self
                .registry
                .resolve_class(type_elem.non_empty_attr("module"), class);
        }
        match root.non_empty_attr("tool_type") {
            Some(tag) => self.registry.resolve_tag(tag),
            None => Ok(ToolType::Generic),
        }
    }
}

fn parse_inputs(root: &Element, tool_type: ToolType) -> Result<Vec<InputParam>> {
    let Some(inputs) = root.child("inputs") else {
        return Ok(Vec::new());
    };
    if tool_type.requires_inputs_action() && inputs.non_empty_attr("action").is_none() {
        return Err(Error::missing_attribute("inputs", "action"));
    }
    inputs
        .descendants_named("param")
        .into_iter()
        .map(InputParam::from_element)
        .collect()
}

fn parse_requirements(root: &Element) -> Result<Vec<RequirementDescriptor>> {
    let Some(requirements) = root.child("requirements") else {
        return Ok(Vec::new());
    };
    requirements
        .children_named("requirement")
        .map(|elem| -> Result<RequirementDescriptor> {
            let name = elem
                .text()
                .ok_or_else(|| Error::MissingElement {
                    parent: "requirement".into(),
                    element: "name".into(),
                })?
                .to_string();
            match elem.non_empty_attr("type").unwrap_or("package") {
                FABFILE_REQUIREMENT => Ok(RequirementDescriptor::Fabfile {
                    name,
                    fabfile: elem
                        .non_empty_attr("fabfile")
                        .ok_or_else(|| Error::missing_attribute("requirement", "fabfile"))?
                        .to_string(),
                    method: elem.non_empty_attr("method").map(str::to_string),
                }),
                kind => Ok(RequirementDescriptor::Versioned {
                    name,
                    kind: kind.to_string(),
                    version: elem.non_empty_attr("version").map(str::to_string),
                }),
            }
        })
        .collect()
}

fn parse_tests(root: &Element, inputs: &[InputParam]) -> Result<Vec<TestCaseDescriptor>> {
    let Some(tests) = root.child("tests") else {
        return Ok(Vec::new());
    };
    let input_types: HashMap<&str, &str> = inputs
        .iter()
        .map(|param| (param.name.as_str(), param.param_type.as_str()))
        .collect();

    tests
        .children_named("test")
        .enumerate()
        .map(|(index, test)| -> Result<TestCaseDescriptor> {
            let name = test
                .non_empty_attr("name")
                .map(str::to_string)
                .unwrap_or_else(|| format!("Test-{}", index + 1));

            let mut required_files = Vec::new();
            let mut test_inputs = Vec::new();
            for param in test.children_named("param") {
                let param_name = param
                    .non_empty_attr("name")
                    .ok_or_else(|| Error::missing_attribute("param", "name"))?;
                let value = param.attr("value").unwrap_or_default().to_string();
                if input_types.get(param_name) == Some(&"data") && !value.is_empty() {
                    required_files.push(value.clone());
                }
                test_inputs.push((param_name.to_string(), value));
            }

            let outputs = test
                .children_named("output")
                .map(|output| -> Result<(String, String)> {
                    let output_name = output
                        .non_empty_attr("name")
                        .ok_or_else(|| Error::missing_attribute("output", "name"))?;
                    Ok((
                        output_name.to_string(),
                        output.attr("file").unwrap_or_default().to_string(),
                    ))
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(TestCaseDescriptor {
                name,
                required_files,
                inputs: test_inputs,
                outputs,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ToolParser {
        ToolParser::new(GuidContext::new("shed.example.org", "alice", "filtering"))
    }

    #[test]
    fn non_tool_documents_are_not_errors() {
        let parsed = parser()
            .parse_str("<macros><token name=\"@X@\"/></macros>", "macros.xml")
            .unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn version_defaults_when_absent() {
        let tool = parser()
            .parse_str(r#"<tool id="t" name="T"/>"#, "t.xml")
            .unwrap()
            .unwrap();
        assert_eq!(tool.version, DEFAULT_TOOL_VERSION);
        assert_eq!(tool.guid, "shed.example.org/repos/alice/filtering/t/1.0.0");
        assert_eq!(tool.description, "");
        assert!(tool.version_string_cmd.is_none());
    }

    #[test]
    fn missing_id_is_reported() {
        let err = parser()
            .parse_str(r#"<tool name="T"/>"#, "t.xml")
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing tool 'id'");
    }

    #[test]
    fn static_select_is_not_dynamic() {
        let tool = parser()
            .parse_str(
                r#"<tool id="t" name="T"><inputs>
                    <param name="mode" type="select"><option value="a">A</option></param>
                </inputs></tool>"#,
                "t.xml",
            )
            .unwrap()
            .unwrap();
        assert!(!tool.inputs[0].is_dynamic);
        assert!(tool.inputs[0].options.is_none());
    }

    #[test]
    fn code_dynamic_options_have_no_external_dependency() {
        let tool = parser()
            .parse_str(
                r#"<tool id="t" name="T"><inputs>
                    <param name="cols" type="select" dynamic_options="get_columns(input)"/>
                </inputs></tool>"#,
                "t.xml",
            )
            .unwrap()
            .unwrap();
        assert!(tool.inputs[0].is_dynamic);
        assert!(tool.inputs[0].options.is_none());
    }

    #[rstest::rstest]
    #[case("binary", "samtools")]
    #[case("python-module", "numpy")]
    #[case("set_environment", "PATH")]
    fn any_requirement_type_is_versioned(#[case] kind: &str, #[case] name: &str) {
        let tool = parser()
            .parse_str(
                &format!(
                    r#"<tool id="t" name="T"><requirements>
                    <requirement type="{kind}" version="1.2">{name}</requirement>
                </requirements></tool>"#
                ),
                "t.xml",
            )
            .unwrap()
            .unwrap();
        assert_eq!(
            tool.requirements,
            vec![RequirementDescriptor::Versioned {
                name: name.into(),
                kind: kind.into(),
                version: Some("1.2".into()),
            }]
        );
        let json = serde_json::to_value(&tool.requirements[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": name, "type": kind, "version": "1.2"})
        );
    }

    #[test]
    fn requirement_fields_are_exclusive_by_kind() {
        let mixed = serde_json::json!({"name": "bwa", "type": "package", "fabfile": "fabfile.py"});
        assert!(serde_json::from_value::<RequirementDescriptor>(mixed).is_err());

        let fabfile = serde_json::json!({"name": "bwa", "type": "fabfile", "fabfile": "fabfile.py"});
        assert_eq!(
            serde_json::from_value::<RequirementDescriptor>(fabfile).unwrap(),
            RequirementDescriptor::Fabfile {
                name: "bwa".into(),
                fabfile: "fabfile.py".into(),
                method: None,
            }
        );
    }
}
