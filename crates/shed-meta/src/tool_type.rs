//! Static registry of tool implementation types.
//!
//! A tool config may name its implementation either through a `<type
//! class="..." module="..."/>` override or a `tool_type` attribute. Both are
//! resolved against this fixed table; anything else is a parse error.

use std::collections::HashMap;

use crate::{Error, Result};

/// Module that hosts every built-in tool class.
pub const BUILTIN_MODULE: &str = "galaxy.tools";

/// Known tool implementation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolType {
    #[default]
    Generic,
    DataSource,
    DataDestination,
    SetMetadata,
    ExportHistory,
    ImportHistory,
}

impl ToolType {
    pub const ALL: [ToolType; 6] = [
        Self::Generic,
        Self::DataSource,
        Self::DataDestination,
        Self::SetMetadata,
        Self::ExportHistory,
        Self::ImportHistory,
    ];

    /// Value of the `tool_type` attribute selecting this type.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Generic => "default",
            Self::DataSource => "data_source",
            Self::DataDestination => "data_destination",
            Self::SetMetadata => "set_metadata",
            Self::ExportHistory => "export_history",
            Self::ImportHistory => "import_history",
        }
    }

    /// Class name used by a `<type class="..."/>` override.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Generic => "Tool",
            Self::DataSource => "DataSourceTool",
            Self::DataDestination => "DataDestinationTool",
            Self::SetMetadata => "SetMetadataTool",
            Self::ExportHistory => "ExportHistoryTool",
            Self::ImportHistory => "ImportHistoryTool",
        }
    }

    /// Data source tools post their inputs to a remote `action` URL.
    pub fn requires_inputs_action(&self) -> bool {
        matches!(self, Self::DataSource)
    }
}

impl std::fmt::Display for ToolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Lookup table from tags and `(module, class)` pairs to tool types.
#[derive(Debug, Clone)]
pub struct ToolTypeRegistry {
    by_tag: HashMap<&'static str, ToolType>,
    by_class: HashMap<(&'static str, &'static str), ToolType>,
}

impl ToolTypeRegistry {
    pub fn with_builtins() -> Self {
        let by_tag = ToolType::ALL.iter().map(|t| (t.tag(), *t)).collect();
        let by_class = ToolType::ALL
            .iter()
            .map(|t| ((BUILTIN_MODULE, t.class_name()), *t))
            .collect();
        Self { by_tag, by_class }
    }

    pub fn resolve_tag(&self, tag: &str) -> Result<ToolType> {
        self.by_tag
            .get(tag)
            .copied()
            .ok_or_else(|| Error::UnknownToolType {
                name: tag.to_string(),
            })
    }

    /// Resolve a class override; `module` defaults to the built-in module.
    pub fn resolve_class(&self, module: Option<&str>, class: &str) -> Result<ToolType> {
        let module = module.unwrap_or(BUILTIN_MODULE);
        self.by_class
            .iter()
            .find(|((m, c), _)| *m == module && *c == class)
            .map(|(_, tool_type)| *tool_type)
            .ok_or_else(|| Error::UnknownToolType {
                name: format!("{module}.{class}"),
            })
    }
}

impl Default for ToolTypeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_knows_builtin_tags() {
        let registry = ToolTypeRegistry::with_builtins();
        assert_eq!(registry.resolve_tag("data_source").unwrap(), ToolType::DataSource);
        assert_eq!(registry.resolve_tag("default").unwrap(), ToolType::Generic);
        for tool_type in ToolType::ALL {
            assert_eq!(registry.resolve_tag(tool_type.tag()).unwrap(), tool_type);
        }
    }

    #[test]
    fn test_registry_rejects_unknown_tag() {
        let registry = ToolTypeRegistry::with_builtins();
        let err = registry.resolve_tag("interactive").unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool type 'interactive'");
    }

    #[test]
    fn test_class_override_resolution() {
        let registry = ToolTypeRegistry::with_builtins();
        assert_eq!(
            registry.resolve_class(None, "SetMetadataTool").unwrap(),
            ToolType::SetMetadata
        );
        assert_eq!(
            registry
                .resolve_class(Some("galaxy.tools"), "DataSourceTool")
                .unwrap(),
            ToolType::DataSource
        );
    }

    #[test]
    fn test_class_override_in_foreign_module_is_rejected() {
        let registry = ToolTypeRegistry::with_builtins();
        let err = registry
            .resolve_class(Some("evil.module"), "Tool")
            .unwrap_err();
        assert!(matches!(err, Error::UnknownToolType { ref name } if name == "evil.module.Tool"));
    }
}
