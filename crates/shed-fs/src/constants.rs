//! Reserved file names recognized inside tool shed repositories.

use std::path::Path;

/// Suffix carried by repository-provided stand-ins for runtime data files.
pub const SAMPLE_SUFFIX: &str = ".sample";

/// File names with a fixed meaning during metadata extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedFile {
    /// Datatype registration document
    DatatypesConf,
    /// Sample of the shared tool data table configuration
    ToolDataTableSample,
}

impl ReservedFile {
    /// Get the string representation of the file name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DatatypesConf => "datatypes_conf.xml",
            Self::ToolDataTableSample => "tool_data_table_conf.xml.sample",
        }
    }

    /// Whether the final component of `path` is this reserved file.
    pub fn matches(&self, path: &str) -> bool {
        file_name_of(path) == self.as_str()
    }
}

impl AsRef<Path> for ReservedFile {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for ReservedFile {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ReservedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether `path` names a sample file.
pub fn is_sample_file(path: &str) -> bool {
    file_name_of(path).ends_with(SAMPLE_SUFFIX)
}

/// Final component of a forward- or back-slash separated path.
pub fn file_name_of(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_file_matches_nested_paths() {
        assert!(ReservedFile::DatatypesConf.matches("datatypes_conf.xml"));
        assert!(ReservedFile::DatatypesConf.matches("lib/datatypes_conf.xml"));
        assert!(!ReservedFile::DatatypesConf.matches("my_datatypes_conf.xml"));
    }

    #[test]
    fn sample_detection_uses_file_name() {
        assert!(is_sample_file("tool-data/mydata.loc.sample"));
        assert!(!is_sample_file("samples/mydata.loc"));
    }

    #[test]
    fn file_name_of_handles_both_separators() {
        assert_eq!(file_name_of("a/b/c.xml"), "c.xml");
        assert_eq!(file_name_of("a\\b\\c.xml"), "c.xml");
        assert_eq!(file_name_of("c.xml"), "c.xml");
    }
}
