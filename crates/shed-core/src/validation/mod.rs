//! Checks that a tool's external data dependencies can be satisfied.
//!
//! Data-driven select parameters read their options from a shared tool
//! data table or from a location file. Neither file is part of a
//! repository; the repository must instead ship a sample that stands in for
//! it.

mod data_table;
mod sample;

pub use data_table::{ToolDataTableValidator, XmlToolDataTableValidator};
pub use sample::SampleInstaller;

use std::collections::HashSet;

use shed_fs::constants::file_name_of;
use shed_fs::{NormalizedPath, ReservedFile, SAMPLE_SUFFIX};
use shed_meta::error::missing_file_correction;
use shed_meta::{InvalidFile, ToolDescriptor};
use shed_vcs::{ResolvedRevision, RevisionSource};
use tracing::{debug, warn};

/// Correction for a data table dependency without a table sample.
pub const MISSING_DATA_TABLE_SAMPLE: &str = "This file requires an entry in the tool_data_table_conf.xml file.  \
     Upload a file named tool_data_table_conf.xml.sample to the repository \
     that includes the required entry to resolve this issue.";

/// Correction for a location file dependency without its sample.
pub fn missing_index_sample(index_file: &str) -> String {
    let tail = file_name_of(index_file);
    format!(
        "This file refers to a file named {index_file}.  \
         Upload a file named {tail}{SAMPLE_SUFFIX} to the repository to correct this error."
    )
}

/// Validates the tools of one revision against the samples it ships.
pub struct DynamicParameterValidator<'a> {
    source: &'a dyn RevisionSource,
    revision: &'a ResolvedRevision,
    sample_files: &'a [NormalizedPath],
    files: HashSet<&'a str>,
    tables: &'a dyn ToolDataTableValidator,
    installer: &'a SampleInstaller,
}

impl<'a> DynamicParameterValidator<'a> {
    pub fn new(
        source: &'a dyn RevisionSource,
        revision: &'a ResolvedRevision,
        files: &'a [NormalizedPath],
        sample_files: &'a [NormalizedPath],
        tables: &'a dyn ToolDataTableValidator,
        installer: &'a SampleInstaller,
    ) -> Self {
        Self {
            source,
            revision,
            sample_files,
            files: files.iter().map(NormalizedPath::as_str).collect(),
            tables,
            installer,
        }
    }

    /// Check every dependency of `tool`, clearing the missing flags of those
    /// that are satisfied.
    ///
    /// Returns whether metadata can be set for the tool. Every unsatisfied
    /// dependency is appended to `invalid_files` under `tool_file`.
    pub fn check(
        &self,
        tool_file: &str,
        tool: &mut ToolDescriptor,
        invalid_files: &mut Vec<InvalidFile>,
    ) -> bool {
        let mut can_set_metadata = self.check_code_files(tool_file, tool, invalid_files);

        for param in tool.dynamic_inputs_mut() {
            let Some(options) = param.options.as_mut() else {
                continue;
            };

            if options.needs_data_table() {
                match self.find_sample(ReservedFile::ToolDataTableSample.as_str()) {
                    Some(sample) => match self.validate_table_sample(sample) {
                        Ok(()) => options.missing_data_table_name = None,
                        Err(message) => {
                            can_set_metadata = false;
                            push_unique(
                                invalid_files,
                                InvalidFile::new(ReservedFile::ToolDataTableSample.as_str(), message),
                            );
                        }
                    },
                    None => {
                        can_set_metadata = false;
                        push_unique(
                            invalid_files,
                            InvalidFile::new(tool_file, MISSING_DATA_TABLE_SAMPLE),
                        );
                    }
                }
            }

            if let Some(index_file) = options.required_index_file().map(str::to_string) {
                let tail = file_name_of(&index_file).to_string();
                let sample_name = format!("{tail}{SAMPLE_SUFFIX}");
                match self.find_sample(&sample_name) {
                    Some(sample) => {
                        if let Err(e) = self.installer.install(self.source, self.revision, sample) {
                            warn!(sample = %sample, error = %e, "Failed to install sample file");
                        }
                        options.index_file = Some(tail);
                        options.missing_index_file = None;
                        if let Some(table) = options.data_table.as_mut() {
                            table.missing_index_file = None;
                        }
                    }
                    None => {
                        debug!(tool = %tool_file, index = %index_file, "Missing location file sample");
                        can_set_metadata = false;
                        push_unique(
                            invalid_files,
                            InvalidFile::new(tool_file, missing_index_sample(&index_file)),
                        );
                    }
                }
            }
        }

        can_set_metadata
    }

    /// Code files are resolved next to the tool config.
    fn check_code_files(
        &self,
        tool_file: &str,
        tool: &ToolDescriptor,
        invalid_files: &mut Vec<InvalidFile>,
    ) -> bool {
        let base = NormalizedPath::new(&tool.tool_config)
            .parent()
            .unwrap_or_else(|| NormalizedPath::new(""));
        let mut ok = true;
        for code_file in &tool.code_files {
            let expected = base.join(code_file);
            if !self.files.contains(expected.as_str()) {
                ok = false;
                push_unique(
                    invalid_files,
                    InvalidFile::new(tool_file, missing_file_correction(code_file)),
                );
            }
        }
        ok
    }

    fn find_sample(&self, file_name: &str) -> Option<&'a NormalizedPath> {
        self.sample_files
            .iter()
            .find(|path| path.file_name() == Some(file_name))
    }

    fn validate_table_sample(&self, sample: &NormalizedPath) -> Result<(), String> {
        let content = self
            .source
            .read_file(self.revision, sample)
            .map_err(|e| e.to_string())?;
        let tables = self
            .tables
            .validate(&String::from_utf8_lossy(&content))
            .map_err(|e| e.correction_message())?;
        debug!(sample = %sample, tables = tables.len(), "Validated tool data table sample");
        Ok(())
    }
}

fn push_unique(invalid_files: &mut Vec<InvalidFile>, invalid: InvalidFile) {
    if !invalid_files.contains(&invalid) {
        invalid_files.push(invalid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_sample_message_names_both_files() {
        let message = missing_index_sample("tool-data/mydata.loc");
        assert!(message.contains("a file named tool-data/mydata.loc."));
        assert!(message.contains("Upload a file named mydata.loc.sample"));
    }

    #[test]
    fn duplicate_problems_are_reported_once() {
        let mut invalid = Vec::new();
        push_unique(&mut invalid, InvalidFile::new("a.xml", "x"));
        push_unique(&mut invalid, InvalidFile::new("a.xml", "x"));
        push_unique(&mut invalid, InvalidFile::new("b.xml", "x"));
        assert_eq!(invalid.len(), 2);
    }
}
