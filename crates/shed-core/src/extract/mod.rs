//! Extraction orchestrator
//!
//! Runs the `START → LOCATING_FILES → PARSING → VALIDATING → DIFFING →
//! PERSISTING` state machine for one repository revision. Per-file failures
//! become [`InvalidFile`] entries; only an unknown revision or an empty
//! result end a run early.

mod result;
mod state;

pub use result::{ExtractionResult, Outcome, Status};
pub use state::ExtractionState;

use std::sync::Arc;

use shed_fs::checksum::compute_checksum;
use shed_fs::{NormalizedPath, ReservedFile, is_sample_file};
use shed_meta::{
    GuidContext, InvalidFile, MetadataDocument, MetadataDocumentBuilder, ToolDescriptor,
    ToolParser, ToolTypeRegistry, parse_datatypes_config, parse_workflow,
};
use shed_vcs::{ResolvedRevision, RevisionSource};
use tracing::{debug, info, warn};

use crate::diff::{self, RecordStrategy};
use crate::validation::{
    DynamicParameterValidator, SampleInstaller, ToolDataTableValidator, XmlToolDataTableValidator,
};
use crate::{MetadataRecord, MetadataStore, RepositoryLocks, Result, ShedConfig};

use result::{invalid_files_message, never_defined, not_installable, revision_not_found};

const TOOL_CONFIG_EXTENSION: &str = "xml";
const WORKFLOW_EXTENSION: &str = "ga";

/// Identity of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Store key
    pub id: String,
    pub name: String,
    pub owner: String,
}

impl Repository {
    pub fn new(id: impl Into<String>, name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            owner: owner.into(),
        }
    }

    fn guid_context(&self, host: &str) -> GuidContext {
        GuidContext::new(host, self.owner.as_str(), self.name.as_str())
    }
}

/// Extracts and persists repository metadata.
///
/// One extractor serves many repositories; runs for the same repository are
/// serialized.
pub struct Extractor {
    config: ShedConfig,
    store: Arc<dyn MetadataStore>,
    locks: RepositoryLocks,
    tables: Box<dyn ToolDataTableValidator>,
    registry: ToolTypeRegistry,
}

impl Extractor {
    pub fn new(config: ShedConfig, store: Arc<dyn MetadataStore>) -> Self {
        Self {
            config,
            store,
            locks: RepositoryLocks::new(),
            tables: Box::new(XmlToolDataTableValidator),
            registry: ToolTypeRegistry::with_builtins(),
        }
    }

    pub fn with_table_validator(mut self, validator: impl ToolDataTableValidator + 'static) -> Self {
        self.tables = Box::new(validator);
        self
    }

    pub fn config(&self) -> &ShedConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn MetadataStore {
        self.store.as_ref()
    }

    /// Extract metadata for `revision` and persist it.
    ///
    /// Problems with the repository's content are reported in the result;
    /// an `Err` means the store or the history could not be accessed.
    pub fn set_repository_metadata(
        &self,
        repository: &Repository,
        source: &dyn RevisionSource,
        revision: &str,
    ) -> Result<ExtractionResult> {
        self.locks.run_locked(&repository.id, || {
            Run::new(self, repository, source, revision).execute()
        })
    }

    /// Stored malicious flag of the record for `revision`, `false` when
    /// there is none.
    pub fn changeset_is_malicious(&self, repository: &Repository, revision: &str) -> Result<bool> {
        Ok(self
            .store
            .by_revision(&repository.id, revision)?
            .is_some_and(|record| record.malicious))
    }

    /// Flag the record for `revision`; returns `None` when no record exists.
    pub fn set_malicious(
        &self,
        repository: &Repository,
        revision: &str,
        malicious: bool,
    ) -> Result<Option<MetadataRecord>> {
        self.locks.run_locked(&repository.id, || {
            match self.store.by_revision(&repository.id, revision)? {
                Some(record) => Ok(Some(self.store.set_malicious(&record, malicious)?)),
                None => Ok(None),
            }
        })
    }

    /// Every metadata record of the repository, oldest first.
    pub fn downloadable_revisions(&self, repository: &Repository) -> Result<Vec<MetadataRecord>> {
        self.store.list(&repository.id)
    }
}

/// Candidate files of one revision, by role.
#[derive(Debug, Default)]
struct LocatedFiles {
    datatypes_config: Option<NormalizedPath>,
    sample_files: Vec<NormalizedPath>,
    tool_configs: Vec<NormalizedPath>,
    workflows: Vec<NormalizedPath>,
}

impl LocatedFiles {
    /// Datatype configs and workflows only count at the tip.
    fn locate(files: &[NormalizedPath], is_tip: bool) -> Self {
        let mut located = Self::default();
        for file in files {
            let path = file.as_str();
            if is_sample_file(path) {
                located.sample_files.push(file.clone());
            } else if ReservedFile::DatatypesConf.matches(path) {
                if !is_tip {
                    continue;
                }
                match &located.datatypes_config {
                    None => located.datatypes_config = Some(file.clone()),
                    Some(first) => warn!(used = %first, ignored = %file, "Multiple datatype configs"),
                }
            } else if file.extension() == Some(TOOL_CONFIG_EXTENSION) {
                located.tool_configs.push(file.clone());
            } else if is_tip && file.extension() == Some(WORKFLOW_EXTENSION) {
                located.workflows.push(file.clone());
            }
        }
        located
    }
}

/// State of a single extraction run.
struct Run<'a> {
    extractor: &'a Extractor,
    repository: &'a Repository,
    source: &'a dyn RevisionSource,
    requested: &'a str,
    state: ExtractionState,
    invalid_files: Vec<InvalidFile>,
}

impl<'a> Run<'a> {
    fn new(
        extractor: &'a Extractor,
        repository: &'a Repository,
        source: &'a dyn RevisionSource,
        requested: &'a str,
    ) -> Self {
        Self {
            extractor,
            repository,
            source,
            requested,
            state: ExtractionState::Start,
            invalid_files: Vec::new(),
        }
    }

    fn transition(&mut self, next: ExtractionState) {
        debug!(
            repository = %self.repository.id,
            revision = %self.requested,
            from = %self.state,
            to = %next,
            "Extraction state change"
        );
        self.state = next;
    }

    fn execute(mut self) -> Result<ExtractionResult> {
        let extractor = self.extractor;
        let source = self.source;
        let requested = self.requested;

        let resolved = match source.resolve(requested) {
            Ok(resolved) => resolved,
            Err(shed_vcs::Error::RevisionNotFound { .. }) => {
                return Ok(self.fail(requested, revision_not_found(requested)));
            }
            Err(e) => return Err(e.into()),
        };
        let revision = resolved.revision().to_string();
        let is_tip = resolved.is_tip;
        info!(
            repository = %self.repository.id,
            revision = %revision,
            label = %resolved.changeset.label(),
            is_tip,
            "Setting repository metadata"
        );

        self.transition(ExtractionState::LocatingFiles);
        let files = source.list_files(&resolved)?;
        let located = LocatedFiles::locate(&files, is_tip);
        debug!(
            files = files.len(),
            tool_configs = located.tool_configs.len(),
            samples = located.sample_files.len(),
            workflows = located.workflows.len(),
            "Located candidate files"
        );

        self.transition(ExtractionState::Parsing);
        let mut builder = MetadataDocument::builder();
        if let Some(config) = &located.datatypes_config {
            self.parse_datatypes(&resolved, config, &mut builder);
        }
        let tools = self.parse_tools(&resolved, &located.tool_configs);
        for workflow in &located.workflows {
            self.parse_workflow(&resolved, workflow, &mut builder);
        }

        self.transition(ExtractionState::Validating);
        let installer = SampleInstaller::new(&extractor.config.tool_data_path);
        let validator = DynamicParameterValidator::new(
            source,
            &resolved,
            &files,
            &located.sample_files,
            extractor.tables.as_ref(),
            &installer,
        );
        for (file, mut tool) in tools {
            if validator.check(&file, &mut tool, &mut self.invalid_files) {
                builder.add_tool(&tool);
            } else {
                warn!(file = %file, tool = %tool.id, "Tool excluded from metadata");
            }
        }
        let document = builder.build().normalized();

        if !document.is_installable() {
            let message = if self.invalid_files.is_empty() {
                not_installable(&revision)
            } else {
                invalid_files_message(&revision, false, &self.invalid_files)
            };
            return Ok(self.fail(&revision, message));
        }

        self.transition(ExtractionState::Diffing);
        let store = extractor.store.as_ref();
        let (strategy, target) = if is_tip {
            let latest = store.latest(&self.repository.id)?;
            let strategy = diff::tip_strategy(latest.as_ref(), &document);
            match strategy {
                RecordStrategy::Create => (strategy, None),
                _ => (strategy, latest),
            }
        } else {
            match store.by_revision(&self.repository.id, &revision)? {
                Some(record) => (RecordStrategy::OverwriteRevision, Some(record)),
                None => return Ok(self.fail(&revision, never_defined(&revision))),
            }
        };

        self.transition(ExtractionState::Persisting);
        let checksum = compute_checksum(&serde_json::to_vec(&document)?);
        let record = match target {
            Some(existing) => store.update(&existing, &revision, document.clone())?,
            None => store.create(&self.repository.id, &revision, document.clone())?,
        };
        info!(
            repository = %self.repository.id,
            revision = %revision,
            record = record.id,
            strategy = %strategy,
            "Persisted repository metadata"
        );

        let (outcome, status, message) = if self.invalid_files.is_empty() {
            (Outcome::Success, Status::Success, String::new())
        } else {
            (
                Outcome::PartialSuccess,
                Status::Error,
                invalid_files_message(&revision, true, &self.invalid_files),
            )
        };
        self.transition(outcome.into());

        Ok(ExtractionResult {
            message,
            status,
            outcome,
            revision,
            invalid_files: self.invalid_files,
            strategy: Some(strategy),
            record_id: Some(record.id),
            document_checksum: Some(checksum),
            document: Some(document),
        })
    }

    fn fail(mut self, revision: &str, message: String) -> ExtractionResult {
        self.transition(ExtractionState::Error);
        warn!(repository = %self.repository.id, revision = %revision, "{message}");
        ExtractionResult::error(revision, message, self.invalid_files)
    }

    fn record_invalid(&mut self, file: &NormalizedPath, invalid: InvalidFile) {
        warn!(file = %file, problem = %invalid.message, "Invalid definition file");
        self.invalid_files.push(invalid);
    }

    fn parse_datatypes(
        &mut self,
        at: &ResolvedRevision,
        config: &NormalizedPath,
        builder: &mut MetadataDocumentBuilder,
    ) {
        let repository_root = self.source.working_dir().to_native();
        let parsed = self
            .source
            .materialize(at, config)
            .map_err(|e| InvalidFile::new(config.as_str(), e.to_string()))
            .and_then(|file| {
                parse_datatypes_config(file.path(), &repository_root)
                    .map_err(|e| InvalidFile::from_error(config.as_str(), &e))
            });
        match parsed {
            Ok(datatypes) => {
                builder.add_datatypes(datatypes);
            }
            Err(invalid) => self.record_invalid(config, invalid),
        }
    }

    /// Parse every candidate; temporary copies are released per file.
    fn parse_tools(
        &mut self,
        at: &ResolvedRevision,
        configs: &[NormalizedPath],
    ) -> Vec<(String, ToolDescriptor)> {
        let parser = ToolParser::new(self.repository.guid_context(&self.extractor.config.host))
            .with_registry(self.extractor.registry.clone());
        let mut tools = Vec::new();
        for config in configs {
            let parsed = self
                .source
                .materialize(at, config)
                .map_err(|e| InvalidFile::new(config.as_str(), e.to_string()))
                .and_then(|file| {
                    parser
                        .parse_file(file.path(), config.as_str())
                        .map_err(|e| InvalidFile::from_error(config.as_str(), &e))
                });
            match parsed {
                Ok(Some(tool)) => tools.push((config.to_string(), tool)),
                Ok(None) => {}
                Err(invalid) => self.record_invalid(config, invalid),
            }
        }
        tools
    }

    fn parse_workflow(
        &mut self,
        at: &ResolvedRevision,
        path: &NormalizedPath,
        builder: &mut MetadataDocumentBuilder,
    ) {
        let parsed = self
            .source
            .read_file(at, path)
            .map_err(|e| InvalidFile::new(path.as_str(), e.to_string()))
            .and_then(|content| {
                parse_workflow(&content).map_err(|e| InvalidFile::from_error(path.as_str(), &e))
            });
        match parsed {
            Ok(Some(workflow)) => {
                builder.add_workflow(workflow);
            }
            Ok(None) => debug!(file = %path, "Workflow export disabled"),
            Err(invalid) => self.record_invalid(path, invalid),
        }
    }
}
