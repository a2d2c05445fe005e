use serde::Serialize;

/// Phases of one extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionState {
    Start,
    LocatingFiles,
    Parsing,
    Validating,
    Diffing,
    Persisting,
    Success,
    PartialSuccess,
    Error,
}

impl ExtractionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::PartialSuccess | Self::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::LocatingFiles => "LOCATING_FILES",
            Self::Parsing => "PARSING",
            Self::Validating => "VALIDATING",
            Self::Diffing => "DIFFING",
            Self::Persisting => "PERSISTING",
            Self::Success => "SUCCESS",
            Self::PartialSuccess => "PARTIAL_SUCCESS",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for ExtractionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
