use serde::Serialize;

use crate::Error;

/// A definition file that could not contribute to the metadata document,
/// with the instruction that lets its owner fix it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidFile {
    /// File name as shown to the repository owner
    pub file: String,
    pub message: String,
}

impl InvalidFile {
    pub fn new(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn from_error(file: impl Into<String>, error: &Error) -> Self {
        Self::new(file, error.correction_message())
    }
}

impl std::fmt::Display for InvalidFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.file, self.message)
    }
}
