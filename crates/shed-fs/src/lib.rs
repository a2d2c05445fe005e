//! Filesystem abstraction for the tool shed metadata engine
//!
//! Provides normalized path handling, atomic I/O, the working-copy walk and
//! the reserved file names that drive metadata extraction.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;
pub mod walk;

pub use config::{ConfigFormat, ConfigStore};
pub use constants::{ReservedFile, SAMPLE_SUFFIX, is_sample_file};
pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use walk::ExcludedDirs;
