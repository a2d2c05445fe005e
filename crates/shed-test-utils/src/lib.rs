//! Shared test utilities for the tool shed workspace.
//!
//! Crate test suites use these fixtures instead of growing their own git
//! plumbing. Dev-dependency only.
//!
//! - [`repo`]: [`ShedRepo`](repo::ShedRepo), a repository with real history
//! - [`fixtures`]: canned tool, datatype and workflow definition files

pub mod fixtures;
pub mod repo;

pub use repo::ShedRepo;
