//! Repository path listing.

use std::sync::{PoisonError, RwLock};

/// Source of the repository paths shown by the dashboard.
pub trait RepositoryProvider: Send + Sync {
    /// Returns a fresh copy of the repository paths.
    ///
    /// Callers own the returned vector; changing it never affects later calls.
    fn list_paths(&self) -> Vec<String>;
}

/// In-memory repository list.
///
/// Starts with the current directory as its only entry. Nothing is loaded
/// from or saved to disk.
#[derive(Debug)]
pub struct RepositoryManager {
    paths: RwLock<Vec<String>>,
}

impl Default for RepositoryManager {
    fn default() -> Self {
        Self::with_paths(vec![".".to_string()])
    }
}

impl RepositoryManager {
    /// Creates a manager holding only `"."`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manager holding the given paths.
    #[must_use]
    pub const fn with_paths(paths: Vec<String>) -> Self {
        Self {
            paths: RwLock::new(paths),
        }
    }

    /// Appends a path to the list.
    pub fn add_path(&self, path: impl Into<String>) {
        self.paths
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.into());
    }
}

impl RepositoryProvider for RepositoryManager {
    fn list_paths(&self) -> Vec<String> {
        self.paths
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
