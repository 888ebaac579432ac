//! Filesystem port for snapshot persistence I/O.

use std::path::Path;

/// Abstracts file I/O so the snapshot store works against real disk in
/// production and an in-memory map in tests.
pub trait FileSystem: Send + Sync {
    /// Reads an entire file into a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Writes a file in a single all-at-once operation, creating parent
    /// directories as needed. Implementations must not leave a partially
    /// written file behind on failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Returns whether a file exists at the given path.
    fn exists(&self, path: &Path) -> bool;
}
