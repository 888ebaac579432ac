//! Service context bundling all port trait objects.

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::platform::LivePlatform;
use crate::adapters::live::reporter::ConsoleReporter;
use crate::ports::filesystem::FileSystem;
use crate::ports::platform::ChatPlatform;
use crate::ports::reporter::Reporter;
use crate::settings::Settings;

/// Bundles the port trait objects into a single context.
///
/// Each field provides access to one external boundary. The live
/// constructor wires up the production adapters; tests build a context
/// by hand from in-memory fakes.
pub struct ServiceContext {
    /// Remote chat platform for all guild CRUD.
    pub platform: Box<dyn ChatPlatform>,
    /// Filesystem for snapshot persistence.
    pub fs: Box<dyn FileSystem>,
    /// Progress and error sink.
    pub reporter: Box<dyn Reporter>,
}

impl ServiceContext {
    /// Creates a live context with the real platform, filesystem, and
    /// console reporter adapters.
    #[must_use]
    pub fn live(settings: &Settings) -> Self {
        Self {
            platform: Box::new(LivePlatform::new(settings.token.clone())),
            fs: Box::new(LiveFileSystem),
            reporter: Box::new(ConsoleReporter::new(settings.output_level, &settings.language)),
        }
    }
}
