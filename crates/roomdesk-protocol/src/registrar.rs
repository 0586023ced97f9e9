use std::path::Path;

use roomdesk_common::errors::PlatformError;

/// Registers this process as the OS handler for a URL scheme.
pub trait SchemeRegistrar {
    /// `executable` is launched with `args` followed by the link.
    fn register(&self, scheme: &str, executable: &Path, args: &[String]) -> Result<(), PlatformError>;
}

/// Skips registration; for tests and hosts that register at install time.
pub struct NoopRegistrar;

impl SchemeRegistrar for NoopRegistrar {
    fn register(&self, scheme: &str, executable: &Path, args: &[String]) -> Result<(), PlatformError> {
        tracing::debug!(scheme, executable = %executable.display(), ?args, "Scheme registration skipped");
        Ok(())
    }
}
