//! Background self-update.
//!
//! [`UpdateMachine`] is the pure transition table (`Idle -> Checking ->
//! Available -> Downloading -> Downloaded`, with `Error` reachable from the
//! fetch and download steps). [`UpdateController`] drives it: it runs the
//! machine's effects as tokio tasks and feeds their results back in as
//! [`Completion`]s, one per event-loop turn. [`UpdateScheduler`] issues the
//! startup and periodic checks.

pub mod controller;
pub mod error;
pub mod feed;
pub mod machine;
pub mod manifest;
pub mod scheduler;
pub mod settings;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod version;

pub use controller::{Completion, Installer, UpdateController};
pub use error::UpdateError;
pub use feed::{DownloadedUpdate, FeedSource, HttpFeed, ProgressFn};
pub use machine::{DownloadProgress, Effect, UpdateInput, UpdateMachine, UpdateNotice, UpdateState};
pub use manifest::{UpdateFile, UpdateManifest};
pub use scheduler::{SchedulerTick, UpdateScheduler};
pub use settings::UpdaterSettings;
