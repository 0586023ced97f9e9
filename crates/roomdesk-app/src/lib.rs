//! The roomdesk control plane.
//!
//! A windowing shell spawns the `roomdesk` binary and talks to it over
//! newline-delimited JSON on stdio ([`host`]). The [`Coordinator`] owns the
//! window registry, the IPC router, the deep-link dispatcher and the update
//! controller, and handles each host event as one turn of the [`run`] loop.

pub mod cli;
pub mod coordinator;
pub mod host;
pub mod install;
pub mod run;

pub use coordinator::{Coordinator, Flow, Session};
