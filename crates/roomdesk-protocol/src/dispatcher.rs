//! Deep-link entry points: launch arguments and runtime redelivery.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use roomdesk_common::errors::ParseError;
use roomdesk_ipc::MessageSink;
use tracing::{debug, info, warn};

use crate::actions::ActionTable;
use crate::link::{self, DeepLink};
use crate::registrar::SchemeRegistrar;

/// Leading launch arguments that are never a link: the executable, plus the
/// script path when running unpacked.
pub fn launch_arg_offset(packaged: bool) -> usize {
    if packaged {
        1
    } else {
        2
    }
}

/// A link found in the launch arguments, held until the main window's
/// content is ready to receive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeepLink {
    pub link: DeepLink,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Dispatched { action: String },
    UnknownAction(String),
    Malformed(ParseError),
}

impl DispatchOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, DispatchOutcome::Dispatched { .. })
    }
}

pub struct ProtocolDispatcher {
    scheme: String,
    table: Arc<ActionTable>,
    registrar: Box<dyn SchemeRegistrar>,
}

impl ProtocolDispatcher {
    pub fn new(
        scheme: impl Into<String>,
        table: Arc<ActionTable>,
        registrar: Box<dyn SchemeRegistrar>,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            table,
            registrar,
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn table(&self) -> &Arc<ActionTable> {
        &self.table
    }

    /// Register the scheme with the OS, then scan `args` (as the process
    /// received them, executable first) for a link to defer.
    ///
    /// Registration failure is logged; the scan still runs.
    pub fn register_launch_handling(&self, args: &[String], packaged: bool) -> Option<PendingDeepLink> {
        self.register_scheme(args, packaged);

        let raw = args
            .iter()
            .skip(launch_arg_offset(packaged))
            .find(|arg| link::has_scheme(&self.scheme, arg))?;

        match self.parse(raw) {
            Ok(link) => {
                info!(action = %link.action, "Deep link found in launch arguments");
                Some(PendingDeepLink {
                    link,
                    raw: raw.clone(),
                })
            }
            Err(e) => {
                warn!(url = %raw, error = %e, "Ignoring malformed launch deep link");
                None
            }
        }
    }

    fn register_scheme(&self, args: &[String], packaged: bool) {
        let executable = match args.first() {
            Some(exe) => PathBuf::from(exe),
            None => match std::env::current_exe() {
                Ok(exe) => exe,
                Err(e) => {
                    warn!(error = %e, "Cannot resolve executable; scheme not registered");
                    return;
                }
            },
        };

        let mut extra = Vec::new();
        if !packaged {
            if let Some(script) = args.get(1) {
                extra.push(absolute(Path::new(script)).display().to_string());
            }
        }
        extra.push("--".to_string());

        match self.registrar.register(&self.scheme, &executable, &extra) {
            Ok(()) => info!(scheme = %self.scheme, "Registered as default scheme client"),
            Err(e) => warn!(scheme = %self.scheme, error = %e, "Scheme registration failed"),
        }
    }

    /// Handle a link redelivered by the OS while running. Never fails.
    pub fn on_incoming_url(&self, url: &str, sink: &mut dyn MessageSink) -> DispatchOutcome {
        match self.parse(url) {
            Ok(link) => self.dispatch(&link, sink),
            Err(e) => {
                warn!(url, error = %e, "Dropping malformed deep link");
                DispatchOutcome::Malformed(e)
            }
        }
    }

    /// Run the handler for an already-parsed link.
    pub fn dispatch(&self, link: &DeepLink, sink: &mut dyn MessageSink) -> DispatchOutcome {
        match self.table.get(&link.action) {
            Some(handler) => {
                debug!(action = %link.action, params = link.params.len(), "Dispatching deep link");
                handler(link, sink);
                DispatchOutcome::Dispatched {
                    action: link.action.clone(),
                }
            }
            None => {
                warn!(action = %link.action, "Dropping deep link with unknown action");
                DispatchOutcome::UnknownAction(link.action.clone())
            }
        }
    }

    pub fn parse(&self, url: &str) -> Result<DeepLink, ParseError> {
        link::parse(&self.scheme, url)
    }

    pub fn build_url(&self, action: &str, params: &BTreeMap<String, String>) -> String {
        link::build_url(&self.scheme, action, params)
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
