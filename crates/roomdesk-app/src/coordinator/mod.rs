//! The coordinator: one owner for every piece of session state.
//!
//! Host events, update completions and scheduler ticks each arrive as a
//! separate call and run to completion before the next one. IPC handlers
//! get the [`Session`] mutably; the router, the deep-link dispatcher and the
//! scheduler live beside it so a handler never needs a second borrow.

mod content;
mod handlers;
mod lifecycle;
mod session;

use std::sync::Arc;

use roomdesk_config::RoomdeskConfig;
use roomdesk_ipc::IpcRouter;
use roomdesk_protocol::{ActionTable, PendingDeepLink, ProtocolDispatcher, SchemeRegistrar};
use roomdesk_updater::{SchedulerTick, UpdateController, UpdateScheduler, UpdateState};
use roomdesk_windows::{WindowHost, WindowRegistry};
use tokio::sync::mpsc;

pub use content::WindowLayout;
pub use session::Session;

/// Whether the run loop keeps going after a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Coordinator {
    session: Session,
    router: IpcRouter<Session>,
    protocol: ProtocolDispatcher,
    packaged: bool,
    update_timers: Option<(std::time::Duration, std::time::Duration)>,
    scheduler: Option<UpdateScheduler>,
    scheduler_ticks: Option<mpsc::UnboundedReceiver<SchedulerTick>>,
    shut_down: bool,
}

impl Coordinator {
    /// Wire the components. Nothing touches the host until
    /// [`start`](Self::start) and the host's `ready` event.
    pub fn new(
        config: &RoomdeskConfig,
        host: Box<dyn WindowHost>,
        registrar: Box<dyn SchemeRegistrar>,
        updater: Option<UpdateController>,
    ) -> Self {
        let protocol = ProtocolDispatcher::new(
            config.scheme(),
            Arc::new(ActionTable::with_defaults()),
            registrar,
        );
        let update_timers = updater.as_ref().map(|_| {
            (
                std::time::Duration::from_secs(config.updates.startup_delay_secs),
                std::time::Duration::from_secs(config.updates.check_interval_secs),
            )
        });

        Self {
            session: Session::new(
                WindowRegistry::new(host),
                updater,
                WindowLayout::from_config(config),
            ),
            router: handlers::build_router(),
            protocol,
            packaged: config.app.packaged,
            update_timers,
            scheduler: None,
            scheduler_ticks: None,
            shut_down: false,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn windows(&self) -> &WindowRegistry {
        &self.session.windows
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn update_state(&self) -> Option<&UpdateState> {
        self.session.updater.as_ref().map(UpdateController::state)
    }

    pub fn pending_deep_link(&self) -> Option<&PendingDeepLink> {
        self.session.pending_link.as_ref()
    }

    pub fn protocol(&self) -> &ProtocolDispatcher {
        &self.protocol
    }

    pub fn router(&self) -> &IpcRouter<Session> {
        &self.router
    }

    pub fn timers_running(&self) -> bool {
        self.scheduler.as_ref().is_some_and(|s| !s.is_cancelled())
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Hand the scheduler's tick stream to the run loop (once, after ready).
    pub fn take_scheduler_ticks(&mut self) -> Option<mpsc::UnboundedReceiver<SchedulerTick>> {
        self.scheduler_ticks.take()
    }
}
