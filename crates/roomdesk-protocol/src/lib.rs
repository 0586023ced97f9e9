//! Deep-link (custom URL scheme) handling.
//!
//! `<scheme>://<action>?<k=v>&...` links arrive either in the launch
//! arguments or redelivered by the OS at runtime. Each one is parsed, its
//! action looked up in an immutable [`ActionTable`], and the handler run
//! against a [`roomdesk_ipc::MessageSink`]. Malformed links and unknown
//! actions are logged and dropped.

pub mod actions;
pub mod dispatcher;
pub mod link;
pub mod registrar;

pub use actions::{ActionTable, ActionTableBuilder, DeepLinkAction};
pub use dispatcher::{launch_arg_offset, DispatchOutcome, PendingDeepLink, ProtocolDispatcher};
pub use link::{build_url, parse, DeepLink};
pub use registrar::{NoopRegistrar, SchemeRegistrar};
