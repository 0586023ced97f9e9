//! One-way message bus between the coordinator and window content.
//!
//! - **Coordinator -> content**: [`send`] addresses a window by role through
//!   a [`MessageSink`] (normally the window registry). Absent windows are a
//!   silent no-op.
//! - **Content -> coordinator**: [`IpcRouter::dispatch`] runs every handler
//!   registered for the message's topic.
//!
//! There is no request/response correlation; a reply is just another topic.

pub mod message;
pub mod router;
pub mod topics;

pub use message::{IncomingMessage, IpcMessage};
pub use router::{send, IpcRouter, MessageSink};
