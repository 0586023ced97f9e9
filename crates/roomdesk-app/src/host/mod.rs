//! Line-delimited JSON bridge to the windowing host process.
//!
//! The host writes [`HostEvent`](roomdesk_common::HostEvent) lines to our
//! stdin and reads [`HostCommand`] lines from our stdout. Logs go to stderr
//! so they never interleave with commands.

mod stdio;

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use roomdesk_common::errors::PlatformError;
use roomdesk_common::types::{Rect, WindowHandle, WindowRole};
use roomdesk_windows::WindowSpec;
use serde::Serialize;

pub use stdio::{DisplayCache, HostRegistrar, StdioHost};

/// Commands sent to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "kebab-case")]
pub enum HostCommand {
    Create {
        window: WindowHandle,
        role: WindowRole,
        spec: WindowSpec,
    },
    Close {
        window: WindowHandle,
    },
    Show {
        window: WindowHandle,
    },
    Hide {
        window: WindowHandle,
    },
    Minimize {
        window: WindowHandle,
    },
    SetBounds {
        window: WindowHandle,
        bounds: Rect,
    },
    SetIgnoreMouse {
        window: WindowHandle,
        ignore: bool,
    },
    Post {
        window: WindowHandle,
        topic: String,
        payload: serde_json::Value,
    },
    RegisterScheme {
        scheme: String,
        executable: PathBuf,
        args: Vec<String>,
    },
    Exit,
}

/// Writes one command per line. Clones share the underlying stream.
#[derive(Clone)]
pub struct CommandWriter {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl CommandWriter {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(out))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    pub fn send(&self, command: &HostCommand) -> Result<(), PlatformError> {
        let line = serde_json::to_string(command)
            .map_err(|e| PlatformError::HostError(format!("failed to encode command: {e}")))?;
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(out, "{line}")?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    /// An in-memory sink whose contents tests can read back.
    #[derive(Clone, Default)]
    pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn lines(&self) -> Vec<serde_json::Value> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .map(|l| serde_json::from_str(l).unwrap())
                .collect()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
