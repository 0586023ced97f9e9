//! The event loop: one `select!` over host events, update completions,
//! scheduler ticks and Ctrl-C. Every branch is a single coordinator turn.

use roomdesk_common::events::HostEvent;
use roomdesk_updater::Completion;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::coordinator::{Coordinator, Flow};
use crate::host::{CommandWriter, DisplayCache, HostCommand};

const EVENT_QUEUE: usize = 256;

/// Read newline-delimited host events from `reader` on a background task.
///
/// Blank and malformed lines are skipped. The channel closes at EOF.
pub fn spawn_event_reader<R>(reader: R) -> mpsc::Receiver<HostEvent>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(EVENT_QUEUE);
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let Some(event) = HostEvent::from_json(line) else {
                        continue;
                    };
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Failed to read host event stream");
                    break;
                }
            }
        }
        debug!("Host event reader stopped");
    });
    rx
}

/// Everything the loop listens to besides the coordinator itself.
pub struct LoopInputs {
    pub events: mpsc::Receiver<HostEvent>,
    pub completions: Option<mpsc::UnboundedReceiver<Completion>>,
    pub displays: DisplayCache,
    pub writer: CommandWriter,
}

/// Run until a turn asks to exit, the host closes its stream, or Ctrl-C.
/// Always shuts the coordinator down and tells the host to exit.
pub async fn run(mut coordinator: Coordinator, inputs: LoopInputs) {
    let LoopInputs {
        mut events,
        mut completions,
        displays,
        writer,
    } = inputs;
    let mut ticks = None;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    info!("Entering event loop");
    loop {
        if ticks.is_none() {
            ticks = coordinator.take_scheduler_ticks();
        }

        let flow = tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    displays.observe(&event);
                    coordinator.handle_event(event)
                }
                None => {
                    info!("Host closed the event stream");
                    Flow::Exit
                }
            },
            Some(completion) = recv_or_pending(&mut completions) => {
                coordinator.handle_update_completion(completion)
            }
            Some(tick) = recv_or_pending(&mut ticks) => {
                coordinator.handle_scheduler_tick(tick)
            }
            _ = &mut ctrl_c => {
                info!("Interrupted");
                Flow::Exit
            }
        };

        if flow == Flow::Exit {
            break;
        }
    }

    coordinator.shutdown();
    if let Err(e) = writer.send(&HostCommand::Exit) {
        warn!(error = %e, "Failed to send exit to host");
    }
    info!("Event loop finished");
}

async fn recv_or_pending<T>(rx: &mut Option<mpsc::UnboundedReceiver<T>>) -> Option<T> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
