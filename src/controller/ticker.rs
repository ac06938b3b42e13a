//! Background thread that drives a running match.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Sender, bounded, select, tick};
use parking_lot::Mutex;
use tracing::{debug, warn};

use super::MatchState;

const THREAD_NAME: &str = "crowns-ticker";

/// Handle to the tick thread. Dropping the stop sender ends the loop.
#[derive(Debug)]
pub(super) struct Ticker {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawn a thread that ticks `state` every `period` until stopped or the
    /// match stops running.
    pub(super) fn spawn(state: Arc<Mutex<MatchState>>, period: Duration) -> io::Result<Self> {
        let (stop, stopped) = bounded::<()>(1);
        let handle = thread::Builder::new()
            .name(THREAD_NAME.into())
            .spawn(move || {
                let ticks = tick(period);
                loop {
                    select! {
                        recv(stopped) -> _ => break,
                        recv(ticks) -> _ => {
                            if state.lock().tick().is_none() {
                                break;
                            }
                        }
                    }
                }
                debug!("ticker stopped");
            })?;

        debug!(?period, "ticker started");
        Ok(Self { stop, handle })
    }

    /// Signal the thread and wait for the current tick to finish.
    pub(super) fn stop(self) {
        let Self { stop, handle } = self;
        drop(stop);
        if handle.join().is_err() {
            warn!("ticker thread panicked");
        }
    }
}
