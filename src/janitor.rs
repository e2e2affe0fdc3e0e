//! Background sweeping of expired entries.
//!
//! The janitor runs on its own thread and holds only a weak reference to
//! the store, so it never keeps a cache alive on its own.

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::sync::Weak;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::storage::Store;

/// Handle to a running janitor thread.
#[derive(Debug)]
pub(crate) struct Janitor {
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl Janitor {
    /// Start sweeping `store` every `interval`.
    ///
    /// The thread exits when stopped, or once the store has been dropped.
    pub fn start<V>(store: Weak<Store<V>>, interval: Duration) -> Self
    where
        V: Send + Sync + 'static,
    {
        let (stop, stopped) = crossbeam_channel::bounded(1);

        let thread = thread::Builder::new()
            .name("cache-janitor".to_string())
            .spawn(move || run(store, interval, stopped));

        match thread {
            Ok(thread) => {
                log::debug!("janitor started, sweeping every {:?}", interval);
                Self {
                    stop: Some(stop),
                    thread: Some(thread),
                }
            }
            Err(err) => {
                log::warn!("failed to spawn janitor thread: {}", err);
                Self {
                    stop: None,
                    thread: None,
                }
            }
        }
    }

    /// Check if the janitor thread is still running.
    pub fn is_running(&self) -> bool {
        self.thread
            .as_ref()
            .map_or(false, |thread| !thread.is_finished())
    }

    /// Signal the thread to stop and wait for it to finish.
    ///
    /// Safe to call any number of times. When called from the janitor
    /// thread itself (an eviction callback dropping the last cache handle),
    /// the thread is signalled but not joined.
    pub fn stop(&mut self) {
        // Dropping the sender disconnects the channel and wakes the thread.
        self.stop.take();

        let Some(thread) = self.thread.take() else {
            return;
        };
        if thread.thread().id() == thread::current().id() {
            return;
        }
        if thread.join().is_err() {
            log::warn!("janitor thread panicked");
        }
        log::debug!("janitor stopped");
    }
}

impl Drop for Janitor {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<V>(store: Weak<Store<V>>, interval: Duration, stopped: Receiver<()>) {
    loop {
        match stopped.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {
                let Some(store) = store.upgrade() else {
                    return;
                };
                store.delete_expired();
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}
