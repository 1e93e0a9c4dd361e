//! Background thread that periodically evicts expired entries.
//!
//! The thread holds only a `Weak` reference to the cache data and stops as
//! soon as the owning cache is dropped: dropping the stop `Sender`
//! disconnects the channel the thread waits on.

use std::hash::Hash;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, Sender};
use tracing::{debug, trace};

use crate::cache::Inner;
use crate::CacheResult;

pub(crate) struct Sweeper {
    stop:   Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Sweeper {
    pub(crate) fn spawn<K, V>(inner: &Arc<Inner<K, V>>, period: Duration) -> CacheResult<Sweeper>
    where
        K: Eq + Hash + Send + 'static,
        V: Send + Sync + 'static,
    {
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let data = Arc::downgrade(inner);

        let handle = std::thread::Builder::new()
            .name("timed-cache-sweeper".into())
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(period) {
                        Err(RecvTimeoutError::Timeout) => {
                            let Some(inner) = data.upgrade() else { break };
                            let removed = inner.cleanup();
                            if removed > 0 {
                                trace!(removed, "evicted expired cache entries");
                            }
                        }
                        // Stop requested or cache dropped.
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!("timed cache sweeper stopped");
            })?;

        Ok(Sweeper { stop: Some(stop_tx), handle: Some(handle) })
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        drop(self.stop.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
