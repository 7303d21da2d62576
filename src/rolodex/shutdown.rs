//! Flush-on-termination.
//!
//! The registry is shared between the command loop and a watcher thread as a
//! [`SharedManager`]. On unix, [`block_signals`] blocks SIGINT and SIGTERM
//! and [`BlockedSignals::watch`] parks a thread in `sigwait` for them. When
//! one arrives the watcher takes the registry lock, which means it waits for a
//! running command to finish, saves every dirty collection and hands the
//! report to the caller's callback. The callback decides how to leave: the CLI prints the
//! outcome and exits with status 0.
//!
//! [`block_signals`] must run on the main thread before any other thread is
//! spawned so that every thread inherits the blocked mask and the signal can
//! only be picked up by the watcher.
//!
//! [`flush_before_exit`] is the flush the watcher performs, exposed so it can
//! be exercised without delivering a real signal.

use crate::error::Result;
use crate::store::manager::{DataManager, FlushReport};
use log::{error, warn};
use std::sync::{Arc, Mutex};

pub type SharedManager = Arc<Mutex<DataManager>>;

pub fn shared(manager: DataManager) -> SharedManager {
    Arc::new(Mutex::new(manager))
}

/// Saves every dirty collection. Never panics; a poisoned lock is recovered
/// since the data behind it is still the best copy available.
pub fn flush_before_exit(manager: &Mutex<DataManager>) -> FlushReport {
    let mut guard = match manager.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("registry lock poisoned, flushing anyway");
            poisoned.into_inner()
        }
    };
    let report = guard.save_all_unsaved();
    for (id, err) in &report.failed {
        error!("event=shutdown_flush status=error storage={} error={}", id, err);
    }
    report
}

/// SIGINT and SIGTERM, blocked for the thread that called [`block_signals`]
/// and every thread it spawns afterwards.
pub struct BlockedSignals {
    #[cfg(unix)]
    mask: nix::sys::signal::SigSet,
}

#[cfg(unix)]
pub fn block_signals() -> Result<BlockedSignals> {
    use crate::error::RolodexError;
    use nix::sys::signal::{SigSet, Signal};

    let mut mask = SigSet::empty();
    mask.add(Signal::SIGINT);
    mask.add(Signal::SIGTERM);
    mask.thread_block()
        .map_err(|err| RolodexError::Signal(format!("failed to block signals: {}", err)))?;
    Ok(BlockedSignals { mask })
}

#[cfg(not(unix))]
pub fn block_signals() -> Result<BlockedSignals> {
    Ok(BlockedSignals {})
}

impl BlockedSignals {
    /// Starts the watcher thread. `on_signal` receives the signal name and
    /// the flush report once the data is on disk.
    #[cfg(unix)]
    pub fn watch<F>(self, manager: SharedManager, on_signal: F) -> Result<()>
    where
        F: FnOnce(&str, FlushReport) + Send + 'static,
    {
        use crate::error::RolodexError;
        use log::info;

        let mask = self.mask;
        std::thread::Builder::new()
            .name("rolodex-shutdown".to_string())
            .spawn(move || match mask.wait() {
                Ok(signal) => {
                    info!("event=signal_received signal={}", signal.as_str());
                    let report = flush_before_exit(&manager);
                    on_signal(signal.as_str(), report);
                }
                Err(err) => error!("event=signal_wait status=error error={}", err),
            })
            .map_err(RolodexError::Io)?;
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn watch<F>(self, _manager: SharedManager, _on_signal: F) -> Result<()>
    where
        F: FnOnce(&str, FlushReport) + Send + 'static,
    {
        warn!("signal flushing is not supported on this platform");
        Ok(())
    }
}
