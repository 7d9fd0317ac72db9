//! Shutdown state and cancellation for long-running work.
//!
//! - `SHUTDOWN`: Has shutdown been requested? (Ctrl+C received)
//! - [`CancelToken`]: wakes sleeping watch loops as soon as shutdown starts
//!
//! A token never carries messages. Cancellation is the channel becoming
//! disconnected, which every clone observes at once.

use std::sync::LazyLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use parking_lot::Mutex;

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Canceller for the process-wide token, taken by the Ctrl+C handler
static CANCELLER: LazyLock<Mutex<Option<Canceller>>> = LazyLock::new(|| Mutex::new(None));

// =============================================================================
// Cancellation
// =============================================================================

/// Cloneable cancellation signal observed by workers.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: Receiver<()>,
}

/// Owning side of a [`CancelToken`]. Cancels on [`Canceller::cancel`] or drop.
#[derive(Debug)]
pub struct Canceller {
    tx: Sender<()>,
}

impl CancelToken {
    /// Create a linked canceller/token pair.
    pub fn pair() -> (Canceller, CancelToken) {
        let (tx, rx) = channel::bounded(0);
        (Canceller { tx }, CancelToken { rx })
    }

    /// Check whether cancellation has happened.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Sleep for `timeout` unless cancelled first.
    ///
    /// Returns `true` if the token was cancelled.
    pub fn sleep(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Err(RecvTimeoutError::Disconnected) => true,
            Err(RecvTimeoutError::Timeout) | Ok(()) => false,
        }
    }
}

impl Canceller {
    /// Cancel every linked token.
    pub fn cancel(self) {
        drop(self.tx);
    }
}

// =============================================================================
// SHUTDOWN state
// =============================================================================

/// Setup the global Ctrl+C handler. Call once at program start
///
/// The first Ctrl+C sets the SHUTDOWN flag and cancels the returned token,
/// so batch workers stop picking up new files and watch loops return. A
/// second Ctrl+C exits immediately.
pub fn setup_shutdown_handler() -> anyhow::Result<CancelToken> {
    let (canceller, token) = CancelToken::pair();
    *CANCELLER.lock() = Some(canceller);

    ctrlc::set_handler(|| {
        if SHUTDOWN.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
        crate::log!("shutdown"; "stopping, press Ctrl+C again to force");
        if let Some(canceller) = CANCELLER.lock().take() {
            canceller.cancel();
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))?;

    Ok(token)
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_token_starts_uncancelled() {
        let (_canceller, token) = CancelToken::pair();
        assert!(!token.is_cancelled());
        assert!(!token.sleep(Duration::from_millis(5)));
    }

    #[test]
    fn test_cancel_reaches_all_clones() {
        let (canceller, token) = CancelToken::pair();
        let other = token.clone();
        canceller.cancel();
        assert!(token.is_cancelled());
        assert!(other.is_cancelled());
    }

    #[test]
    fn test_cancel_wakes_sleeper() {
        let (canceller, token) = CancelToken::pair();
        let sleeper = thread::spawn(move || {
            let start = Instant::now();
            let cancelled = token.sleep(Duration::from_secs(30));
            (cancelled, start.elapsed())
        });
        thread::sleep(Duration::from_millis(20));
        canceller.cancel();

        let (cancelled, elapsed) = sleeper.join().unwrap();
        assert!(cancelled);
        assert!(elapsed < Duration::from_secs(5));
    }

    #[test]
    fn test_dropping_canceller_cancels() {
        let (canceller, token) = CancelToken::pair();
        drop(canceller);
        assert!(token.sleep(Duration::from_secs(30)));
    }
}
