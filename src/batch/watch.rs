//! Polling watch loop for a single file.
//!
//! ```text
//!          ┌────────── unchanged ─────────┐
//!          ▼                              │
//!   ──▶ Idle ── sleep(interval) ──▶ poll mtime
//!          ▲                              │ changed
//!          └──── on_change(path) ◀── Changed (last = current)
//! ```
//!
//! Polling trades up to one interval of latency for portability: no
//! filesystem event API is involved. The loop only ends when its
//! [`CancelToken`] is cancelled or the file's metadata can no longer be read.

use std::fs;
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};

use crate::asset::AssetError;
use crate::core::CancelToken;
use crate::log;

/// Default delay between two polls.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Modification time of `path` in whole seconds since the epoch.
///
/// Pre-epoch timestamps collapse to 0.
pub fn mtime_secs(path: &Path) -> Result<u64, AssetError> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| AssetError::not_readable(path, e))?;
    Ok(modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0))
}

/// Watch `path`, calling `on_change` once per observed mtime transition.
///
/// The mtime read after `on_change` returns becomes the new baseline, so a
/// handler that rewrites `path` in place does not trigger itself.
///
/// Returns the number of changes handled once `cancel` fires. A metadata
/// read failure ends the loop with `NotReadable`.
pub fn watch_file<F>(
    path: &Path,
    interval: Duration,
    cancel: &CancelToken,
    mut on_change: F,
) -> Result<usize, AssetError>
where
    F: FnMut(&Path),
{
    let mut last = mtime_secs(path)?;
    let mut changes = 0;
    log!("watch"; "watching {}", path.display());

    while !cancel.sleep(interval) {
        let current = mtime_secs(path)?;
        if current == last {
            continue;
        }
        last = current;
        changes += 1;
        log!("watch"; "modification detected on {}", path.display());
        on_change(path);
        // Writes made by the handler itself (overwrite mode) are not changes
        last = mtime_secs(path)?;
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Instant;
    use tempfile::TempDir;

    const TICK: Duration = Duration::from_millis(10);

    fn set_mtime(path: &Path, secs: u64) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    fn wait_until(cond: impl Fn() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            thread::sleep(TICK);
        }
        cond()
    }

    fn spawn_watch(
        path: &Path,
        token: CancelToken,
    ) -> (
        Arc<AtomicUsize>,
        thread::JoinHandle<Result<usize, AssetError>>,
    ) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let path = path.to_path_buf();
        let handle = thread::spawn(move || {
            watch_file(&path, TICK, &token, |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
        });
        (count, handle)
    }

    #[test]
    fn test_mtime_secs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.css");
        fs::write(&path, "a{}").unwrap();
        set_mtime(&path, 1_000);
        assert_eq!(mtime_secs(&path).unwrap(), 1_000);
        assert!(matches!(
            mtime_secs(&dir.path().join("missing.css")),
            Err(AssetError::NotReadable { .. })
        ));
    }

    #[test]
    fn test_once_per_transition() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.css");
        fs::write(&path, "a{}").unwrap();
        set_mtime(&path, 1_000);

        let (canceller, token) = CancelToken::pair();
        let (count, handle) = spawn_watch(&path, token);

        // unchanged polls never fire
        thread::sleep(TICK * 10);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        set_mtime(&path, 2_000);
        assert!(wait_until(|| count.load(Ordering::SeqCst) == 1));
        thread::sleep(TICK * 10);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        set_mtime(&path, 3_000);
        assert!(wait_until(|| count.load(Ordering::SeqCst) == 2));

        canceller.cancel();
        assert_eq!(handle.join().unwrap().unwrap(), 2);
    }

    #[test]
    fn test_going_back_in_time_is_a_change() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.js");
        fs::write(&path, "1").unwrap();
        set_mtime(&path, 5_000);

        let (canceller, token) = CancelToken::pair();
        let (count, handle) = spawn_watch(&path, token);
        thread::sleep(TICK * 5);
        set_mtime(&path, 4_000);
        assert!(wait_until(|| count.load(Ordering::SeqCst) == 1));

        canceller.cancel();
        assert_eq!(handle.join().unwrap().unwrap(), 1);
    }

    #[test]
    fn test_handler_rewriting_file_does_not_retrigger() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.css");
        fs::write(&path, "a { color: red; }").unwrap();
        set_mtime(&path, 1_000);

        let (canceller, token) = CancelToken::pair();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let watched = path.clone();
        let handle = thread::spawn(move || {
            watch_file(&watched, TICK, &token, |changed| {
                counter.fetch_add(1, Ordering::SeqCst);
                // rewrite in place, as --overwrite does
                fs::write(changed, "a{color:red}").unwrap();
                set_mtime(changed, 9_000);
            })
        });

        thread::sleep(TICK * 5);
        set_mtime(&path, 2_000);
        assert!(wait_until(|| count.load(Ordering::SeqCst) == 1));
        thread::sleep(TICK * 20);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        canceller.cancel();
        assert_eq!(handle.join().unwrap().unwrap(), 1);
    }

    #[test]
    fn test_cancel_stops_loop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.css");
        fs::write(&path, "a{}").unwrap();

        let (canceller, token) = CancelToken::pair();
        let path_clone = path.clone();
        let handle = thread::spawn(move || {
            watch_file(&path_clone, Duration::from_secs(3600), &token, |_| {})
        });
        thread::sleep(TICK * 2);
        canceller.cancel();
        assert_eq!(handle.join().unwrap().unwrap(), 0);
    }

    #[test]
    fn test_vanished_file_ends_watch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.css");
        fs::write(&path, "a{}").unwrap();

        let (_canceller, token) = CancelToken::pair();
        let (_count, handle) = spawn_watch(&path, token);
        thread::sleep(TICK * 3);
        fs::remove_file(&path).unwrap();

        let result = handle.join().unwrap();
        assert!(matches!(result, Err(AssetError::NotReadable { .. })));
    }

    #[test]
    fn test_missing_file_fails_immediately() {
        let dir = TempDir::new().unwrap();
        let (_canceller, token) = CancelToken::pair();
        let result = watch_file(&dir.path().join("nope.css"), TICK, &token, |_| {});
        assert!(matches!(result, Err(AssetError::NotReadable { .. })));
    }
}
