use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::demo::demo_sessions;
use super::parse::parse_sessions;
use super::record::{SessionRecord, SessionSnapshot};

pub type LoadResult = Result<SessionSnapshot, String>;

#[derive(Clone, Debug)]
pub enum SessionSource {
    File(PathBuf),
    Demo,
}

impl SessionSource {
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Demo => "built-in demo".to_owned(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Demo => None,
        }
    }

    fn read_records(&self) -> Result<Vec<SessionRecord>> {
        match self {
            Self::File(path) => read_session_file(path),
            Self::Demo => Ok(demo_sessions()),
        }
    }
}

pub fn read_session_file(path: &Path) -> Result<Vec<SessionRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read session list {}", path.display()))?;
    parse_sessions(&raw).with_context(|| format!("failed to parse session list {}", path.display()))
}

pub fn load_snapshot(source: &SessionSource) -> Result<SessionSnapshot> {
    let records = source.read_records()?;
    info!(
        source = %source.describe(),
        sessions = records.len(),
        "loaded session snapshot"
    );
    Ok(SessionSnapshot::new(records))
}

pub fn spawn_load(source: SessionSource) -> Receiver<LoadResult> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let result = load_snapshot(&source).map_err(|error| format!("{error:#}"));
        let _ = tx.send(result);
    });

    rx
}

/// Polls a session file and emits a new snapshot whenever its records change.
///
/// The polling thread exits once the watcher is dropped.
pub struct SnapshotWatcher {
    rx: Receiver<LoadResult>,
    stop: Arc<AtomicBool>,
}

impl SnapshotWatcher {
    pub fn spawn(path: PathBuf, interval: Duration, baseline: &SessionSnapshot) -> Self {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let mut last_records = baseline.sessions().to_vec();
        let interval = interval.max(Duration::from_millis(50));

        thread::spawn(move || {
            let mut last_modified = modified_time(&path);
            debug!(path = %path.display(), ?interval, "session watcher started");

            while !thread_stop.load(Ordering::Relaxed) {
                thread::sleep(interval);

                let modified = modified_time(&path);
                if modified == last_modified {
                    continue;
                }
                last_modified = modified;

                match read_session_file(&path) {
                    Ok(records) if records == last_records => {
                        debug!(path = %path.display(), "session file touched without changes");
                    }
                    Ok(records) => {
                        info!(
                            path = %path.display(),
                            sessions = records.len(),
                            "session file changed"
                        );
                        last_records = records.clone();
                        if tx.send(Ok(SessionSnapshot::new(records))).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        warn!(path = %path.display(), "ignoring unreadable session file: {error:#}");
                    }
                }
            }

            debug!(path = %path.display(), "session watcher stopped");
        });

        Self { rx, stop }
    }

    /// Returns the most recent pending snapshot, if any.
    pub fn poll(&self) -> Option<SessionSnapshot> {
        let mut latest = None;
        loop {
            match self.rx.try_recv() {
                Ok(Ok(snapshot)) => latest = Some(snapshot),
                Ok(Err(error)) => warn!("session watcher error: {error}"),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        latest
    }
}

impl Drop for SnapshotWatcher {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Instant;

    use super::*;

    #[test]
    fn loads_snapshot_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": "a", "name": "Alpha", "nodeCount": 4}}]"#).unwrap();

        let source = SessionSource::File(file.path().to_path_buf());
        let snapshot = load_snapshot(&source).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.sessions()[0].name, "Alpha");
    }

    #[test]
    fn missing_file_reports_path() {
        let source = SessionSource::File(PathBuf::from("/definitely/not/here.json"));
        let error = load_snapshot(&source).unwrap_err();
        assert!(format!("{error:#}").contains("/definitely/not/here.json"));
    }

    #[test]
    fn background_load_delivers_demo_snapshot() {
        let rx = spawn_load(SessionSource::Demo);
        let snapshot = rx
            .recv_timeout(Duration::from_secs(5))
            .unwrap()
            .unwrap();
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn watcher_emits_changed_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        fs::write(&path, r#"[{"id": "a", "name": "A"}]"#).unwrap();
        let baseline = load_snapshot(&SessionSource::File(path.clone())).unwrap();

        let watcher = SnapshotWatcher::spawn(path.clone(), Duration::from_millis(50), &baseline);

        // Some filesystems only track whole-second mtimes.
        thread::sleep(Duration::from_millis(1100));
        fs::write(&path, r#"[{"id": "a", "name": "A"}, {"id": "b", "name": "B"}]"#).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut received = None;
        while Instant::now() < deadline && received.is_none() {
            received = watcher.poll();
            thread::sleep(Duration::from_millis(25));
        }

        let snapshot = received.expect("watcher should report the new session");
        assert_eq!(snapshot.len(), 2);
        assert!(!snapshot.same_identity(&baseline));
    }
}
