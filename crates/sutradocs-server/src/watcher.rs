//! File watching for live reload.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A content page was created, changed or removed
    Content(PathBuf),

    /// The sidebar catalog file changed
    Sidebar(PathBuf),
}

/// What to watch.
#[derive(Debug, Clone)]
pub struct WatchTargets {
    /// Content directories, watched recursively
    pub content_dirs: Vec<PathBuf>,

    /// Sidebar catalog file
    pub sidebar: PathBuf,
}

/// File watcher for detecting changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Create a new file watcher for the given targets.
    ///
    /// Returns the watcher and a channel to receive events.
    pub fn new(
        targets: &WatchTargets,
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        for dir in &targets.content_dirs {
            if dir.exists() {
                watcher
                    .watch(dir, RecursiveMode::Recursive)
                    .map_err(std::io::Error::other)?;
            }
        }

        // Editors often replace files on save, so watch the sidebar's directory.
        let sidebar = absolute(&targets.sidebar);
        if let Some(parent) = sidebar.parent().filter(|p| p.exists()) {
            watcher
                .watch(parent, RecursiveMode::NonRecursive)
                .map_err(std::io::Error::other)?;
        }

        std::thread::spawn(move || {
            let quiet = Duration::from_millis(200);

            while let Ok(event) = sync_rx.recv() {
                let mut batch = classify_all(&event, &sidebar);

                // Keep collecting until the filesystem has been quiet for a while
                loop {
                    match sync_rx.recv_timeout(quiet) {
                        Ok(event) => batch.extend(classify_all(&event, &sidebar)),
                        Err(_) => break,
                    }
                }

                for watch_event in coalesce(batch) {
                    if async_tx.blocking_send(watch_event).is_err() {
                        return;
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    })
}

fn classify_all(event: &notify::Event, sidebar: &Path) -> Vec<WatchEvent> {
    event
        .paths
        .iter()
        .filter_map(|path| classify_event(path, &event.kind, sidebar))
        .collect()
}

/// Collapse a burst of events into at most one per kind.
///
/// Any content change rescans every collection, so one event is enough.
fn coalesce(events: Vec<WatchEvent>) -> Vec<WatchEvent> {
    let mut coalesced: Vec<WatchEvent> = Vec::new();
    for event in events {
        let seen = coalesced
            .iter()
            .any(|e| std::mem::discriminant(e) == std::mem::discriminant(&event));
        if !seen {
            coalesced.push(event);
        }
    }
    coalesced
}

/// Classify a notify event into a WatchEvent.
fn classify_event(path: &Path, kind: &EventKind, sidebar: &Path) -> Option<WatchEvent> {
    if !matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) {
        return None;
    }

    if path == sidebar {
        return Some(WatchEvent::Sidebar(path.to_path_buf()));
    }

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if ext == "mdx" || ext == "md" {
        return Some(WatchEvent::Content(path.to_path_buf()));
    }

    // Directory creation or removal can add or drop whole sections.
    match kind {
        EventKind::Create(notify::event::CreateKind::Folder)
        | EventKind::Remove(notify::event::RemoveKind::Folder) => {
            Some(WatchEvent::Content(path.to_path_buf()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, ModifyKind};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn classifies_paths() {
        let sidebar = PathBuf::from("/site/sidebar.yml");
        let modify = EventKind::Modify(ModifyKind::Data(DataChange::Content));

        assert_eq!(
            classify_event(Path::new("/site/sidebar.yml"), &modify, &sidebar),
            Some(WatchEvent::Sidebar(PathBuf::from("/site/sidebar.yml")))
        );
        assert_eq!(
            classify_event(Path::new("/site/docs/intro.mdx"), &modify, &sidebar),
            Some(WatchEvent::Content(PathBuf::from("/site/docs/intro.mdx")))
        );
        assert_eq!(
            classify_event(Path::new("/site/docs/new"), &EventKind::Create(CreateKind::Folder), &sidebar),
            Some(WatchEvent::Content(PathBuf::from("/site/docs/new")))
        );
        assert_eq!(classify_event(Path::new("/site/notes.txt"), &modify, &sidebar), None);
        assert_eq!(
            classify_event(Path::new("/site/docs/intro.mdx"), &EventKind::Any, &sidebar),
            None
        );
    }

    #[test]
    fn coalesces_bursts_by_kind() {
        let events = vec![
            WatchEvent::Content(PathBuf::from("/site/docs/a.mdx")),
            WatchEvent::Content(PathBuf::from("/site/docs/b.mdx")),
            WatchEvent::Sidebar(PathBuf::from("/site/sidebar.yml")),
            WatchEvent::Content(PathBuf::from("/site/docs/c.mdx")),
            WatchEvent::Sidebar(PathBuf::from("/site/sidebar.yml")),
        ];

        assert_eq!(
            coalesce(events),
            vec![
                WatchEvent::Content(PathBuf::from("/site/docs/a.mdx")),
                WatchEvent::Sidebar(PathBuf::from("/site/sidebar.yml")),
            ]
        );
    }

    #[tokio::test]
    async fn many_writes_produce_one_event() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        fs::create_dir_all(&docs).unwrap();

        let targets = WatchTargets {
            content_dirs: vec![docs.clone()],
            sidebar: temp.path().join("sidebar.yml"),
        };
        let (watcher, mut rx) = FileWatcher::new(&targets).unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;

        for i in 0..10 {
            fs::write(docs.join(format!("page-{i}.mdx")), "# Page").unwrap();
        }

        let first = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;
        assert!(matches!(first, Ok(Some(WatchEvent::Content(_)))));

        let second = tokio::time::timeout(Duration::from_millis(500), rx.recv()).await;
        drop(watcher);

        assert!(second.is_err(), "expected the burst to be coalesced");
    }

    #[tokio::test]
    async fn watches_content_changes() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        fs::create_dir_all(&docs).unwrap();

        let targets = WatchTargets {
            content_dirs: vec![docs.clone()],
            sidebar: temp.path().join("sidebar.yml"),
        };
        let (watcher, mut rx) = FileWatcher::new(&targets).unwrap();

        // Give inotify time to set up
        tokio::time::sleep(Duration::from_millis(100)).await;

        fs::write(docs.join("intro.mdx"), "# Created").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;

        drop(watcher);

        assert!(event.is_ok(), "timeout waiting for file watch event");
        assert!(
            matches!(event.unwrap(), Some(WatchEvent::Content(_))),
            "expected a content event"
        );
    }
}
