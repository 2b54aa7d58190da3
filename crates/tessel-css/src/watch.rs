//! Hot reload of stylesheet files.
//!
//! The watcher follows every file the registry's stylesheets were read
//! from, imports included. Changes are queued by the notify thread and
//! applied by whoever owns the watcher, through [`StylesheetRegistry::reload`].
//!
//! Directories are watched rather than the files themselves, so a file
//! replaced by rename (how many editors save) keeps being followed.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, channel};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use crate::registry::StylesheetRegistry;

/// Reloads registry stylesheets when their files change.
pub struct StylesheetWatcher {
    watcher: RecommendedWatcher,
    receiver: Receiver<PathBuf>,
    registry: Arc<StylesheetRegistry>,
    watched: Vec<PathBuf>,
    directories: Vec<PathBuf>,
}

impl StylesheetWatcher {
    /// Watch every file currently loaded into `registry`.
    ///
    /// # Errors
    ///
    /// Returns the notify error if the platform watcher cannot be created or
    /// a directory cannot be watched.
    pub fn new(registry: Arc<StylesheetRegistry>) -> notify::Result<Self> {
        let (sender, receiver) = channel();
        let watcher = RecommendedWatcher::new(
            move |result: notify::Result<Event>| {
                let Ok(event) = result else {
                    return;
                };
                if matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                ) {
                    for path in event.paths {
                        let _ = sender.send(path);
                    }
                }
            },
            Config::default(),
        )?;
        let mut watcher = Self {
            watcher,
            receiver,
            registry,
            watched: Vec::new(),
            directories: Vec::new(),
        };
        watcher.sync()?;
        Ok(watcher)
    }

    /// Bring the watched set in line with the registry, e.g. after loading
    /// another file.
    ///
    /// # Errors
    ///
    /// Returns the notify error if a directory cannot be watched.
    pub fn sync(&mut self) -> notify::Result<()> {
        let paths = self.registry.watched_paths();
        let mut directories: Vec<PathBuf> = paths
            .iter()
            .filter_map(|path| path.parent().map(Path::to_path_buf))
            .collect();
        directories.sort();
        directories.dedup();

        for directory in directories.iter().filter(|d| !self.directories.contains(d)) {
            self.watcher.watch(directory, RecursiveMode::NonRecursive)?;
            debug!(directory = %directory.display(), "watching stylesheet directory");
        }
        for directory in self.directories.iter().filter(|d| !directories.contains(d)) {
            // The directory may already be gone.
            let _ = self.watcher.unwatch(directory);
        }
        self.watched = paths;
        self.directories = directories;
        Ok(())
    }

    /// Files being watched.
    #[must_use]
    pub fn watched_paths(&self) -> &[PathBuf] {
        &self.watched
    }

    /// Apply queued changes without blocking. Returns how many stylesheets
    /// were replaced.
    pub fn process_pending(&mut self) -> usize {
        let changed: Vec<PathBuf> = self.receiver.try_iter().collect();
        self.apply(changed)
    }

    /// Wait up to `timeout` for a change, then apply everything queued.
    /// Returns how many stylesheets were replaced.
    pub fn wait(&mut self, timeout: Duration) -> usize {
        match self.receiver.recv_timeout(timeout) {
            Ok(first) => {
                let mut changed = vec![first];
                changed.extend(self.receiver.try_iter());
                self.apply(changed)
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => 0,
        }
    }

    fn apply(&mut self, mut changed: Vec<PathBuf>) -> usize {
        if changed.is_empty() {
            return 0;
        }
        changed.sort();
        changed.dedup();
        let mut replaced = 0;
        for path in &changed {
            if !self.watched.contains(path) {
                continue;
            }
            // Removed, or mid-replace: the create that follows reloads it.
            if !path.exists() {
                debug!(path = %path.display(), "stylesheet missing, waiting for it to return");
                continue;
            }
            match self.registry.reload(path) {
                Ok(count) => replaced += count,
                Err(error) => warn!(path = %path.display(), "reload failed: {error}"),
            }
        }
        if let Err(error) = self.sync() {
            warn!("cannot update watched stylesheets: {error}");
        }
        replaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylesheet::{Declaration, Origin};

    #[test]
    fn test_watches_loaded_files_and_imports() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.css");
        let app = dir.path().join("app.css");
        std::fs::write(&base, "Label { color: red; }").unwrap();
        std::fs::write(&app, "@import \"base.css\";\nButton { color: blue; }").unwrap();

        let registry = Arc::new(StylesheetRegistry::new());
        let _ = registry.load_file(&app, Origin::Application).unwrap();
        let watcher = StylesheetWatcher::new(Arc::clone(&registry)).unwrap();
        assert_eq!(watcher.watched_paths().len(), 2);
        assert_eq!(watcher.directories.len(), 1);
    }

    fn first_color(registry: &StylesheetRegistry) -> Option<String> {
        let sheet = registry.stylesheet(Origin::Application)?;
        let rule_set = sheet.rule_sets().first()?;
        rule_set.declarations().get("color").map(Declaration::value_text)
    }

    /// Replace `path` the way editors that save atomically do.
    fn save_by_rename(path: &Path, text: &str) {
        let temp = path.with_extension("css.tmp");
        std::fs::write(&temp, text).unwrap();
        std::fs::rename(&temp, path).unwrap();
    }

    fn wait_for_color(
        watcher: &mut StylesheetWatcher,
        registry: &StylesheetRegistry,
        color: &str,
    ) -> bool {
        let deadline = std::time::Instant::now() + Duration::from_secs(10);
        while std::time::Instant::now() < deadline {
            let _ = watcher.wait(Duration::from_millis(100));
            if first_color(registry).as_deref() == Some(color) {
                return true;
            }
        }
        false
    }

    #[test]
    fn test_reload_survives_replace_by_rename() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("app.css");
        std::fs::write(&app, "Label { color: red; }").unwrap();

        let registry = Arc::new(StylesheetRegistry::new());
        let _ = registry.load_file(&app, Origin::Application).unwrap();
        let mut watcher = StylesheetWatcher::new(Arc::clone(&registry)).unwrap();

        save_by_rename(&app, "Label { color: green; }");
        assert!(wait_for_color(&mut watcher, &registry, "green"));

        save_by_rename(&app, "Label { color: blue; }");
        assert!(wait_for_color(&mut watcher, &registry, "blue"));
    }

    #[test]
    fn test_unrelated_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("app.css");
        std::fs::write(&app, "Label { color: red; }").unwrap();

        let registry = Arc::new(StylesheetRegistry::new());
        let _ = registry.load_file(&app, Origin::Application).unwrap();
        let mut watcher = StylesheetWatcher::new(Arc::clone(&registry)).unwrap();
        let generation = registry.generation();

        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        assert_eq!(watcher.wait(Duration::from_millis(300)), 0);
        assert_eq!(registry.generation(), generation);
    }
}
