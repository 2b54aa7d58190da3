//! The active stylesheets of an application.
//!
//! Readers take a [`RegistrySnapshot`], an immutable view that stays valid
//! for as long as they hold it. Every change builds a new snapshot, swaps
//! it in and bumps the generation, so a reload is never observed half done.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use tessel_common::warning::clear_warnings;
use tracing::{debug, info};

use crate::config::ParseErrorDestination;
use crate::error::StyleError;
use crate::parser::{FsLoader, SourceLoader, StylesheetParser};
use crate::stylesheet::{Keyframe, Origin, Stylesheet};

/// The stylesheets in effect at one generation.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    generation: u64,
    stylesheets: BTreeMap<Origin, Arc<Stylesheet>>,
}

impl RegistrySnapshot {
    /// The generation this snapshot was published at.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The stylesheet installed for `origin`.
    #[must_use]
    pub fn stylesheet(&self, origin: Origin) -> Option<&Arc<Stylesheet>> {
        self.stylesheets.get(&origin)
    }

    /// Installed stylesheets, lowest origin first.
    pub fn stylesheets(&self) -> impl Iterator<Item = &Stylesheet> {
        self.stylesheets.values().map(Arc::as_ref)
    }

    /// Installed stylesheets, lowest origin first.
    #[must_use]
    pub fn active_stylesheets(&self) -> Vec<Arc<Stylesheet>> {
        self.stylesheets.values().cloned().collect()
    }
}

/// Owner of the application, user and view stylesheets.
///
/// Parsed files are kept by canonical path and origin, so loading the same
/// file again does not re-parse it until it is reloaded.
pub struct StylesheetRegistry {
    snapshot: RwLock<Arc<RegistrySnapshot>>,
    generation: AtomicU64,
    files: Mutex<HashMap<(PathBuf, Origin), Arc<Stylesheet>>>,
    loader: Arc<dyn SourceLoader>,
    error_destination: ParseErrorDestination,
}

impl fmt::Debug for StylesheetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StylesheetRegistry")
            .field("generation", &self.generation())
            .field("origins", &self.snapshot().stylesheets.keys())
            .field("files", &self.files.lock().len())
            .finish_non_exhaustive()
    }
}

impl Default for StylesheetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StylesheetRegistry {
    /// An empty registry reading files from disk.
    #[must_use]
    pub fn new() -> Self {
        Self::with_loader(Arc::new(FsLoader))
    }

    /// An empty registry reading sources through `loader`.
    #[must_use]
    pub fn with_loader(loader: Arc<dyn SourceLoader>) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(RegistrySnapshot::default())),
            generation: AtomicU64::new(0),
            files: Mutex::new(HashMap::new()),
            loader,
            error_destination: ParseErrorDestination::None,
        }
    }

    /// Report parse errors of every stylesheet loaded from now on to
    /// `destination`.
    #[must_use]
    pub const fn with_error_destination(mut self, destination: ParseErrorDestination) -> Self {
        self.error_destination = destination;
        self
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        Arc::clone(&self.snapshot.read())
    }

    /// Bumped on every change.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Parse `source` and install it for `origin`. Imports resolve against
    /// the working directory.
    pub fn load_source(&self, source: &str, origin: Origin) -> Arc<Stylesheet> {
        let sheet = StylesheetParser::new(self.loader.as_ref()).parse(source, origin, None);
        self.error_destination.report(&sheet);
        self.set_stylesheet(sheet)
    }

    /// Parse the file at `path`, or reuse its cached parse, and install it
    /// for `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::Import`] when the file cannot be read. Problems
    /// inside the file are recorded on the stylesheet instead.
    pub fn load_file(&self, path: &Path, origin: Origin) -> Result<Arc<Stylesheet>, StyleError> {
        let path = canonical(path);
        let cached = self.files.lock().get(&(path.clone(), origin)).cloned();
        let sheet = match cached {
            Some(sheet) => {
                debug!(path = %path.display(), "reusing parsed stylesheet");
                sheet
            }
            None => {
                let sheet = Arc::new(self.parse_file(&path, origin)?);
                let _ = self
                    .files
                    .lock()
                    .insert((path, origin), Arc::clone(&sheet));
                sheet
            }
        };
        self.update(|snapshot| {
            let _ = snapshot.stylesheets.insert(origin, Arc::clone(&sheet));
        });
        Ok(sheet)
    }

    /// Install `sheet` for its origin, replacing the previous one.
    pub fn set_stylesheet(&self, sheet: Stylesheet) -> Arc<Stylesheet> {
        let sheet = Arc::new(sheet);
        self.update(|snapshot| {
            let _ = snapshot.stylesheets.insert(sheet.origin(), Arc::clone(&sheet));
        });
        sheet
    }

    /// The stylesheet installed for `origin`.
    #[must_use]
    pub fn stylesheet(&self, origin: Origin) -> Option<Arc<Stylesheet>> {
        self.snapshot().stylesheet(origin).cloned()
    }

    /// Installed stylesheets, lowest origin first.
    #[must_use]
    pub fn active_stylesheets(&self) -> Vec<Arc<Stylesheet>> {
        self.snapshot().active_stylesheets()
    }

    /// Re-parse every installed stylesheet that is, or imports, the file at
    /// `path`, and swap them in together. Returns how many were replaced.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::Import`] when a root file can no longer be
    /// read; nothing is replaced in that case.
    pub fn reload(&self, path: &Path) -> Result<usize, StyleError> {
        let target = canonical(path);
        let snapshot = self.snapshot();
        let mut replaced = Vec::new();
        for (origin, sheet) in &snapshot.stylesheets {
            let Some(root) = sheet.file_path() else {
                continue;
            };
            let affected = canonical(root) == target
                || sheet.imported_files().iter().any(|f| canonical(f) == target);
            if affected {
                replaced.push((*origin, Arc::new(self.parse_file(root, *origin)?)));
            }
        }

        {
            let mut files = self.files.lock();
            files.retain(|(file, _), sheet| {
                *file != target && !sheet.imported_files().iter().any(|f| canonical(f) == target)
            });
            for (origin, sheet) in &replaced {
                if let Some(root) = sheet.file_path() {
                    let _ = files.insert((canonical(root), *origin), Arc::clone(sheet));
                }
            }
        }

        let count = replaced.len();
        if count > 0 {
            self.update(|snapshot| {
                for (origin, sheet) in replaced {
                    let _ = snapshot.stylesheets.insert(origin, sheet);
                }
            });
            clear_warnings();
            info!(path = %target.display(), stylesheets = count, "reloaded stylesheet");
        }
        Ok(count)
    }

    /// Remove the stylesheet installed for `origin`.
    pub fn clear_origin(&self, origin: Origin) {
        self.update(|snapshot| {
            let _ = snapshot.stylesheets.remove(&origin);
        });
    }

    /// Remove every stylesheet and forget every parsed file.
    pub fn clear(&self) {
        self.files.lock().clear();
        self.update(|snapshot| snapshot.stylesheets.clear());
    }

    /// Look up a keyframe animation, preferring higher origins.
    #[must_use]
    pub fn keyframe(&self, name: &str) -> Option<Keyframe> {
        self.snapshot()
            .stylesheets
            .values()
            .rev()
            .find_map(|sheet| sheet.keyframe(name).cloned())
    }

    /// Every file the installed stylesheets were read from.
    #[must_use]
    pub fn watched_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .snapshot()
            .stylesheets()
            .flat_map(|sheet| {
                sheet
                    .file_path()
                    .into_iter()
                    .chain(sheet.imported_files().iter().map(PathBuf::as_path))
                    .map(canonical)
                    .collect::<Vec<_>>()
            })
            .collect();
        paths.sort();
        paths.dedup();
        paths
    }

    fn parse_file(&self, path: &Path, origin: Origin) -> Result<Stylesheet, StyleError> {
        let sheet = Stylesheet::from_file_with_loader(path, origin, self.loader.as_ref())?;
        self.error_destination.report(&sheet);
        Ok(sheet)
    }

    fn update(&self, change: impl FnOnce(&mut RegistrySnapshot)) {
        let mut current = self.snapshot.write();
        let mut next = RegistrySnapshot::clone(&current);
        change(&mut next);
        next.generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(generation = next.generation, "published stylesheet snapshot");
        *current = Arc::new(next);
    }
}

/// The canonical form of `path`, or `path` itself when it does not exist
/// on disk (sources from a memory loader).
fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::MemoryLoader;

    #[test]
    fn test_generation_bumps_on_every_change() {
        let registry = StylesheetRegistry::new();
        assert_eq!(registry.generation(), 0);
        let _ = registry.load_source("Label { color: red; }", Origin::User);
        assert_eq!(registry.generation(), 1);
        registry.clear_origin(Origin::User);
        assert_eq!(registry.generation(), 2);
        assert!(registry.stylesheet(Origin::User).is_none());
    }

    #[test]
    fn test_load_file_reuses_parse() {
        let loader = MemoryLoader::new().with_file("/styles/app.css", "Label { color: red; }");
        let registry = StylesheetRegistry::with_loader(Arc::new(loader));
        let first = registry.load_file(Path::new("/styles/app.css"), Origin::Application);
        let second = registry.load_file(Path::new("/styles/app.css"), Origin::Application);
        assert!(matches!((first, second), (Ok(a), Ok(b)) if Arc::ptr_eq(&a, &b)));
    }

    #[test]
    fn test_missing_file_is_import_error() {
        let registry = StylesheetRegistry::with_loader(Arc::new(MemoryLoader::new()));
        let result = registry.load_file(Path::new("/nowhere.css"), Origin::View);
        assert!(matches!(result, Err(StyleError::Import { .. })));
        assert_eq!(registry.generation(), 0);
    }

    #[test]
    fn test_keyframe_prefers_higher_origin() {
        let registry = StylesheetRegistry::new();
        let _ = registry.load_source(
            "@keyframes pulse { from { opacity: 0; } }",
            Origin::Application,
        );
        let _ = registry.load_source(
            "@keyframes pulse { from { opacity: 1; } to { opacity: 0; } }",
            Origin::View,
        );
        let keyframe = registry.keyframe("pulse");
        assert!(keyframe.is_some_and(|k| k.blocks.len() == 2));
    }
}
