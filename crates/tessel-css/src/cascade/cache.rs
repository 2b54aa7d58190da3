use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tessel_dom::Styleable;
use tracing::trace;

use super::MergedDeclarations;
use crate::selector::MatchContext;

/// Identifies one resolution: which node, in which state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// [`Styleable::style_key`] of the node.
    pub style_key: String,
    /// The node's style id.
    pub style_id: Option<String>,
    /// The node's style classes, sorted.
    pub classes: Vec<String>,
    /// Requested pseudo-class state.
    pub pseudo_state: Option<String>,
    /// Requested pseudo-element.
    pub pseudo_element: Option<String>,
    /// The node's element name.
    pub element_name: String,
}

impl CacheKey {
    /// The key for resolving `node` under `context`.
    #[must_use]
    pub fn for_node<N: Styleable>(node: &N, context: &MatchContext<'_>) -> Self {
        let mut classes = node.style_classes().to_vec();
        classes.sort();
        Self {
            style_key: node.style_key(),
            style_id: node.style_id().map(str::to_string),
            classes,
            pseudo_state: context.pseudo_state.map(str::to_string),
            pseudo_element: context.pseudo_element.map(str::to_string),
            element_name: node.element_name().to_string(),
        }
    }

    fn is_at_or_below(&self, style_key: &str) -> bool {
        self.style_key
            .strip_prefix(style_key)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }
}

/// Hit and miss counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to resolve.
    pub misses: u64,
}

/// What a resolution was computed against: the registry generation and
/// the version of the media context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CacheTag {
    /// [`StylesheetRegistry::generation`](crate::StylesheetRegistry::generation).
    pub registry: u64,
    /// Bumped on every media change.
    pub media: u64,
}

impl From<u64> for CacheTag {
    fn from(registry: u64) -> Self {
        Self { registry, media: 0 }
    }
}

#[derive(Debug)]
struct CacheEntry {
    tag: CacheTag,
    merged: Arc<MergedDeclarations>,
}

/// Resolved declarations by [`CacheKey`].
///
/// Every entry remembers the [`CacheTag`] it was computed at and only
/// answers lookups for that tag. Entries are never dropped
/// because a node changed; callers invalidate explicitly.
#[derive(Debug)]
pub struct ResolutionCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResolutionCache {
    /// A cache holding at most `capacity` resolutions.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// The cached resolution for `key`, if it was computed at `tag`.
    #[must_use]
    pub fn get(
        &self,
        key: &CacheKey,
        tag: impl Into<CacheTag>,
    ) -> Option<Arc<MergedDeclarations>> {
        let tag = tag.into();
        let entries = self.entries.read();
        let found = entries
            .get(key)
            .filter(|entry| entry.tag == tag)
            .map(|entry| Arc::clone(&entry.merged));
        drop(entries);
        if found.is_some() {
            let _ = self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(
                style_key = %key.style_key,
                registry = tag.registry,
                media = tag.media,
                "style cache hit"
            );
        } else {
            let _ = self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(
                style_key = %key.style_key,
                registry = tag.registry,
                media = tag.media,
                "style cache miss"
            );
        }
        found
    }

    /// Store a resolution. When full, entries with other tags go first; if
    /// that frees nothing the cache starts over.
    pub fn insert(
        &self,
        key: CacheKey,
        tag: impl Into<CacheTag>,
        merged: Arc<MergedDeclarations>,
    ) {
        let tag = tag.into();
        let mut entries = self.entries.write();
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            entries.retain(|_, entry| entry.tag == tag);
            if entries.len() >= self.capacity {
                trace!(capacity = self.capacity, "style cache full, clearing");
                entries.clear();
            }
        }
        let _ = entries.insert(key, CacheEntry { tag, merged });
    }

    /// Drop every entry for `node`, in any state.
    pub fn invalidate<N: Styleable>(&self, node: &N) {
        let style_key = node.style_key();
        self.entries.write().retain(|key, _| key.style_key != style_key);
    }

    /// Drop every entry for `node` and its descendants.
    pub fn invalidate_descendants<N: Styleable>(&self, node: &N) {
        let style_key = node.style_key();
        self.entries
            .write()
            .retain(|key, _| !key.is_at_or_below(&style_key));
    }

    /// Drop everything.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of cached resolutions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Hit and miss counts since creation.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(style_key: &str) -> CacheKey {
        CacheKey {
            style_key: style_key.to_string(),
            style_id: None,
            classes: Vec::new(),
            pseudo_state: None,
            pseudo_element: None,
            element_name: "Label".to_string(),
        }
    }

    fn entry() -> Arc<MergedDeclarations> {
        Arc::new(MergedDeclarations::empty())
    }

    #[test]
    fn test_stale_generation_misses() {
        let cache = ResolutionCache::new(8);
        cache.insert(key("/a:0"), 1, entry());
        assert!(cache.get(&key("/a:0"), 1).is_some());
        assert!(cache.get(&key("/a:0"), 2).is_none());
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn test_prefix_match_respects_segments() {
        assert!(key("/a:0/b:1").is_at_or_below("/a:0"));
        assert!(key("/a:0").is_at_or_below("/a:0"));
        assert!(!key("/a:01").is_at_or_below("/a:0"));
    }

    #[test]
    fn test_overflow_evicts_stale_then_clears() {
        let cache = ResolutionCache::new(2);
        cache.insert(key("/a:0"), 1, entry());
        cache.insert(key("/b:0"), 2, entry());
        cache.insert(key("/c:0"), 2, entry());
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key("/b:0"), 2).is_some());

        cache.insert(key("/d:0"), 2, entry());
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key("/d:0"), 2).is_some());
    }

    #[test]
    fn test_media_version_is_part_of_the_tag() {
        let cache = ResolutionCache::new(8);
        let old = CacheTag { registry: 3, media: 0 };
        let new = CacheTag { registry: 3, media: 1 };
        cache.insert(key("/a:0"), old, entry());
        assert!(cache.get(&key("/a:0"), new).is_none());
        assert!(cache.get(&key("/a:0"), old).is_some());
    }
}
