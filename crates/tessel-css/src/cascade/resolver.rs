use std::sync::Arc;

use parking_lot::RwLock;
use tessel_dom::Styleable;

use super::{CacheKey, CacheTag, MergedDeclarations, ResolutionCache, resolve};
use crate::config::StyleConfig;
use crate::registry::StylesheetRegistry;
use crate::selector::MatchContext;
use crate::stylesheet::{MediaContext, Stylesheet};

/// Resolves nodes against a [`StylesheetRegistry`], caching the results.
///
/// Results are keyed by node and state and tagged with the registry
/// generation and the media version, so any registry or media change makes
/// old entries unreachable.
/// Changes to a node itself are not noticed: after changing a node's id or
/// classes, call [`StyleResolver::invalidate`] or
/// [`StyleResolver::invalidate_descendants`].
#[derive(Debug)]
pub struct StyleResolver {
    registry: Arc<StylesheetRegistry>,
    cache: ResolutionCache,
    config: StyleConfig,
    media: RwLock<MediaState>,
}

#[derive(Debug)]
struct MediaState {
    context: MediaContext,
    version: u64,
}

impl StyleResolver {
    /// A resolver over `registry`.
    #[must_use]
    pub fn new(registry: Arc<StylesheetRegistry>, config: StyleConfig) -> Self {
        Self {
            registry,
            cache: ResolutionCache::new(config.style_cache_capacity),
            media: RwLock::new(MediaState {
                context: config.media.clone(),
                version: 0,
            }),
            config,
        }
    }

    /// The registry styles come from.
    #[must_use]
    pub const fn registry(&self) -> &Arc<StylesheetRegistry> {
        &self.registry
    }

    /// The configuration this resolver was built with.
    #[must_use]
    pub const fn configuration(&self) -> &StyleConfig {
        &self.config
    }

    /// The resolution cache.
    #[must_use]
    pub const fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// The device media queries are evaluated against.
    #[must_use]
    pub fn media(&self) -> MediaContext {
        self.media.read().context.clone()
    }

    /// Change the device, e.g. on rotation. Drops every cached result.
    pub fn set_media(&self, media: MediaContext) {
        let mut state = self.media.write();
        state.context = media;
        state.version += 1;
        drop(state);
        self.cache.clear();
    }

    /// The declarations that apply to `node` in `pseudo_state`.
    #[must_use]
    pub fn resolve<N: Styleable>(
        &self,
        node: &N,
        pseudo_state: Option<&str>,
    ) -> Arc<MergedDeclarations> {
        self.resolve_in(node, &MatchContext::with_state(pseudo_state))
    }

    /// The declarations that apply to `pseudo_element` of `node`.
    #[must_use]
    pub fn resolve_pseudo_element<N: Styleable>(
        &self,
        node: &N,
        pseudo_state: Option<&str>,
        pseudo_element: &str,
    ) -> Arc<MergedDeclarations> {
        let context = MatchContext {
            pseudo_state,
            pseudo_element: Some(pseudo_element),
        };
        self.resolve_in(node, &context)
    }

    /// Like [`StyleResolver::resolve`], with `inline` as the node's own
    /// stylesheet on top. Never cached.
    #[must_use]
    pub fn resolve_with_inline<N: Styleable>(
        &self,
        node: &N,
        pseudo_state: Option<&str>,
        inline: &Stylesheet,
    ) -> MergedDeclarations {
        let snapshot = self.registry.snapshot();
        let media = self.media.read();
        resolve(
            node,
            &MatchContext::with_state(pseudo_state),
            snapshot.stylesheets().chain(std::iter::once(inline)),
            &media.context,
        )
    }

    /// Forget cached results for `node`.
    pub fn invalidate<N: Styleable>(&self, node: &N) {
        self.cache.invalidate(node);
    }

    /// Forget cached results for `node` and everything below it.
    pub fn invalidate_descendants<N: Styleable>(&self, node: &N) {
        self.cache.invalidate_descendants(node);
    }

    /// Forget every cached result.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn resolve_in<N: Styleable>(
        &self,
        node: &N,
        context: &MatchContext<'_>,
    ) -> Arc<MergedDeclarations> {
        let snapshot = self.registry.snapshot();
        let media = self.media.read();
        if !self.config.cache_styles {
            return Arc::new(resolve(node, context, snapshot.stylesheets(), &media.context));
        }

        // The tag and the media used to resolve come from one read.
        let key = CacheKey::for_node(node, context);
        let tag = CacheTag {
            registry: snapshot.generation(),
            media: media.version,
        };
        if let Some(merged) = self.cache.get(&key, tag) {
            return merged;
        }
        let merged = Arc::new(resolve(node, context, snapshot.stylesheets(), &media.context));
        drop(media);
        self.cache.insert(key, tag, Arc::clone(&merged));
        merged
    }
}
