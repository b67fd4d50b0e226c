use super::{MarkdownRenderer, StyledDocument};
use lru::LruCache;
use parking_lot::Mutex;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    content_hash: u64,
    content_len: usize,
    width: usize,
    theme: &'static str,
}

impl CacheKey {
    fn new(content: &str, width: usize, theme: &'static str) -> Self {
        let mut hasher = DefaultHasher::new();
        content.hash(&mut hasher);
        Self {
            content_hash: hasher.finish(),
            content_len: content.len(),
            width,
            theme,
        }
    }
}

/// Memoizes rendered documents by content, width and theme.
///
/// A capacity of zero disables caching; every lookup renders afresh.
pub struct RenderCache {
    entries: Option<Mutex<LruCache<CacheKey, Arc<StyledDocument>>>>,
}

impl RenderCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
        }
    }

    /// Return the cached document for `(content, width)` or render and store it.
    pub fn get_or_render(
        &self,
        renderer: &MarkdownRenderer,
        content: &str,
        width: usize,
    ) -> Arc<StyledDocument> {
        let Some(entries) = &self.entries else {
            return Arc::new(renderer.render(content, width));
        };

        let key = CacheKey::new(content, width, renderer.theme_id());
        if let Some(document) = entries.lock().get(&key) {
            trace!(width, "render cache hit");
            return Arc::clone(document);
        }

        trace!(width, bytes = content.len(), "render cache miss");
        let document = Arc::new(renderer.render(content, width));
        entries.lock().put(key, Arc::clone(&document));
        document
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| entries.lock().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached document, e.g. after a theme switch.
    pub fn clear(&self) {
        if let Some(entries) = &self.entries {
            entries.lock().clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::Theme;

    #[test]
    fn test_hit_returns_same_document() {
        let renderer = MarkdownRenderer::with_theme(&Theme::default());
        let cache = RenderCache::new(4);
        let first = cache.get_or_render(&renderer, "hello world", 20);
        let second = cache.get_or_render(&renderer, "hello world", 20);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_width_is_part_of_key() {
        let renderer = MarkdownRenderer::with_theme(&Theme::default());
        let cache = RenderCache::new(4);
        let wide = cache.get_or_render(&renderer, "one two three", 40);
        let narrow = cache.get_or_render(&renderer, "one two three", 5);
        assert_eq!(wide.len(), 1);
        assert_eq!(narrow.len(), 3);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let renderer = MarkdownRenderer::with_theme(&Theme::default());
        let cache = RenderCache::new(1);
        let first = cache.get_or_render(&renderer, "a", 10);
        cache.get_or_render(&renderer, "b", 10);
        let again = cache.get_or_render(&renderer, "a", 10);
        assert!(!Arc::ptr_eq(&first, &again));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let renderer = MarkdownRenderer::with_theme(&Theme::default());
        let cache = RenderCache::new(0);
        cache.get_or_render(&renderer, "a", 10);
        assert!(cache.is_empty());
        cache.clear();
    }
}
