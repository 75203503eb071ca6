//! Thread-safe wrapper around the deduplication registry.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::dedup::service::{ArtifactReference, AssetDeduplicator, Resolution, TemplateDocument};

/// Registry handle for renderers running on several threads.
///
/// Lookup and insert happen under one lock, so two threads resolving the same
/// content for the first time still end up with a single artifact.
#[derive(Debug, Clone, Default)]
pub struct SharedDeduplicator {
    inner: Arc<Mutex<AssetDeduplicator>>,
}

impl SharedDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `document` against the shared registry.
    pub fn resolve(&self, document: &TemplateDocument) -> ArtifactReference {
        self.lock().resolve(document)
    }

    /// Resolve and report whether this call created the artifact.
    pub fn resolve_with_status(&self, document: &TemplateDocument) -> Resolution {
        self.lock().resolve_with_status(document)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Take the registry back once all other handles are dropped.
    ///
    /// Returns `None` while clones of this handle are still alive.
    pub fn into_inner(self) -> Option<AssetDeduplicator> {
        Arc::try_unwrap(self.inner)
            .ok()
            .map(|mutex| mutex.into_inner().unwrap_or_else(PoisonError::into_inner))
    }

    // A panic in another renderer leaves the registry consistent: every
    // mutation is a single insert followed by a push.
    fn lock(&self) -> MutexGuard<'_, AssetDeduplicator> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<AssetDeduplicator> for SharedDeduplicator {
    fn from(dedup: AssetDeduplicator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(dedup)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_concurrent_first_seen_inserts_create_one_artifact() {
        let shared = SharedDeduplicator::new();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let document =
                        TemplateDocument::new(format!("v{i}.json"), b"same template".to_vec());
                    shared.resolve_with_status(&document)
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results.iter().filter(|r| r.created).count(), 1);
        assert!(results.windows(2).all(|w| w[0].reference == w[1].reference));
        assert_eq!(shared.len(), 1);
    }

    #[test]
    fn test_into_inner_after_handles_dropped() {
        let shared = SharedDeduplicator::new();
        let clone = shared.clone();
        clone.resolve(&TemplateDocument::new("a.json", b"a".to_vec()));
        drop(clone);

        let dedup = shared.into_inner().unwrap();
        assert_eq!(dedup.len(), 1);
    }

    #[test]
    fn test_into_inner_with_live_clone() {
        let shared = SharedDeduplicator::new();
        let _clone = shared.clone();
        assert!(shared.into_inner().is_none());
    }
}
