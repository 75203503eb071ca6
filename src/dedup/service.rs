//! Content-addressed asset deduplication.
//!
//! Every rendered template is fingerprinted, and each distinct fingerprint is
//! assigned exactly one [`ArtifactReference`] for the lifetime of a synthesis
//! pass. Templates that render to identical bytes share that reference.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dedup::hash::{fingerprint, Fingerprint};

/// One rendered template, ready to be packaged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDocument {
    file_name: String,
    bytes: Vec<u8>,
    fingerprint: Fingerprint,
}

impl TemplateDocument {
    /// Wrap rendered bytes. `file_name` is only used if this document is the
    /// first of its content to be resolved; it never affects the fingerprint.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let fingerprint = fingerprint(&bytes);
        Self {
            file_name: file_name.into(),
            bytes,
            fingerprint,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }
}

/// How an artifact is packaged for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Packaging {
    #[default]
    File,
}

/// Handle to the single packaged artifact for one fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactReference {
    /// Asset id; content addressed, so equal to the fingerprint.
    pub id: String,
    pub fingerprint: Fingerprint,
    /// Packaged file name, taken from the first document seen with this content.
    pub file_name: String,
    pub packaging: Packaging,
}

/// Outcome of a single resolve call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub reference: ArtifactReference,
    /// True when this call registered a new reference.
    pub created: bool,
}

/// Fingerprint → artifact registry for one synthesis pass.
#[derive(Debug, Default)]
pub struct AssetDeduplicator {
    index: HashMap<Fingerprint, usize>,
    references: Vec<ArtifactReference>,

    // Statistics
    lookups: u64,
    hits: u64,
}

impl AssetDeduplicator {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the artifact for `document`, registering one on first sight.
    pub fn resolve(&mut self, document: &TemplateDocument) -> ArtifactReference {
        self.resolve_with_status(document).reference
    }

    /// Like [`resolve`](Self::resolve), but also reports whether a new
    /// artifact was created so callers can stage its payload exactly once.
    pub fn resolve_with_status(&mut self, document: &TemplateDocument) -> Resolution {
        self.lookups += 1;

        if let Some(&slot) = self.index.get(document.fingerprint()) {
            self.hits += 1;
            let reference = self.references[slot].clone();
            tracing::debug!(
                "Reusing artifact {} for {}",
                reference.file_name,
                document.file_name()
            );
            return Resolution {
                reference,
                created: false,
            };
        }

        let reference = ArtifactReference {
            id: document.fingerprint().to_string(),
            fingerprint: document.fingerprint().clone(),
            file_name: document.file_name().to_string(),
            packaging: Packaging::File,
        };
        tracing::debug!(
            "Registered artifact {} ({})",
            reference.file_name,
            reference.fingerprint.short()
        );

        self.index
            .insert(document.fingerprint().clone(), self.references.len());
        self.references.push(reference.clone());

        Resolution {
            reference,
            created: true,
        }
    }

    /// Look up an existing artifact without registering anything.
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&ArtifactReference> {
        self.index.get(fingerprint).map(|&slot| &self.references[slot])
    }

    /// Registered artifacts in first-seen order.
    pub fn references(&self) -> &[ArtifactReference] {
        &self.references
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Number of resolve calls made.
    pub fn lookups(&self) -> u64 {
        self.lookups
    }

    /// Number of resolve calls answered by an existing artifact.
    pub fn duplicates_found(&self) -> u64 {
        self.hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, content: &str) -> TemplateDocument {
        TemplateDocument::new(name, content.as_bytes().to_vec())
    }

    #[test]
    fn test_identical_bytes_share_reference() {
        let mut dedup = AssetDeduplicator::new();
        let a = dedup.resolve(&doc("a.json", "{}"));
        let b = dedup.resolve(&doc("b.json", "{}"));

        assert_eq!(a, b);
        assert_eq!(b.file_name, "a.json");
        assert_eq!(dedup.len(), 1);
    }

    #[test]
    fn test_different_bytes_get_distinct_references() {
        let mut dedup = AssetDeduplicator::new();
        let a = dedup.resolve(&doc("a.json", r#"{"v":1}"#));
        let b = dedup.resolve(&doc("b.json", r#"{"v":2}"#));

        assert_ne!(a, b);
        assert_ne!(a.id, b.id);
        assert_eq!(dedup.len(), 2);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut dedup = AssetDeduplicator::new();
        let document = doc("a.json", "content");

        let first = dedup.resolve_with_status(&document);
        let second = dedup.resolve_with_status(&document);

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.reference, second.reference);
        assert_eq!(dedup.len(), 1);
    }

    #[test]
    fn test_a_b_a_yields_two_references() {
        let mut dedup = AssetDeduplicator::new();
        let a = doc("a.json", "A");
        let b = doc("b.json", "B");

        let refs: Vec<_> = [&a, &b, &a].iter().map(|d| dedup.resolve(d)).collect();

        assert_eq!(dedup.len(), 2);
        assert_eq!(refs[0], refs[2]);
        assert_ne!(refs[0], refs[1]);
        assert_eq!(dedup.lookups(), 3);
        assert_eq!(dedup.duplicates_found(), 1);
    }

    #[test]
    fn test_k_groups_in_any_order_make_k_references() {
        let docs: Vec<_> = ["x", "y", "x", "z", "y", "x"]
            .iter()
            .enumerate()
            .map(|(i, c)| doc(&format!("{i}.json"), c))
            .collect();

        let mut forward = AssetDeduplicator::new();
        docs.iter().for_each(|d| {
            forward.resolve(d);
        });

        let mut backward = AssetDeduplicator::new();
        docs.iter().rev().for_each(|d| {
            backward.resolve(d);
        });

        assert_eq!(forward.len(), 3);
        assert_eq!(backward.len(), 3);
    }

    #[test]
    fn test_id_is_fingerprint() {
        let mut dedup = AssetDeduplicator::new();
        let document = doc("a.json", "hello");
        let reference = dedup.resolve(&document);

        assert_eq!(reference.id, document.fingerprint().as_str());
        assert_eq!(dedup.get(document.fingerprint()), Some(&reference));
    }

    #[test]
    fn test_references_keep_first_seen_order() {
        let mut dedup = AssetDeduplicator::new();
        dedup.resolve(&doc("second.json", "2"));
        dedup.resolve(&doc("first.json", "1"));
        dedup.resolve(&doc("again.json", "2"));

        let names: Vec<_> = dedup.references().iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(names, vec!["second.json", "first.json"]);
    }
}
