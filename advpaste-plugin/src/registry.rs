//! Transform Registry

use crate::{Transform, TransformMeta};
use advpaste_core::start_case;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Listing entry for a registered transform
#[derive(Debug, Clone, Serialize)]
pub struct TransformSummary {
    pub name: String,
    /// `text`, `blob`, or the unsupported tag as declared
    pub kind: String,
    #[serde(flatten)]
    pub meta: TransformMeta,
}

/// Central transform registry, keyed by transform id
pub struct TransformRegistry {
    transforms: BTreeMap<String, Arc<dyn Transform>>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self {
            transforms: BTreeMap::new(),
        }
    }

    pub fn with_transform<T: Transform + 'static>(mut self, t: T) -> Self {
        self.insert(Arc::new(t));
        self
    }

    /// Register a transform under its own id, returning any transform it replaced
    pub fn insert(&mut self, t: Arc<dyn Transform>) -> Option<Arc<dyn Transform>> {
        let id = t.meta().id;
        self.transforms.insert(id, t)
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Transform>> {
        self.transforms.get(id).cloned()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.transforms.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Transform>)> {
        self.transforms.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn list(&self) -> Vec<TransformSummary> {
        self.transforms
            .values()
            .map(|t| summarize(t.as_ref()))
            .collect()
    }

    /// Ids similar to `id`, best match first (for error suggestions)
    pub fn find_similar(&self, id: &str) -> Vec<String> {
        rank_similar(id, self.ids())
    }
}

/// Candidates resembling `query`, best match first
pub fn rank_similar<'a>(query: &str, candidates: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let query_lower = query.to_lowercase();
    let mut matches: Vec<(String, usize)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let score = similarity_score(&query_lower, &candidate.to_lowercase());
            if score > 0 {
                Some((candidate.to_string(), score))
            } else {
                None
            }
        })
        .collect();

    matches.sort_by(|a, b| b.1.cmp(&a.1));
    matches.into_iter().map(|(name, _)| name).collect()
}

/// Calculate similarity score between two strings
fn similarity_score(query: &str, candidate: &str) -> usize {
    let mut score = 0;

    // Exact prefix match is best
    if candidate.starts_with(query) {
        score += 100;
    } else if candidate.contains(query) {
        score += 50;
    } else if query.contains(candidate) {
        score += 30;
    }

    let query_chars: std::collections::HashSet<char> = query.chars().collect();
    let candidate_chars: std::collections::HashSet<char> = candidate.chars().collect();
    let common = query_chars.intersection(&candidate_chars).count();
    score += common * 2;

    let len_diff = query.len().abs_diff(candidate.len());
    if len_diff < 5 && score > 0 {
        score += 5 - len_diff;
    }

    score
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of a transform with its start-cased display name
pub fn summarize(t: &dyn Transform) -> TransformSummary {
    let meta = t.meta();
    let kind = match t.kind() {
        Ok(kind) => kind.to_string(),
        Err(advpaste_core::PasteError::UnsupportedKind(tag)) => tag,
        Err(_) => "unknown".to_string(),
    };
    TransformSummary {
        name: start_case(&meta.id),
        kind,
        meta,
    }
}
