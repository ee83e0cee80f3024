use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// In-progress answers for one test attempt, keyed by question id.
///
/// Insertion-ordered. Ids are not checked against any document; the renderer
/// simply never looks up an id it did not produce.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerStore(IndexMap<String, String>);

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.0.get(question_id).map(String::as_str)
    }

    /// Overwrites any previous value. An existing id keeps its position.
    pub fn set(&mut self, question_id: impl Into<String>, value: impl Into<String>) {
        self.0.insert(question_id.into(), value.into());
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entries whose value is not blank.
    pub fn answered_count(&self) -> usize {
        self.0.values().filter(|v| !v.trim().is_empty()).count()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AnswerStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = AnswerStore::new();
        for (k, v) in iter {
            store.set(k, v);
        }
        store
    }
}
