//! Result cache
//!
//! Maps exact query strings to the result sets a successful lookup returned.
//! Entries never expire; they are removed one at a time or all at once.

use std::collections::HashMap;

use crate::ResultSet;

#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<String, ResultSet>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, query: &str) -> Option<&ResultSet> {
        self.entries.get(query)
    }

    /// Store results for a query, replacing any previous entry
    pub fn put(&mut self, query: impl Into<String>, results: ResultSet) {
        self.entries.insert(query.into(), results);
    }

    pub fn remove(&mut self, query: &str) {
        self.entries.remove(query);
    }

    /// Drop every entry. Safe to call repeatedly.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, query: &str) -> bool {
        self.entries.contains_key(query)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_new_cache_is_empty() {
        let cache = ResultCache::new();
        assert!(cache.is_empty());
        assert!(cache.get("cat").is_none());
    }

    #[test]
    fn test_put_then_get() {
        let mut cache = ResultCache::new();
        cache.put("cat", vec![json!("Catalog"), json!("Category")]);

        assert_eq!(
            cache.get("cat"),
            Some(&vec![json!("Catalog"), json!("Category")])
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_put_overwrites_existing_entry() {
        let mut cache = ResultCache::new();
        cache.put("cat", vec![json!("old")]);
        cache.put("cat", vec![json!("new")]);

        assert_eq!(cache.get("cat"), Some(&vec![json!("new")]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_are_exact() {
        let mut cache = ResultCache::new();
        cache.put("cat", vec![json!(1)]);

        assert!(cache.get("Cat").is_none());
        assert!(cache.get("cat ").is_none());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cache = ResultCache::new();
        cache.put("cat", vec![]);
        cache.remove("dog");
        assert!(cache.contains("cat"));
    }

    #[test]
    fn test_remove_single_entry() {
        let mut cache = ResultCache::new();
        cache.put("cat", vec![]);
        cache.put("dog", vec![]);
        cache.remove("cat");

        assert!(!cache.contains("cat"));
        assert!(cache.contains("dog"));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut cache = ResultCache::new();
        cache.put("cat", vec![]);
        cache.clear();
        cache.clear();
        assert!(cache.is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_last_put_wins(query in "[a-z]{1,8}", values in prop::collection::vec(0i64..100, 1..6)) {
            let mut cache = ResultCache::new();
            for value in &values {
                cache.put(query.clone(), vec![json!(value)]);
            }

            let last = *values.last().unwrap();
            prop_assert_eq!(cache.get(&query), Some(&vec![json!(last)]));
            prop_assert_eq!(cache.len(), 1);
        }
    }
}
