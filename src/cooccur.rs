//! Co-occurrence aggregation
//!
//! One pass over per-post entity lists producing two tables: how many posts
//! each entity appears in, and how many posts each unordered entity pair
//! shares. A post's entity list is deduplicated before counting, so a post
//! mentioning the same entity twice counts once, and pairs are always
//! between distinct entities (no self-loops).

use std::collections::{BTreeSet, HashMap};

/// Frequency and pairwise co-occurrence counts over a post stream
#[derive(Debug, Default)]
pub struct CooccurrenceCounts {
    frequency: HashMap<String, u64>,
    pair_weights: HashMap<(String, String), u64>,
    posts_seen: u64,
}

impl CooccurrenceCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical unordered pair key: lexicographically ordered, so
    /// (u, v) and (v, u) land on the same entry
    pub fn pair_key(u: &str, v: &str) -> (String, String) {
        if u <= v {
            (u.to_string(), v.to_string())
        } else {
            (v.to_string(), u.to_string())
        }
    }

    /// Count one post's entity list
    pub fn observe(&mut self, entities: &[String]) {
        self.posts_seen += 1;

        // BTreeSet both deduplicates and yields entities in sorted order,
        // so the 2-combinations below are already canonical pairs
        let unique: BTreeSet<&str> = entities.iter().map(String::as_str).collect();

        for entity in &unique {
            *self.frequency.entry((*entity).to_string()).or_insert(0) += 1;
        }

        if unique.len() < 2 {
            return;
        }
        let sorted: Vec<&str> = unique.into_iter().collect();
        for i in 0..sorted.len() {
            for j in (i + 1)..sorted.len() {
                let key = (sorted[i].to_string(), sorted[j].to_string());
                *self.pair_weights.entry(key).or_insert(0) += 1;
            }
        }
    }

    /// Aggregate a finite sequence of per-post entity lists
    pub fn aggregate<I>(per_post: I) -> Self
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut counts = Self::new();
        for entities in per_post {
            counts.observe(&entities);
        }
        counts
    }

    /// Number of posts containing this entity at least once
    pub fn frequency(&self, entity: &str) -> u64 {
        self.frequency.get(entity).copied().unwrap_or(0)
    }

    /// Number of posts containing both entities
    pub fn pair_weight(&self, u: &str, v: &str) -> u64 {
        self.pair_weights
            .get(&Self::pair_key(u, v))
            .copied()
            .unwrap_or(0)
    }

    pub fn frequencies(&self) -> &HashMap<String, u64> {
        &self.frequency
    }

    pub fn pair_weights(&self) -> &HashMap<(String, String), u64> {
        &self.pair_weights
    }

    pub fn posts_seen(&self) -> u64 {
        self.posts_seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(entities: &[&str]) -> Vec<String> {
        entities.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_frequency_counts_posts_not_mentions() {
        let counts = CooccurrenceCounts::aggregate(vec![
            post(&["#x", "#x", "#y"]),
            post(&["#x"]),
        ]);
        // "#x" mentioned three times across two posts
        assert_eq!(counts.frequency("#x"), 2);
        assert_eq!(counts.frequency("#y"), 1);
        assert_eq!(counts.frequency("#missing"), 0);
    }

    #[test]
    fn test_pair_weight_counts_shared_posts() {
        let counts = CooccurrenceCounts::aggregate(vec![
            post(&["#x", "#y", "#z"]),
            post(&["#x", "#y"]),
            post(&["#z"]),
        ]);
        assert_eq!(counts.pair_weight("#x", "#y"), 2);
        assert_eq!(counts.pair_weight("#x", "#z"), 1);
        assert_eq!(counts.pair_weight("#y", "#z"), 1);
    }

    #[test]
    fn test_pair_key_canonical() {
        let counts = CooccurrenceCounts::aggregate(vec![post(&["#b", "#a"])]);
        // Both orderings resolve to the same entry
        assert_eq!(counts.pair_weight("#a", "#b"), 1);
        assert_eq!(counts.pair_weight("#b", "#a"), 1);
        assert_eq!(counts.pair_weights().len(), 1);
        assert!(counts.pair_weights().contains_key(&(
            "#a".to_string(),
            "#b".to_string()
        )));
    }

    #[test]
    fn test_no_self_pairs_from_repeated_mentions() {
        let counts = CooccurrenceCounts::aggregate(vec![post(&["#x", "#x"])]);
        assert_eq!(counts.frequency("#x"), 1);
        assert!(counts.pair_weights().is_empty());
    }

    #[test]
    fn test_single_entity_post_contributes_no_pairs() {
        let counts = CooccurrenceCounts::aggregate(vec![post(&["#solo"])]);
        assert_eq!(counts.frequency("#solo"), 1);
        assert!(counts.pair_weights().is_empty());
    }

    #[test]
    fn test_idempotent_under_rerun() {
        let input = vec![post(&["#x", "#y"]), post(&["#y", "#z"])];
        let a = CooccurrenceCounts::aggregate(input.clone());
        let b = CooccurrenceCounts::aggregate(input);
        assert_eq!(a.frequencies(), b.frequencies());
        assert_eq!(a.pair_weights(), b.pair_weights());
    }
}
