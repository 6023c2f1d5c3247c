//! Bounded relational closure
//!
//! Breadth-first expansion of a seed set through a [`RelationProvider`],
//! deduplicated by [`NodeIdentity`] and capped at an object limit. On
//! overflow the unexplored boundary is handed to an [`ExcessProber`] so the
//! caller learns how far past the limit the closure actually goes.

use crate::config::DEFAULT_PROBE_LIMIT;
use crate::error::{Error, OverflowDiagnostic, Result};
use crate::probe::ExcessProber;
use crate::provider::RelationProvider;
use crate::record::{NodeIdentity, Record};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Closure request builder
#[derive(Debug, Clone)]
pub struct ClosureRequest {
    /// Seed records, in traversal order
    pub seeds: Vec<Record>,

    /// Follow reverse relations
    pub include_reverse: bool,

    /// Largest number of distinct records a successful closure may hold
    pub object_limit: usize,
}

impl ClosureRequest {
    pub fn new(seeds: Vec<Record>) -> Self {
        Self {
            seeds,
            include_reverse: false,
            object_limit: crate::config::DEFAULT_OBJECT_LIMIT,
        }
    }

    pub fn include_reverse(mut self, include_reverse: bool) -> Self {
        self.include_reverse = include_reverse;
        self
    }

    pub fn with_limit(mut self, object_limit: usize) -> Self {
        self.object_limit = object_limit;
        self
    }
}

/// Closure statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosureStats {
    pub nodes_visited: usize,
    pub duplicates_skipped: usize,
    pub edges_traversed: usize,
}

/// A complete closure
#[derive(Debug, Clone)]
pub struct Closure {
    /// Reached records, in breadth-first discovery order
    pub records: Vec<Record>,

    pub stats: ClosureStats,
}

impl Closure {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Builds bounded closures over a relation provider
pub struct ClosureBuilder<'a, P: ?Sized> {
    provider: &'a P,
    probe_limit: usize,
}

impl<'a, P: RelationProvider + ?Sized> ClosureBuilder<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            probe_limit: DEFAULT_PROBE_LIMIT,
        }
    }

    /// Budget for the excess probe run on overflow
    pub fn with_probe_limit(mut self, probe_limit: usize) -> Self {
        self.probe_limit = probe_limit;
        self
    }

    /// Compute the closure of `request.seeds`
    ///
    /// Fails with [`Error::ClosureOverflow`] as soon as the
    /// `object_limit + 1`-th distinct record is accepted; no partial result
    /// is returned.
    pub async fn build(&self, request: ClosureRequest) -> Result<Closure> {
        let ClosureRequest {
            seeds,
            include_reverse,
            object_limit,
        } = request;

        tracing::debug!(
            "Building closure: seeds={}, include_reverse={}, limit={}",
            seeds.len(),
            include_reverse,
            object_limit
        );

        let mut queue: VecDeque<Record> = seeds.into();
        let mut seen: HashSet<NodeIdentity> = HashSet::new();
        let mut ordered: Vec<Record> = Vec::new();
        let mut stats = ClosureStats::default();

        while let Some(current) = queue.pop_front() {
            let identity = current.identity();
            if seen.contains(&identity) {
                stats.duplicates_skipped += 1;
                continue;
            }

            // Materialized before `current` counts as seen: on overflow this
            // exact frontier seeds the probe.
            let frontier = self.provider.related_of(&current, include_reverse).await?;
            stats.edges_traversed += frontier.len();

            seen.insert(identity);
            ordered.push(current);
            stats.nodes_visited += 1;

            if seen.len() > object_limit {
                let pending: VecDeque<Record> = frontier.into_iter().chain(queue).collect();
                let outcome = ExcessProber::new(self.provider, include_reverse, self.probe_limit)
                    .probe(pending, &seen)
                    .await?;

                let diagnostic = OverflowDiagnostic {
                    limit: object_limit,
                    collected: seen.len() + outcome.extra,
                    at_least: outcome.truncated,
                };
                tracing::warn!("{}", diagnostic);
                return Err(Error::ClosureOverflow(diagnostic));
            }

            queue.extend(frontier);
        }

        tracing::debug!(
            "Closure complete: {} records, {} duplicates skipped, {} edges traversed",
            stats.nodes_visited,
            stats.duplicates_skipped,
            stats.edges_traversed
        );

        Ok(Closure {
            records: ordered,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{PrimaryKey, RecordType};
    use crate::testing::{node, MapProvider};

    fn names(closure: &Closure) -> Vec<String> {
        closure.records.iter().map(|r| r.pk.to_string()).collect()
    }

    fn overflow(err: Error) -> OverflowDiagnostic {
        match err {
            Error::ClosureOverflow(diagnostic) => diagnostic,
            other => panic!("expected overflow, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unrelated_seeds_deduplicated_in_order() {
        let provider = MapProvider::new();
        let seeds = vec![node("c"), node("a"), node("c"), node("b"), node("a")];

        let closure = ClosureBuilder::new(&provider)
            .build(ClosureRequest::new(seeds).with_limit(10))
            .await
            .unwrap();

        assert_eq!(names(&closure), vec!["c", "a", "b"]);
        assert_eq!(closure.stats.duplicates_skipped, 2);
    }

    #[tokio::test]
    async fn test_empty_seeds() {
        let provider = MapProvider::new();
        let closure = ClosureBuilder::new(&provider)
            .build(ClosureRequest::new(vec![]).with_limit(0))
            .await
            .unwrap();
        assert!(closure.is_empty());
    }

    #[tokio::test]
    async fn test_breadth_first_order() {
        // a -> b, a -> c, b -> d, c -> e
        let provider = MapProvider::new()
            .link("a", "b")
            .link("a", "c")
            .link("b", "d")
            .link("c", "e");

        let closure = ClosureBuilder::new(&provider)
            .build(ClosureRequest::new(vec![node("a")]).with_limit(10))
            .await
            .unwrap();

        assert_eq!(names(&closure), vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn test_cycles_terminate() {
        let provider = MapProvider::new()
            .link("self", "self")
            .link("a", "b")
            .link("b", "c")
            .link("c", "a");

        let closure = ClosureBuilder::new(&provider)
            .build(ClosureRequest::new(vec![node("self"), node("a")]).with_limit(10))
            .await
            .unwrap();

        assert_eq!(names(&closure), vec!["self", "a", "b", "c"]);
        // One provider call per distinct record
        assert_eq!(provider.calls(), 4);
    }

    #[tokio::test]
    async fn test_identity_includes_type() {
        let other = Record::new(
            RecordType::parse("test.other").unwrap(),
            PrimaryKey::Text("a".into()),
        );
        let provider = MapProvider::new().link_records(node("a"), other.clone());

        let closure = ClosureBuilder::new(&provider)
            .build(ClosureRequest::new(vec![node("a")]).with_limit(10))
            .await
            .unwrap();

        assert_eq!(closure.len(), 2);
        assert_eq!(closure.records[1].record_type, other.record_type);
    }

    #[tokio::test]
    async fn test_exact_limit_succeeds() {
        let provider = MapProvider::new().link("a", "b").link("b", "c");

        let closure = ClosureBuilder::new(&provider)
            .build(ClosureRequest::new(vec![node("a")]).with_limit(3))
            .await
            .unwrap();

        assert_eq!(closure.len(), 3);
    }

    #[tokio::test]
    async fn test_one_over_limit() {
        let provider = MapProvider::new().link("a", "b").link("b", "c");

        let err = ClosureBuilder::new(&provider)
            .with_probe_limit(1000)
            .build(ClosureRequest::new(vec![node("a")]).with_limit(2))
            .await
            .unwrap_err();

        let diagnostic = overflow(err);
        assert_eq!(diagnostic.limit, 2);
        assert_eq!(diagnostic.collected, 3);
        assert_eq!(diagnostic.exceeded_by(), 1);
        assert!(!diagnostic.at_least);
    }

    #[tokio::test]
    async fn test_zero_limit_overflows_on_first_seed() {
        let provider = MapProvider::new();

        let diagnostic = overflow(
            ClosureBuilder::new(&provider)
                .build(ClosureRequest::new(vec![node("a"), node("b")]).with_limit(0))
                .await
                .unwrap_err(),
        );

        // Pending records are expanded by the probe, never counted themselves
        assert_eq!(diagnostic.collected, 1);
        assert!(!diagnostic.at_least);
    }

    #[tokio::test]
    async fn test_root_with_two_items_overflows_at_first_item() {
        let provider = MapProvider::new().link("root", "i1").link("root", "i2");

        let diagnostic = overflow(
            ClosureBuilder::new(&provider)
                .build(ClosureRequest::new(vec![node("root")]).with_limit(1))
                .await
                .unwrap_err(),
        );

        assert_eq!(diagnostic.collected, 2);
        assert!(!diagnostic.at_least);
    }

    #[tokio::test]
    async fn test_excess_count_expands_frontier_of_overflowing_node() {
        // Overflow fires on b; only b's frontier (c, d) leads on to e
        let provider = MapProvider::new()
            .link("a", "b")
            .link("b", "c")
            .link("b", "d")
            .link("d", "e");

        let diagnostic = overflow(
            ClosureBuilder::new(&provider)
                .build(ClosureRequest::new(vec![node("a")]).with_limit(1))
                .await
                .unwrap_err(),
        );

        assert_eq!(diagnostic.collected, 3);
        assert_eq!(diagnostic.exceeded_by(), 2);
        assert!(!diagnostic.at_least);
    }

    #[tokio::test]
    async fn test_truncated_excess_count_reports_lower_bound() {
        let mut provider = MapProvider::new().link("a", "hub").link("hub", "mid");
        for i in 0..20 {
            provider = provider.link("mid", &format!("leaf{i}"));
        }

        let diagnostic = overflow(
            ClosureBuilder::new(&provider)
                .with_probe_limit(5)
                .build(ClosureRequest::new(vec![node("a")]).with_limit(1))
                .await
                .unwrap_err(),
        );

        assert!(diagnostic.at_least);
        // limit + 1 seen records, plus exactly the probe budget
        assert_eq!(diagnostic.collected, 1 + 1 + 5);
    }

    #[tokio::test]
    async fn test_excess_count_expands_remaining_queue() {
        // Overflow fires on seed a, which has no relations; y and z are only
        // reachable from the still-queued seed x
        let provider = MapProvider::new().link("x", "y").link("y", "z");
        let request = || ClosureRequest::new(vec![node("a"), node("x")]).with_limit(0);

        let exact = overflow(
            ClosureBuilder::new(&provider)
                .build(request())
                .await
                .unwrap_err(),
        );
        assert_eq!(exact.collected, 3);
        assert!(!exact.at_least);

        let bounded = overflow(
            ClosureBuilder::new(&provider)
                .with_probe_limit(2)
                .build(request())
                .await
                .unwrap_err(),
        );
        assert_eq!(bounded.collected, 3);
        assert!(bounded.at_least);
    }

    #[tokio::test]
    async fn test_excess_count_takes_frontier_before_queue() {
        // Budget 1 is spent on c, found through a's frontier; the queued
        // seed x would fail if it were expanded first
        let provider = MapProvider::new()
            .link("a", "b")
            .link("b", "c")
            .fail_on("x");

        let diagnostic = overflow(
            ClosureBuilder::new(&provider)
                .with_probe_limit(1)
                .build(ClosureRequest::new(vec![node("a"), node("x")]).with_limit(0))
                .await
                .unwrap_err(),
        );

        assert_eq!(diagnostic.collected, 2);
        assert!(diagnostic.at_least);
    }

    #[tokio::test]
    async fn test_forward_then_reverse_back_reference() {
        let provider = MapProvider::new().link("a", "b").reverse_link("b", "a");

        let closure = ClosureBuilder::new(&provider)
            .build(
                ClosureRequest::new(vec![node("a")])
                    .include_reverse(true)
                    .with_limit(5),
            )
            .await
            .unwrap();

        assert_eq!(names(&closure), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_reverse_links_skipped_without_flag() {
        let provider = MapProvider::new().reverse_link("a", "b");

        let closure = ClosureBuilder::new(&provider)
            .build(ClosureRequest::new(vec![node("a")]).with_limit(5))
            .await
            .unwrap();

        assert_eq!(names(&closure), vec!["a"]);
    }

    #[tokio::test]
    async fn test_provider_errors_propagate() {
        let provider = MapProvider::new().link("a", "b").fail_on("b");

        let err = ClosureBuilder::new(&provider)
            .build(ClosureRequest::new(vec![node("a")]).with_limit(5))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Integrity(_)));
    }
}
