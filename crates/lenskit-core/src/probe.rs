//! Bounded excess probe run after a closure overflows

use crate::error::Result;
use crate::provider::RelationProvider;
use crate::record::{NodeIdentity, Record};
use std::collections::{HashSet, VecDeque};

/// Result of an excess probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Additional distinct records found beyond the baseline
    pub extra: usize,

    /// Budget ran out with work remaining; `extra` is a lower bound
    pub truncated: bool,
}

/// Counts how many records lie beyond an overflowed closure
///
/// Works on private copies of the pending queue and the seen-set, so the
/// interrupted build is left untouched.
pub struct ExcessProber<'a, P: ?Sized> {
    provider: &'a P,
    include_reverse: bool,
    probe_limit: usize,
}

impl<'a, P: RelationProvider + ?Sized> ExcessProber<'a, P> {
    pub fn new(provider: &'a P, include_reverse: bool, probe_limit: usize) -> Self {
        Self {
            provider,
            include_reverse,
            probe_limit,
        }
    }

    /// Breadth-first count of distinct records reachable from `pending`
    /// that are not already in `baseline_seen`, capped at the probe limit
    pub async fn probe(
        &self,
        pending: VecDeque<Record>,
        baseline_seen: &HashSet<NodeIdentity>,
    ) -> Result<ProbeOutcome> {
        let mut queue = pending;
        let mut local_seen = baseline_seen.clone();
        let mut extra = 0;
        let mut exhausted = false;

        'probe: while extra < self.probe_limit {
            let Some(record) = queue.pop_front() else {
                break;
            };

            for related in self
                .provider
                .related_of(&record, self.include_reverse)
                .await?
            {
                if !local_seen.insert(related.identity()) {
                    continue;
                }
                extra += 1;
                if extra >= self.probe_limit {
                    // The record that hit the budget is never expanded
                    exhausted = true;
                    break 'probe;
                }
                queue.push_back(related);
            }
        }

        let truncated = exhausted || !queue.is_empty();
        tracing::debug!(
            "Excess probe counted {} extra records (truncated: {}, limit: {})",
            extra,
            truncated,
            self.probe_limit
        );

        Ok(ProbeOutcome { extra, truncated })
    }
}
