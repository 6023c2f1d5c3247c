//! In-memory relation provider for unit tests

use crate::error::{Error, Result};
use crate::provider::RelationProvider;
use crate::record::{NodeIdentity, PrimaryKey, Record, RecordType};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Adjacency-list provider; forward links are emitted before reverse links
#[derive(Default)]
pub(crate) struct MapProvider {
    forward: HashMap<NodeIdentity, Vec<Record>>,
    reverse: HashMap<NodeIdentity, Vec<Record>>,
    failing: HashSet<NodeIdentity>,
    calls: AtomicUsize,
}

impl MapProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A `test.node` record keyed by name
    pub fn record(&self, name: &str) -> Record {
        node(name)
    }

    pub fn link(self, from: &str, to: &str) -> Self {
        self.link_records(node(from), node(to))
    }

    pub fn reverse_link(mut self, from: &str, to: &str) -> Self {
        self.reverse
            .entry(node(from).identity())
            .or_default()
            .push(node(to));
        self
    }

    pub fn link_records(mut self, from: Record, to: Record) -> Self {
        self.forward.entry(from.identity()).or_default().push(to);
        self
    }

    pub fn fail_on(mut self, name: &str) -> Self {
        self.failing.insert(node(name).identity());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub(crate) fn node(name: &str) -> Record {
    Record::new(
        RecordType::parse("test.node").expect("static label"),
        PrimaryKey::Text(name.to_string()),
    )
}

#[async_trait]
impl RelationProvider for MapProvider {
    async fn related_of(&self, record: &Record, include_reverse: bool) -> Result<Vec<Record>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let identity = record.identity();
        if self.failing.contains(&identity) {
            return Err(Error::Integrity(format!("broken relation on {}", identity)));
        }

        let mut related = self.forward.get(&identity).cloned().unwrap_or_default();
        if include_reverse {
            related.extend(self.reverse.get(&identity).cloned().unwrap_or_default());
        }
        Ok(related)
    }
}
