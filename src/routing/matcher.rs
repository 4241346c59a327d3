//! Label-set matching against the compiled routing table.
//!
//! # Responsibilities
//! - Canonicalize an incoming label set (lowercase, dedupe, sort)
//! - Drop ignored labels
//! - Resolve the canonical key to a flavor, or report no match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) lookup via HashMap, whatever the number of labels
//! - Empty request = default flavor, never a table entry
//! - A request made only of ignored labels is not empty and has no route
//! - Unknown labels are a hard miss: no partial credit

use std::collections::HashMap;

use crate::routing::error::NoMatchError;
use crate::routing::flavor::Flavor;
use crate::routing::labels::{normalize, Label, LabelSet};

/// Immutable map from canonical label combinations to flavors.
///
/// Built by [`TableBuilder`](crate::routing::TableBuilder). Every key is a
/// non-empty, sorted, duplicate-free slice of lowercase labels.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    entries: HashMap<Box<[Label]>, Flavor>,
    default_flavor: Flavor,
    flavors: Vec<Flavor>,
    ignore_labels: LabelSet,
}

impl RoutingTable {
    pub(crate) fn new(
        entries: HashMap<Box<[Label]>, Flavor>,
        default_flavor: Flavor,
        flavors: Vec<Flavor>,
        ignore_labels: LabelSet,
    ) -> Self {
        Self {
            entries,
            default_flavor,
            flavors,
            ignore_labels,
        }
    }

    /// Resolve a job's labels to a flavor.
    ///
    /// Labels are matched case-insensitively. An empty set resolves to the
    /// default flavor; a set made up only of ignored labels has no route.
    pub fn match_labels<I>(&self, labels: I) -> Result<&Flavor, NoMatchError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let labels = normalize(labels);
        if labels.is_empty() {
            return Ok(&self.default_flavor);
        }

        let key: Vec<Label> = labels
            .iter()
            .filter(|label| !self.ignore_labels.contains(*label))
            .cloned()
            .collect();

        if key.is_empty() {
            return Err(NoMatchError { labels });
        }

        self.lookup(&key).ok_or(NoMatchError { labels })
    }

    /// Raw lookup of an already canonical key.
    pub fn lookup(&self, key: &[Label]) -> Option<&Flavor> {
        self.entries.get(key)
    }

    /// Flavor for jobs that request no specific labels.
    pub fn default_flavor(&self) -> &Flavor {
        &self.default_flavor
    }

    /// Declared flavors, in configuration order.
    pub fn flavors(&self) -> &[Flavor] {
        &self.flavors
    }

    pub fn ignore_labels(&self) -> &LabelSet {
        &self.ignore_labels
    }

    /// Number of label combinations in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, sorted by flavor declaration order and then by key.
    pub fn entries(&self) -> Vec<(&[Label], &Flavor)> {
        let rank = |flavor: &Flavor| self.flavors.iter().position(|f| f == flavor);
        let mut entries: Vec<(&[Label], &Flavor)> = self
            .entries
            .iter()
            .map(|(key, flavor)| (key.as_ref(), flavor))
            .collect();
        entries.sort_by(|(ka, fa), (kb, fb)| {
            rank(fa)
                .cmp(&rank(fb))
                .then_with(|| ka.len().cmp(&kb.len()))
                .then_with(|| ka.cmp(kb))
        });
        entries
    }
}
