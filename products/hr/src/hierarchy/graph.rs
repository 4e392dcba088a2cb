use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// Reports-to topology: manager id to ordered subordinate ids, keyed in id
/// order so serialized charts are stable.
///
/// Kept apart from employee payloads. Cycles and shared subordinates are
/// allowed; every walk visits each id at most once.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReportGraph {
    edges: BTreeMap<String, Vec<String>>,
}

impl ReportGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the direct reports of `manager`, replacing any earlier entry.
    pub fn insert(&mut self, manager: impl Into<String>, reports: Vec<String>) {
        self.edges.insert(manager.into(), reports);
    }

    /// True once the node has been expanded by [`insert`](Self::insert).
    pub fn contains(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    pub fn direct_reports(&self, id: &str) -> &[String] {
        self.edges.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of expanded nodes.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Distinct subordinates reachable from `root`, pre-order, depth first.
    /// `root` itself is never included.
    pub fn subordinates(&self, root: &str) -> Vec<String> {
        let mut seen = HashSet::from([root.to_string()]);
        let mut order = Vec::new();
        let mut stack: Vec<&str> = self
            .direct_reports(root)
            .iter()
            .rev()
            .map(String::as_str)
            .collect();
        while let Some(id) = stack.pop() {
            if !seen.insert(id.to_string()) {
                continue;
            }
            order.push(id.to_string());
            stack.extend(self.direct_reports(id).iter().rev().map(String::as_str));
        }
        order
    }

    /// Size of the transitive closure of reports below `root`.
    pub fn count_reports(&self, root: &str) -> usize {
        self.subordinates(root).len()
    }
}
