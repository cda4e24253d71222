//! Dependency forest reconstructed from change reasons
//!
//! Every non-priority change either starts a tree (user-requested) or hangs
//! beneath the module named by its reason. The forest indexes those parent
//! pointers once, in O(n), so the sequencer looks children up instead of
//! rescanning the candidate list at every level. The walk expands each
//! identifier's children at most once.
//!
//! Children are keyed by the parent's *identifier*, not by a specific entry:
//! a module that appears more than once in the change set exposes the same
//! children under every occurrence.

use crate::types::Change;
use std::collections::{HashMap, HashSet, VecDeque};

/// Parent/child index over one partition of a change set
#[derive(Debug)]
pub struct ChangeForest<'a> {
    entries: Vec<&'a Change>,
    roots: Vec<usize>,
    children: HashMap<&'a str, Vec<usize>>,
}

impl<'a> ChangeForest<'a> {
    /// Index `entries`, keeping their order for roots and for each child list.
    ///
    /// Reasons that are neither user-requested nor carry a parent (e.g.
    /// `Installed`) are indexed nowhere and can never be reached.
    pub fn build(entries: Vec<&'a Change>) -> Self {
        let mut roots = Vec::new();
        let mut children: HashMap<&'a str, Vec<usize>> = HashMap::new();

        for (idx, &change) in entries.iter().enumerate() {
            if change.reason.is_user_requested() {
                roots.push(idx);
            } else if let Some(parent) = change.reason.parent() {
                children
                    .entry(parent.identifier.as_str())
                    .or_default()
                    .push(idx);
            }
        }

        Self {
            entries,
            roots,
            children,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Change stored at `idx`
    pub fn entry(&self, idx: usize) -> &'a Change {
        self.entries[idx]
    }

    /// Indices of user-requested entries, in input order
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Indices of entries whose reason names `identifier` as parent
    pub fn children_of(&self, identifier: &str) -> &[usize] {
        self.children
            .get(identifier)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Entries no walk from a root will ever reach, in input order.
    ///
    /// Covers a parent missing from the change set, a parent that is itself
    /// unreachable, and reasons without a parent.
    pub fn unreachable(&self) -> Vec<&'a Change> {
        let mut reached = vec![false; self.entries.len()];
        let mut expanded: HashSet<&'a str> = HashSet::new();
        let mut queue: VecDeque<usize> = VecDeque::new();

        for &root in &self.roots {
            reached[root] = true;
            queue.push_back(root);
        }

        while let Some(idx) = queue.pop_front() {
            let identifier = self.entries[idx].module.identifier.as_str();
            if !expanded.insert(identifier) {
                continue;
            }
            for &child in self.children_of(identifier) {
                if !reached[child] {
                    reached[child] = true;
                    queue.push_back(child);
                }
            }
        }

        self.entries
            .iter()
            .zip(reached)
            .filter(|(_, reached)| !reached)
            .map(|(&change, _)| change)
            .collect()
    }
}
