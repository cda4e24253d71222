//! Change-Set Sequencer
//!
//! Orders an unordered set of pending changes into the list the user reviews
//! and the installer executes.
//!
//! # Ordering Rules
//!
//! | Group    | Contents                     | Order |
//! |----------|------------------------------|-------|
//! | Priority | `Remove`, `Update`           | Input order |
//! | Grouped  | Everything else (`Install`, `Replace`, `None`) | Pre-order walk of the dependency forest |
//!
//! In the grouped section each user-requested change is followed directly by
//! the changes it pulled in, recursively, so "ModuleRCSFX" lands right after
//! "USI Exploration Pack".
//!
//! # Design
//!
//! - **Pure logic**: No I/O, no shared state — each call owns its output
//! - **Deterministic**: Only input order breaks ties; nothing is sorted
//! - **Dedup except removals**: At most one non-`Remove` entry per identifier;
//!   a removal never blocks a later install of the same module
//! - **Drop, don't throw**: Changes whose parent chain never reaches a
//!   user-requested change are omitted (and logged)
//! - **Fail fast on cycles**: A reason chain that loops is a caller error and
//!   is reported instead of recursing forever

use crate::error::SequenceError;
use crate::logic::forest::ChangeForest;
use crate::types::{Change, ChangeKind};
use std::collections::{HashMap, HashSet};
use tracing::{debug, error, warn};

/// Default ceiling on the length of a dependency chain
pub const DEFAULT_MAX_DEPTH: usize = 64;

// ============================================================================
// Options & Output
// ============================================================================

/// Tunables for a [`Sequencer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerOptions {
    /// Longest root-to-leaf chain accepted, counting the root as level 1
    pub max_depth: usize,
    /// Log a warning for every change omitted as unreachable
    pub warn_on_orphans: bool,
}

impl Default for SequencerOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            warn_on_orphans: true,
        }
    }
}

/// An ordered, deduplicated change list.
///
/// Never mutated after construction; re-sequencing produces a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequencedChangeSet {
    changes: Vec<Change>,
}

impl SequencedChangeSet {
    /// All entries, including inert `None` ones
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    /// Entries that should be shown or executed (skips `None`)
    pub fn actionable(&self) -> impl Iterator<Item = &Change> {
        self.changes.iter().filter(|c| !c.kind.is_inert())
    }

    /// Position of the first entry for `identifier` with the given kind
    pub fn position(&self, identifier: &str, kind: ChangeKind) -> Option<usize> {
        self.changes
            .iter()
            .position(|c| c.identifier() == identifier && c.kind == kind)
    }
}

impl IntoIterator for SequencedChangeSet {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a> IntoIterator for &'a SequencedChangeSet {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

// ============================================================================
// Sequencer
// ============================================================================

/// Orders change sets according to a fixed set of [`SequencerOptions`]
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    options: SequencerOptions,
}

impl Sequencer {
    pub fn new(options: SequencerOptions) -> Self {
        Self { options }
    }

    /// Order `changes` into a [`SequencedChangeSet`].
    ///
    /// 1. Emit every `Remove`/`Update` change, in input order
    /// 2. Walk the remaining changes depth-first starting from each
    ///    user-requested change, in input order, descending into the changes
    ///    whose reason names the current module as parent
    ///
    /// # Errors
    ///
    /// Only for input that violates the acyclic-reasons precondition:
    /// - `CycleDetected` if a reachable chain of parents loops
    /// - `DepthExceeded` if a chain is longer than `max_depth`
    ///
    /// # What This Explicitly Refuses To Do
    ///
    /// - Sort by name, identifier or kind: input order is the only tie-breaker
    /// - Drop `None` entries: callers filter with [`SequencedChangeSet::actionable`]
    /// - Repair orphans: a change whose parent is missing is omitted, not promoted
    pub fn sequence(&self, changes: &[Change]) -> Result<SequencedChangeSet, SequenceError> {
        if changes.is_empty() {
            return Ok(SequencedChangeSet::default());
        }

        let (priority, rest): (Vec<&Change>, Vec<&Change>) =
            changes.iter().partition(|c| c.kind.is_priority());

        let mut emitter = Emitter::with_capacity(changes.len());
        for change in &priority {
            emitter.push(change);
        }
        let priority_count = emitter.len();

        let forest = ChangeForest::build(rest);
        let mut walk = Walk {
            forest: &forest,
            max_depth: self.options.max_depth,
            path: Vec::new(),
            expanded: HashMap::new(),
            emitter,
        };
        for &root in forest.roots() {
            walk.visit(root)?;
        }
        let emitter = walk.emitter;

        if self.options.warn_on_orphans {
            for orphan in forest.unreachable() {
                warn!(
                    "Omitting {} ({}): no user-requested change leads to it",
                    orphan,
                    orphan.reason.describe()
                );
            }
        }

        debug!(
            "Sequenced {} of {} changes ({} priority, {} grouped)",
            emitter.len(),
            changes.len(),
            priority_count,
            emitter.len() - priority_count
        );

        Ok(SequencedChangeSet {
            changes: emitter.into_changes(),
        })
    }

    /// Non-priority changes the walk will never reach, in input order.
    ///
    /// These are exactly the entries [`Sequencer::sequence`] silently omits.
    pub fn orphans<'a>(&self, changes: &'a [Change]) -> Vec<&'a Change> {
        let rest: Vec<&Change> = changes.iter().filter(|c| !c.kind.is_priority()).collect();
        ChangeForest::build(rest).unreachable()
    }
}

/// Order `changes` with default options
pub fn sequence(changes: &[Change]) -> Result<SequencedChangeSet, SequenceError> {
    Sequencer::default().sequence(changes)
}

// ============================================================================
// Traversal
// ============================================================================

/// Output accumulator enforcing the uniqueness-except-removal rule
struct Emitter {
    changes: Vec<Change>,
    claimed: HashSet<String>,
}

impl Emitter {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            changes: Vec::with_capacity(capacity),
            claimed: HashSet::with_capacity(capacity),
        }
    }

    /// Append `change` unless a non-`Remove` entry already claims its module.
    /// Removals are always appended and never claim.
    fn push(&mut self, change: &Change) -> bool {
        if change.kind != ChangeKind::Remove
            && !self.claimed.insert(change.module.identifier.clone())
        {
            return false;
        }
        self.changes.push(change.clone());
        true
    }

    fn len(&self) -> usize {
        self.changes.len()
    }

    fn into_changes(self) -> Vec<Change> {
        self.changes
    }
}

/// One depth-first pass over a forest
struct Walk<'f, 'a> {
    forest: &'f ChangeForest<'a>,
    max_depth: usize,
    /// Identifiers from the current root down to the entry being visited
    path: Vec<&'a str>,
    /// Subtree height of every identifier whose children were already walked
    expanded: HashMap<&'a str, usize>,
    emitter: Emitter,
}

impl<'a> Walk<'_, 'a> {
    /// Visit the entry at `idx` and its subtree, returning the subtree height
    /// in levels (a leaf is 1).
    fn visit(&mut self, idx: usize) -> Result<usize, SequenceError> {
        let forest = self.forest;
        let change = forest.entry(idx);
        let identifier = change.identifier();

        if let Some(start) = self.path.iter().position(|&id| id == identifier) {
            let mut chain: Vec<String> = self.path[start..].iter().map(|id| id.to_string()).collect();
            chain.push(identifier.to_string());
            error!("Cyclic change reasons: {}", chain.join(" -> "));
            return Err(SequenceError::CycleDetected { chain });
        }

        if self.path.len() >= self.max_depth {
            return Err(SequenceError::DepthExceeded {
                limit: self.max_depth,
                identifier: identifier.to_string(),
            });
        }

        self.emitter.push(change);

        // Every entry below an identifier was claimed on its first expansion,
        // so a repeat only has to re-check the depth limit.
        if let Some(&height) = self.expanded.get(identifier) {
            if self.path.len() + height > self.max_depth {
                return Err(SequenceError::DepthExceeded {
                    limit: self.max_depth,
                    identifier: identifier.to_string(),
                });
            }
            return Ok(height);
        }

        self.path.push(identifier);
        let mut height = 1;
        for &child in forest.children_of(identifier) {
            height = height.max(1 + self.visit(child)?);
        }
        self.path.pop();

        self.expanded.insert(identifier, height);
        Ok(height)
    }
}

// ============================================================================
// Tests
// ============================================================================
