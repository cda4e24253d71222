//! Change review state
//!
//! Holds the sequenced change set the user is looking at, turns it into
//! display rows, and hands the confirmed plan to an install worker. Rendering
//! and execution live elsewhere; this module only talks to them through the
//! [`AlertLookup`], [`UserChangeSource`] and [`InstallWorker`] traits.

use crate::error::Result;
use crate::logic::sequencer::{SequencedChangeSet, Sequencer};
use crate::types::{Change, ChangeKind};
use std::fmt;
use tracing::{debug, info, warn};

// ============================================================================
// Collaborator Seams
// ============================================================================

/// Looks up the advisory label (e.g. "Unstable") shown before installing a
/// module. Only affects row text and colour.
pub trait AlertLookup {
    fn alert_label(&self, identifier: &str) -> Option<String>;
}

/// Lookup that never reports a label
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAlerts;

impl AlertLookup for NoAlerts {
    fn alert_label(&self, _identifier: &str) -> Option<String> {
        None
    }
}

/// Recomputes the user's change set from current selections.
///
/// Confirmation uses a fresh computation rather than the reviewed list,
/// since the reviewed list can carry stale versions.
pub trait UserChangeSource {
    fn user_changes(&self) -> Vec<Change>;
}

/// Executes a confirmed plan, typically on a background thread
pub trait InstallWorker: Send {
    fn submit(&mut self, changes: Vec<Change>, options: ResolverOptions);
}

/// Which optional relationships the resolver should follow when executing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    pub with_recommends: bool,
    pub with_suggests: bool,
    pub with_all_suggests: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            with_recommends: true,
            with_suggests: false,
            with_all_suggests: false,
        }
    }
}

impl ResolverOptions {
    /// Follow hard dependencies only; used when executing a reviewed plan
    pub fn depends_only() -> Self {
        Self {
            with_recommends: false,
            with_suggests: false,
            with_all_suggests: false,
        }
    }
}

// ============================================================================
// Rows
// ============================================================================

/// One line of the change list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRow {
    pub identifier: String,
    pub name_and_status: String,
    pub kind: ChangeKind,
    pub description: String,
    pub alert_label: Option<String>,
    /// Rendered in the warning colour
    pub warning: bool,
}

impl ChangeRow {
    fn from_change(change: &Change, alerts: &dyn AlertLookup) -> Self {
        let alert_label = alerts.alert_label(change.identifier());
        let description = match &alert_label {
            Some(label) => format!(
                "Warning, installing a module with label \"{}\": {}",
                label,
                change.description()
            ),
            None => change.description(),
        };
        Self {
            identifier: change.identifier().to_string(),
            name_and_status: change.name_and_status(),
            kind: change.kind,
            warning: alert_label.is_some(),
            alert_label,
            description,
        }
    }
}

impl fmt::Display for ChangeRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.warning { "!" } else { " " };
        write!(
            f,
            "{} {:<32} {:<8} {}",
            marker,
            self.name_and_status,
            self.kind.to_string(),
            self.description
        )
    }
}

// ============================================================================
// Review State
// ============================================================================

/// The change set currently under review
pub struct ChangeReview {
    sequencer: Sequencer,
    current: Option<SequencedChangeSet>,
    worker: Option<Box<dyn InstallWorker>>,
}

impl ChangeReview {
    pub fn new(sequencer: Sequencer) -> Self {
        Self {
            sequencer,
            current: None,
            worker: None,
        }
    }

    /// Replace the reviewed change set.
    ///
    /// `None` clears the review and discards the worker. A change set whose
    /// reasons violate the sequencing preconditions also clears the review
    /// before the error is returned.
    pub fn update(
        &mut self,
        changes: Option<&[Change]>,
        worker: Option<Box<dyn InstallWorker>>,
    ) -> Result<()> {
        self.current = None;
        self.worker = worker;

        let Some(changes) = changes else {
            self.worker = None;
            debug!("Change review cleared");
            return Ok(());
        };

        match self.sequencer.sequence(changes) {
            Ok(set) => {
                debug!("Reviewing {} changes", set.len());
                self.current = Some(set);
                Ok(())
            }
            Err(e) => {
                self.worker = None;
                Err(e.into())
            }
        }
    }

    /// Drop the reviewed set and any pending worker
    pub fn cancel(&mut self) {
        info!("Change review cancelled");
        self.current = None;
        self.worker = None;
    }

    /// Sequenced changes under review, including inert ones
    pub fn changes(&self) -> &[Change] {
        self.current.as_ref().map(|s| s.changes()).unwrap_or(&[])
    }

    /// True when nothing is pending; same whether cleared or never set
    pub fn is_empty(&self) -> bool {
        self.changes().is_empty()
    }

    pub fn has_worker(&self) -> bool {
        self.worker.is_some()
    }

    /// Display rows for every non-`None` change, in sequence order
    pub fn rows(&self, alerts: &dyn AlertLookup) -> Vec<ChangeRow> {
        self.current
            .iter()
            .flat_map(|set| set.actionable())
            .map(|change| ChangeRow::from_change(change, alerts))
            .collect()
    }

    /// Submit a freshly computed change set to the worker.
    ///
    /// Returns `false` without doing anything when no set is under review or
    /// no worker is attached.
    pub fn confirm(&mut self, source: &dyn UserChangeSource) -> bool {
        if self.current.is_none() {
            return false;
        }
        let Some(worker) = self.worker.as_mut() else {
            warn!("Confirm requested with no install worker attached");
            return false;
        };

        let changes: Vec<Change> = source
            .user_changes()
            .into_iter()
            .filter(|c| !c.kind.is_inert())
            .collect();
        info!("Submitting {} changes for installation", changes.len());
        worker.submit(changes, ResolverOptions::depends_only());
        true
    }
}

impl Default for ChangeReview {
    fn default() -> Self {
        Self::new(Sequencer::default())
    }
}

impl fmt::Debug for ChangeReview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeReview")
            .field("sequencer", &self.sequencer)
            .field("current", &self.current)
            .field("has_worker", &self.worker.is_some())
            .finish()
    }
}
