//! modchange library
//!
//! Orders the pending changes of a mod manager session: removals and updates
//! first, then every user-requested install followed directly by the changes
//! it pulled in.

pub mod cli;
pub mod config_file;
pub mod error;
pub mod logic;
pub mod review;
pub mod types;

// Re-export main types for convenience
pub use config_file::{AlertFile, ChangeSetFile, SequencerConfig};
pub use error::{ModChangeError, SequenceError};
pub use logic::forest::ChangeForest;
pub use logic::sequencer::{sequence, SequencedChangeSet, Sequencer, SequencerOptions};
pub use review::{
    AlertLookup, ChangeReview, ChangeRow, InstallWorker, NoAlerts, ResolverOptions,
    UserChangeSource,
};
pub use types::{Change, ChangeKind, ChangeReason, ModuleRecord, Relationship};
