//! Logic modules — turn an unordered change set into an executable order.
//!
//! # Modules
//!
//! - `forest` — parent/child index rebuilt from change reasons
//! - `sequencer` — partition, dedup and dependency-grouped ordering

pub mod forest;
pub mod sequencer;
