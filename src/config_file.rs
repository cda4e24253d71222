//! Configuration and input file handling.
//!
//! Three JSON documents are read from disk:
//! - `SequencerConfig`: sequencer limits
//! - `ChangeSetFile`: the pending changes to order
//! - `AlertFile`: identifier → advisory label map used when rendering rows

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::ModChangeError;
use crate::logic::sequencer::{DEFAULT_MAX_DEPTH, SequencerOptions};
use crate::review::AlertLookup;
use crate::types::Change;

/// Upper bound accepted for `max_depth`
const MAX_DEPTH_CEILING: usize = 4096;

/// Sequencer configuration that can be saved/loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    pub max_depth: usize,
    pub warn_on_orphans: bool,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            warn_on_orphans: true,
        }
    }
}

impl SequencerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(ModChangeError::config("max_depth must be at least 1").into());
        }
        if self.max_depth > MAX_DEPTH_CEILING {
            return Err(ModChangeError::config(format!(
                "max_depth {} exceeds the supported ceiling of {}",
                self.max_depth, MAX_DEPTH_CEILING
            ))
            .into());
        }
        Ok(())
    }

    pub fn to_options(&self) -> SequencerOptions {
        SequencerOptions {
            max_depth: self.max_depth,
            warn_on_orphans: self.warn_on_orphans,
        }
    }
}

/// On-disk form of a pending change set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSetFile {
    pub changes: Vec<Change>,
}

impl ChangeSetFile {
    /// Load a change set from a JSON file and check identifiers are present
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read change set from {:?}", path.as_ref()))?;

        let file: Self =
            serde_json::from_str(&content).context("Failed to parse change set JSON")?;

        file.validate()?;
        Ok(file)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize change set to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write change set to {:?}", path.as_ref()))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for (i, change) in self.changes.iter().enumerate() {
            if change.module.identifier.trim().is_empty() {
                return Err(ModChangeError::validation(format!(
                    "Change #{} has an empty module identifier",
                    i + 1
                ))
                .into());
            }
            if let Some(parent) = change.reason.parent() {
                if parent.identifier.trim().is_empty() {
                    return Err(ModChangeError::validation(format!(
                        "Change #{} ({}) names a parent with an empty identifier",
                        i + 1,
                        change.module.identifier
                    ))
                    .into());
                }
            }
        }
        Ok(())
    }
}

/// Advisory labels keyed by module identifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertFile {
    pub labels: BTreeMap<String, String>,
}

impl AlertFile {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read alert labels from {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse alert label JSON")
    }
}

impl AlertLookup for AlertFile {
    fn alert_label(&self, identifier: &str) -> Option<String> {
        self.labels.get(identifier).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChangeKind, ChangeReason, ModuleRecord};

    #[test]
    fn test_default_config_is_valid() {
        let config = SequencerConfig::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.to_options(), SequencerOptions::default());
    }

    #[test]
    fn test_zero_depth_rejected() {
        let config = SequencerConfig {
            max_depth: 0,
            ..SequencerConfig::default()
        };
        let err = config.validate().expect_err("zero depth");
        assert!(matches!(
            err.downcast_ref::<ModChangeError>(),
            Some(ModChangeError::Config(_))
        ));
    }

    #[test]
    fn test_huge_depth_rejected() {
        let config = SequencerConfig {
            max_depth: MAX_DEPTH_CEILING + 1,
            ..SequencerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_missing_fields_use_defaults() {
        let config: SequencerConfig =
            serde_json::from_str(r#"{"max_depth": 8}"#).expect("partial config parses");
        assert_eq!(config.max_depth, 8);
        assert!(config.warn_on_orphans);
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sequencer.json");
        let config = SequencerConfig {
            max_depth: 12,
            warn_on_orphans: false,
        };
        config.save_to_file(&path).expect("save");
        let loaded = SequencerConfig::load_from_file(&path).expect("load");
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_change_file_rejects_blank_identifier() {
        let file = ChangeSetFile {
            changes: vec![Change::new(
                ModuleRecord::new(" ", "1.0"),
                ChangeKind::Install,
                ChangeReason::UserRequested,
            )],
        };
        let err = file.validate().expect_err("blank identifier");
        assert!(matches!(
            err.downcast_ref::<ModChangeError>(),
            Some(ModChangeError::Validation(_))
        ));
        assert_eq!(
            err.to_string(),
            "Validation error: Change #1 has an empty module identifier"
        );
    }

    #[test]
    fn test_change_file_parses_minimal_json() {
        let json = r#"{
            "changes": [
                {"module": {"identifier": "ModB"}, "kind": "Install",
                 "reason": {"type": "user_requested"}},
                {"module": {"identifier": "ModA"}, "kind": "Install",
                 "reason": {"type": "dependency_of", "parent": {"identifier": "ModB"}}}
            ]
        }"#;
        let file: ChangeSetFile = serde_json::from_str(json).expect("parses");
        assert!(file.validate().is_ok());
        assert_eq!(file.changes[1].parent_identifier(), Some("ModB"));
    }

    #[test]
    fn test_alert_file_lookup() {
        let alerts: AlertFile =
            serde_json::from_str(r#"{"ModX": "Unstable"}"#).expect("parses");
        assert_eq!(alerts.alert_label("ModX"), Some("Unstable".to_string()));
        assert_eq!(alerts.alert_label("ModY"), None);
    }
}
