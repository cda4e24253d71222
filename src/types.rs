//! Type-safe change-set types for modchange
//!
//! A pending change is a `(module, kind, reason)` triple. Kinds and
//! relationships are closed enums with strum-derived string forms so they can
//! be parsed from change files and printed as row labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};

/// A mod as seen by the change list.
///
/// Identity is the `identifier` alone; it is stable across versions.
/// `name` and `version` are display data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub identifier: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

impl ModuleRecord {
    /// Create a record whose display name is the identifier
    pub fn new(identifier: impl Into<String>, version: impl Into<String>) -> Self {
        let identifier = identifier.into();
        Self {
            name: identifier.clone(),
            identifier,
            version: version.into(),
        }
    }

    /// Override the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Name shown in rows, falling back to the identifier
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.identifier
        } else {
            &self.name
        }
    }
}

impl fmt::Display for ModuleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}", self.display_name())
        } else {
            write!(f, "{} {}", self.display_name(), self.version)
        }
    }
}

/// What a pending change does to its module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
pub enum ChangeKind {
    /// Inert entry; ordered like the others but never shown or executed
    #[default]
    #[strum(serialize = "None")]
    None,
    #[strum(serialize = "Install")]
    Install,
    #[strum(serialize = "Remove")]
    Remove,
    #[strum(serialize = "Update")]
    Update,
    #[strum(serialize = "Replace")]
    Replace,
}

impl ChangeKind {
    /// Removals and updates are emitted ahead of everything else
    pub fn is_priority(&self) -> bool {
        matches!(self, Self::Remove | Self::Update)
    }

    /// Inert entries are skipped when rendering or executing
    pub fn is_inert(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// How a parent module refers to the change it pulled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    #[default]
    #[strum(serialize = "depends")]
    Depends,
    #[strum(serialize = "recommends")]
    Recommends,
    #[strum(serialize = "suggests")]
    Suggests,
}

/// Why a change is part of the change set.
///
/// The sequencer only asks two questions of a reason: is it
/// [`ChangeReason::UserRequested`], and which parent does it carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeReason {
    /// Chosen directly by the user
    UserRequested,
    /// Pulled in because `parent` depends on, recommends or suggests it
    DependencyOf {
        parent: ModuleRecord,
        #[serde(default)]
        relationship: Relationship,
    },
    /// Already installed; carried along by the resolver
    Installed,
    /// Replaces `original`
    Replacement { original: ModuleRecord },
}

impl ChangeReason {
    /// Shorthand for a plain `depends` reason
    pub fn dependency_of(parent: ModuleRecord) -> Self {
        Self::DependencyOf {
            parent,
            relationship: Relationship::Depends,
        }
    }

    pub fn is_user_requested(&self) -> bool {
        matches!(self, Self::UserRequested)
    }

    /// The module this change hangs beneath, if any
    pub fn parent(&self) -> Option<&ModuleRecord> {
        match self {
            Self::UserRequested | Self::Installed => None,
            Self::DependencyOf { parent, .. } => Some(parent),
            Self::Replacement { original } => Some(original),
        }
    }

    /// Human-readable description used when a change carries none
    pub fn describe(&self) -> String {
        match self {
            Self::UserRequested => "Requested by user".to_string(),
            Self::DependencyOf {
                parent,
                relationship,
            } => match relationship {
                Relationship::Depends => format!("Dependency of {}", parent.display_name()),
                Relationship::Recommends => format!("Recommended by {}", parent.display_name()),
                Relationship::Suggests => format!("Suggested by {}", parent.display_name()),
            },
            Self::Installed => "Already installed".to_string(),
            Self::Replacement { original } => format!("Replaces {}", original.display_name()),
        }
    }
}

/// One pending mutation to a single module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub module: ModuleRecord,
    pub kind: ChangeKind,
    pub reason: ChangeReason,
    /// Display-only text; derived from the reason when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Change {
    pub fn new(module: ModuleRecord, kind: ChangeKind, reason: ChangeReason) -> Self {
        Self {
            module,
            kind,
            reason,
            description: None,
        }
    }

    /// Attach a display description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn identifier(&self) -> &str {
        &self.module.identifier
    }

    /// Identifier of the parent module, if the reason carries one
    pub fn parent_identifier(&self) -> Option<&str> {
        self.reason.parent().map(|p| p.identifier.as_str())
    }

    /// "<name> <version>" as shown in the first column of the change list
    pub fn name_and_status(&self) -> String {
        self.module.to_string()
    }

    pub fn description(&self) -> String {
        match &self.description {
            Some(text) => text.clone(),
            None => self.reason.describe(),
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.module.identifier)
    }
}
