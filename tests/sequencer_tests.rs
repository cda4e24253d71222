//! Tests for change-set sequencing through the public API
//!
//! These tests verify:
//! - The documented ordering scenarios
//! - Orphan and cycle handling
//! - Change files loaded from disk sequence the same as in-memory input

use modchange::{
    sequence, Change, ChangeKind, ChangeReason, ChangeSetFile, ModuleRecord, SequenceError,
    Sequencer, SequencerConfig, SequencerOptions,
};

fn module(id: &str) -> ModuleRecord {
    ModuleRecord::new(id, "1.0")
}

fn change(id: &str, kind: ChangeKind, reason: ChangeReason) -> Change {
    Change::new(module(id), kind, reason)
}

fn user(id: &str, kind: ChangeKind) -> Change {
    change(id, kind, ChangeReason::UserRequested)
}

fn dep_of(id: &str, parent: &str) -> Change {
    change(id, ChangeKind::Install, ChangeReason::dependency_of(module(parent)))
}

fn summary(changes: &[Change]) -> Vec<String> {
    changes.iter().map(|c| c.to_string()).collect()
}

// =============================================================================
// Ordering Scenarios
// =============================================================================

#[test]
fn test_scenario_removal_then_parent_then_dependency() {
    let input = vec![
        user("ModX", ChangeKind::Install),
        dep_of("ModY", "ModX"),
        user("ModZ", ChangeKind::Remove),
    ];
    let set = sequence(&input).expect("acyclic input");
    assert_eq!(
        summary(set.changes()),
        vec!["Remove ModZ", "Install ModX", "Install ModY"]
    );
}

#[test]
fn test_scenario_dependency_listed_first() {
    let input = vec![dep_of("ModA", "ModB"), user("ModB", ChangeKind::Install)];
    let set = sequence(&input).expect("acyclic input");
    assert_eq!(summary(set.changes()), vec!["Install ModB", "Install ModA"]);
}

#[test]
fn test_scenario_remove_and_install_same_module() {
    let input = vec![
        user("ModX", ChangeKind::Remove),
        dep_of("ModX", "ModY"),
        user("ModY", ChangeKind::Install),
    ];
    let set = sequence(&input).expect("acyclic input");
    assert_eq!(
        summary(set.changes()),
        vec!["Remove ModX", "Install ModY", "Install ModX"]
    );
}

#[test]
fn test_scenario_missing_parent_is_omitted() {
    let input = vec![dep_of("ModC", "ModD")];
    let set = sequence(&input).expect("orphans are not errors");
    assert!(set.is_empty());
}

#[test]
fn test_empty_input_gives_empty_output() {
    let set = sequence(&[]).expect("empty input");
    assert!(set.is_empty());
    assert_eq!(set.actionable().count(), 0);
}

#[test]
fn test_realistic_session() {
    // USI pulls in ModuleRCSFX and CommunityResourcePack; MechJeb stands alone
    let input = vec![
        dep_of("CommunityResourcePack", "USI-EXP"),
        user("MechJeb2", ChangeKind::Install),
        user("KER", ChangeKind::Update),
        dep_of("ModuleRCSFX", "USI-EXP"),
        user("USI-EXP", ChangeKind::Install),
        user("OldPartsPack", ChangeKind::Remove),
        dep_of("FirespitterCore", "CommunityResourcePack"),
    ];
    let set = sequence(&input).expect("acyclic input");
    assert_eq!(
        summary(set.changes()),
        vec![
            "Update KER",
            "Remove OldPartsPack",
            "Install MechJeb2",
            "Install USI-EXP",
            "Install CommunityResourcePack",
            "Install FirespitterCore",
            "Install ModuleRCSFX",
        ]
    );
}

// =============================================================================
// Precondition Violations
// =============================================================================

#[test]
fn test_two_node_cycle_fails_fast() {
    let input = vec![
        user("Root", ChangeKind::Install),
        dep_of("A", "Root"),
        dep_of("B", "A"),
        dep_of("A", "B"),
    ];
    match sequence(&input) {
        Err(SequenceError::CycleDetected { chain }) => {
            assert_eq!(chain, vec!["A", "B", "A"]);
        }
        other => panic!("Expected CycleDetected, got {:?}", other),
    }
}

#[test]
fn test_depth_limit_from_config() {
    let config = SequencerConfig {
        max_depth: 1,
        warn_on_orphans: false,
    };
    let sequencer = Sequencer::new(config.to_options());
    let input = vec![user("A", ChangeKind::Install), dep_of("B", "A")];
    assert!(matches!(
        sequencer.sequence(&input),
        Err(SequenceError::DepthExceeded { limit: 1, .. })
    ));
}

#[test]
fn test_orphan_report_matches_omissions() {
    let input = vec![
        user("A", ChangeKind::Install),
        dep_of("B", "A"),
        dep_of("C", "Gone"),
        change("D", ChangeKind::Install, ChangeReason::Installed),
    ];
    let sequencer = Sequencer::new(SequencerOptions::default());
    let set = sequencer.sequence(&input).expect("acyclic input");
    let orphans: Vec<&str> = sequencer
        .orphans(&input)
        .iter()
        .map(|c| c.identifier())
        .collect();

    assert_eq!(orphans, vec!["C", "D"]);
    assert_eq!(set.len() + orphans.len(), input.len());
}

// =============================================================================
// Change Files
// =============================================================================

#[test]
fn test_change_file_roundtrip_sequences_identically() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("changes.json");
    let input = vec![
        dep_of("ModA", "ModB"),
        user("ModB", ChangeKind::Install).with_description("Picked from the list"),
        user("ModC", ChangeKind::Remove),
    ];

    ChangeSetFile {
        changes: input.clone(),
    }
    .save_to_file(&path)
    .expect("save");
    let loaded = ChangeSetFile::load_from_file(&path).expect("load");

    assert_eq!(loaded.changes, input);
    assert_eq!(sequence(&loaded.changes), sequence(&input));
}

#[test]
fn test_change_file_missing_is_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = ChangeSetFile::load_from_file(dir.path().join("absent.json"));
    assert!(result.is_err());
}
