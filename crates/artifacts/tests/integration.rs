//! Filesystem round trips of artifacts against the real cube.

use std::fs;

use artifacts::{ArtifactError, MacroLibrary, MacroSummary, PlanRecord, ScrambleSet};
use cube::CubeEnv;
use search::{LearnerConfig, MacroLearner, MacroSet, Planner, PlannerConfig, StateSimulator};

#[test]
fn test_generate_and_load_scramble_set() {
    let tmp = tempfile::tempdir().unwrap();
    let env = CubeEnv::new();
    let set = ScrambleSet::new(tmp.path().join("scrambles")).with_count(5);

    let paths = set.generate(&env, 12, 42).unwrap();
    assert_eq!(paths.len(), 5);
    assert!(paths[3].ends_with("start-003.txt"));

    for index in 0..5 {
        let actions = set.load(&env, index).unwrap();
        assert_eq!(actions.len(), 12);
        assert!(actions
            .windows(2)
            .all(|w| CubeEnv::inverse(w[0]) != w[1]));
    }

    // Same seed, same files.
    let again = ScrambleSet::new(tmp.path().join("again")).with_count(5);
    again.generate(&env, 12, 42).unwrap();
    for index in 0..5 {
        assert_eq!(
            set.load_labels(index).unwrap(),
            again.load_labels(index).unwrap()
        );
    }
}

#[test]
fn test_load_handwritten_scramble() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("start-007.txt"), "R U R' U'\n").unwrap();
    let env = CubeEnv::new();
    let set = ScrambleSet::new(tmp.path());
    assert_eq!(set.load(&env, 7).unwrap(), vec![1, 2, 7, 8]);
}

#[test]
fn test_missing_or_invalid_scramble() {
    let tmp = tempfile::tempdir().unwrap();
    let env = CubeEnv::new();
    let set = ScrambleSet::new(tmp.path());

    let err = set.load(&env, 100).unwrap_err();
    assert!(matches!(err, ArtifactError::InvalidScenario { index: 100, .. }));

    let err = set.load(&env, 0).unwrap_err();
    assert!(matches!(err, ArtifactError::Io { .. }));

    fs::write(tmp.path().join("start-001.txt"), "R Q").unwrap();
    let err = set.load(&env, 1).unwrap_err();
    assert!(matches!(err, ArtifactError::UnknownLabel(ref l) if l == "Q"));
}

#[test]
fn test_learned_library_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("out").join("macros.json");
    let mut env = CubeEnv::new();

    let learner = MacroLearner::new(LearnerConfig {
        max_macros: 16,
        reduction: 1,
        budget: 1_000,
        fringe_factor: 10,
        unbounded_fringe: false,
    });
    let base = StateSimulator::parse_sequence(&env, "F").unwrap();
    let outcome = learner.run(&mut env, &base).unwrap();

    let library = MacroLibrary::from_macros(&env, Some(2), &base, &outcome.macros);
    library.save(&path).unwrap();

    let loaded = MacroLibrary::load(&path).unwrap();
    assert_eq!(loaded, library);
    assert_eq!(loaded.base, vec!["F"]);
    assert_eq!(loaded.to_macro_set(&env).unwrap(), outcome.macros);

    let summary = MacroSummary::from_library(&loaded);
    assert_eq!(summary.count, outcome.macros.len());
    assert!(summary.max_effect <= cube::MAX_DIFF);
}

#[test]
fn test_save_drops_duplicate_macros() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("macros.json");
    let json = r#"{
        "source_index": null,
        "base": [],
        "macros": [
            {"actions": ["R", "U"], "net_effect": 20, "length": 2},
            {"actions": ["R", "U"], "net_effect": 20, "length": 2},
            {"actions": ["L"], "net_effect": 12, "length": 1}
        ]
    }"#;
    let library: MacroLibrary = serde_json::from_str(json).unwrap();
    library.save(&path).unwrap();
    assert_eq!(MacroLibrary::load(&path).unwrap().len(), 2);
}

#[test]
fn test_plan_record_round_trip_and_replay() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("plan.json");
    let mut env = CubeEnv::new();

    let scramble = StateSimulator::parse_sequence(&env, "U F").unwrap();
    let planner = Planner::new(PlannerConfig {
        budget: 10_000,
        max_rounds: Some(10),
    });
    let result = planner.run(&mut env, &scramble, &MacroSet::new()).unwrap();
    let record = PlanRecord::from_result(&env, 0, &scramble, 0, &result);
    record.save(&path).unwrap();

    let loaded = PlanRecord::load(&path).unwrap();
    assert_eq!(loaded, record);

    let mut replay = CubeEnv::new();
    let mut full = loaded.scramble_actions(&replay).unwrap();
    full.extend(loaded.plan_actions(&replay).unwrap());
    replay.reset(&full);
    assert_eq!(replay.is_solved(), loaded.solved);
}

#[test]
fn test_corrupt_json_reports_path() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();
    let err = MacroLibrary::load(&path).unwrap_err();
    assert!(matches!(err, ArtifactError::Json { .. }));
    assert!(err.to_string().contains("broken.json"));
}
