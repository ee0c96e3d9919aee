//! TOML config loading for the cam CLI.
//!
//! Deserializes `configs/cam.toml`, which has optional `[learner]` and
//! `[planner]` sections, then merges with CLI overrides.

use std::path::Path;

use search::{LearnerConfig, PlannerConfig};
use serde::Deserialize;

/// Top-level structure matching `configs/cam.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct CamToml {
    /// Macro-learning parameters.
    #[serde(default)]
    pub learner: LearnerConfig,
    /// Planning parameters.
    #[serde(default)]
    pub planner: PlannerConfig,
}

/// Load and deserialize a `CamToml` from a TOML file.
pub fn load_cam_toml(path: &Path) -> anyhow::Result<CamToml> {
    let contents = std::fs::read_to_string(path)?;
    let config: CamToml = toml::from_str(&contents)?;
    tracing::info!(path = %path.display(), "Loaded cam config");
    Ok(config)
}

/// CLI flags that override `[learner]` values.
#[derive(Debug, Default, Clone, Copy)]
pub struct LearnerOverrides {
    pub budget: Option<u64>,
    pub max_macros: Option<usize>,
    pub reduction: Option<usize>,
    pub fringe_factor: Option<usize>,
    /// Forces an unbounded fringe; `false` keeps the TOML setting.
    pub unbounded_fringe: bool,
}

/// Build a `LearnerConfig`.
///
/// Priority chain: serde defaults < TOML values < CLI flags.
pub fn build_learner_config(toml: &LearnerConfig, cli: LearnerOverrides) -> LearnerConfig {
    let mut config = toml.clone();
    if let Some(b) = cli.budget {
        config.budget = b;
    }
    if let Some(n) = cli.max_macros {
        config.max_macros = n;
    }
    if let Some(r) = cli.reduction {
        config.reduction = r;
    }
    if let Some(f) = cli.fringe_factor {
        config.fringe_factor = f;
    }
    if cli.unbounded_fringe {
        config.unbounded_fringe = true;
    }
    config
}

/// Build a `PlannerConfig`.
///
/// Priority chain: serde defaults < TOML values < CLI flags.
pub fn build_planner_config(
    toml: &PlannerConfig,
    budget_cli: Option<u64>,
    max_rounds_cli: Option<usize>,
) -> PlannerConfig {
    let mut config = toml.clone();
    if let Some(b) = budget_cli {
        config.budget = b;
    }
    if max_rounds_cli.is_some() {
        config.max_rounds = max_rounds_cli;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_cam_toml() {
        let toml_str = r#"
[learner]
max_macros = 100
reduction = 4
budget = 50000
fringe_factor = 5
unbounded_fringe = true

[planner]
budget = 20000
max_rounds = 40
"#;
        let config: CamToml = toml::from_str(toml_str).unwrap();
        assert_eq!(config.learner.max_macros, 100);
        assert_eq!(config.learner.reduction, 4);
        assert_eq!(config.learner.budget, 50_000);
        assert_eq!(config.learner.fringe_factor, 5);
        assert!(config.learner.unbounded_fringe);
        assert_eq!(config.planner.budget, 20_000);
        assert_eq!(config.planner.max_rounds, Some(40));
    }

    #[test]
    fn test_deserialize_missing_sections() {
        let config: CamToml = toml::from_str("").unwrap();
        assert_eq!(config.learner.max_macros, 576);
        assert_eq!(config.planner.budget, 1_000_000);
        assert!(config.planner.max_rounds.is_none());
    }

    #[test]
    fn test_deserialize_partial_planner() {
        let toml_str = r#"
[planner]
max_rounds = 3
"#;
        let config: CamToml = toml::from_str(toml_str).unwrap();
        assert_eq!(config.planner.budget, 1_000_000);
        assert_eq!(config.planner.max_rounds, Some(3));
    }

    #[test]
    fn test_learner_cli_overrides_toml() {
        let toml = LearnerConfig {
            max_macros: 100,
            budget: 5_000,
            ..Default::default()
        };
        let config = build_learner_config(
            &toml,
            LearnerOverrides {
                budget: Some(7),
                ..Default::default()
            },
        );
        assert_eq!(config.budget, 7);
        assert_eq!(config.max_macros, 100);
        assert_eq!(config.reduction, 1);
        assert_eq!(config.fringe_capacity(), Some(1_000));
    }

    #[test]
    fn test_learner_cli_unbounded_fringe() {
        let toml = LearnerConfig {
            max_macros: 100,
            ..Default::default()
        };
        let factor = build_learner_config(
            &toml,
            LearnerOverrides {
                fringe_factor: Some(3),
                ..Default::default()
            },
        );
        assert_eq!(factor.fringe_capacity(), Some(300));

        let unbounded = build_learner_config(
            &toml,
            LearnerOverrides {
                unbounded_fringe: true,
                ..Default::default()
            },
        );
        assert_eq!(unbounded.fringe_capacity(), None);
    }

    #[test]
    fn test_planner_cli_overrides_toml() {
        let toml = PlannerConfig {
            budget: 10,
            max_rounds: Some(2),
        };
        let kept = build_planner_config(&toml, None, None);
        assert_eq!(kept.budget, 10);
        assert_eq!(kept.max_rounds, Some(2));

        let overridden = build_planner_config(&toml, Some(99), Some(5));
        assert_eq!(overridden.budget, 99);
        assert_eq!(overridden.max_rounds, Some(5));
    }

    #[test]
    fn test_load_cam_toml_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cam.toml");
        std::fs::write(&path, "[learner]\nbudget = 12\n").unwrap();
        let config = load_cam_toml(&path).unwrap();
        assert_eq!(config.learner.budget, 12);

        assert!(load_cam_toml(&tmp.path().join("missing.toml")).is_err());
    }
}
