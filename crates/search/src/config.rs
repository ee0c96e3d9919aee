/// Macro-learning configuration loaded from TOML.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct LearnerConfig {
    /// Number of visited states retained as macro candidates (N_m).
    #[serde(default = "default_max_macros")]
    pub max_macros: usize,

    /// Reduction factor (R_m): the output keeps `max_macros / reduction`
    /// macros, rounded down, so a factor above `max_macros` learns none.
    #[serde(default = "default_reduction")]
    pub reduction: usize,

    /// Exploration budget (B_m), counted in primitive-action evaluations.
    #[serde(default = "default_budget")]
    pub budget: u64,

    /// Fringe ceiling as a multiple of `max_macros`.
    #[serde(default = "default_fringe_factor")]
    pub fringe_factor: usize,

    /// Let the fringe grow without a ceiling, ignoring `fringe_factor`.
    #[serde(default)]
    pub unbounded_fringe: bool,
}

fn default_max_macros() -> usize {
    576
}
fn default_reduction() -> usize {
    1
}
fn default_budget() -> u64 {
    1_000_000
}
fn default_fringe_factor() -> usize {
    10
}

impl LearnerConfig {
    /// Log a warning for settings that will be clamped.
    pub fn validate(&self) {
        if self.max_macros == 0 {
            tracing::warn!("max_macros = 0; retaining a single candidate instead");
        }
        if self.reduction == 0 {
            tracing::warn!("reduction = 0; treating as 1");
        }
        if self.reduction > self.max_macros.max(1) {
            tracing::warn!(
                reduction = self.reduction,
                max_macros = self.max_macros,
                "reduction exceeds max_macros; output will be empty"
            );
        }
        if self.fringe_factor == 0 && !self.unbounded_fringe {
            tracing::warn!("fringe_factor = 0; treating as 1");
        }
    }

    /// Retention cap of the visited table.
    pub fn retention(&self) -> usize {
        self.max_macros.max(1)
    }

    /// Number of macros extracted at the end of a run.
    pub fn output_size(&self) -> usize {
        self.retention() / self.reduction.max(1)
    }

    /// Size ceiling of the fringe, `None` when unbounded.
    pub fn fringe_capacity(&self) -> Option<usize> {
        if self.unbounded_fringe {
            return None;
        }
        Some(self.retention().saturating_mul(self.fringe_factor.max(1)))
    }
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            max_macros: default_max_macros(),
            reduction: default_reduction(),
            budget: default_budget(),
            fringe_factor: default_fringe_factor(),
            unbounded_fringe: false,
        }
    }
}

/// Planning configuration loaded from TOML.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct PlannerConfig {
    /// Total evaluation budget; each round spends one evaluation per
    /// primitive action and per macro.
    #[serde(default = "default_budget")]
    pub budget: u64,

    /// Optional hard cap on the number of rounds.
    #[serde(default)]
    pub max_rounds: Option<usize>,
}

impl PlannerConfig {
    /// Log a warning if the budget cannot fund a single round.
    pub fn validate(&self) {
        if self.budget == 0 {
            tracing::warn!("planner budget = 0; a single round will still run");
        }
        if self.max_rounds == Some(0) {
            tracing::warn!("max_rounds = 0; the planner will only check the start state");
        }
    }

    /// Rounds affordable with `candidates_per_round` evaluations each.
    pub fn rounds(&self, candidates_per_round: usize) -> usize {
        let per_round = candidates_per_round.max(1) as u64;
        let from_budget = usize::try_from(self.budget / per_round)
            .unwrap_or(usize::MAX)
            .max(1);
        match self.max_rounds {
            Some(cap) => from_budget.min(cap),
            None => from_budget,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            budget: default_budget(),
            max_rounds: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_learner_default_values() {
        let cfg = LearnerConfig::default();
        assert_eq!(cfg.max_macros, 576);
        assert_eq!(cfg.reduction, 1);
        assert_eq!(cfg.budget, 1_000_000);
        assert_eq!(cfg.fringe_factor, 10);
        assert_eq!(cfg.output_size(), 576);
        assert_eq!(cfg.fringe_capacity(), Some(5760));
    }

    #[test]
    fn test_learner_partial_toml_override() {
        let toml_str = r#"
            max_macros = 100
            reduction = 4
        "#;
        let cfg: LearnerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.max_macros, 100);
        assert_eq!(cfg.reduction, 4);
        assert_eq!(cfg.output_size(), 25);
        // Defaults for unspecified fields
        assert_eq!(cfg.budget, 1_000_000);
        assert_eq!(cfg.fringe_factor, 10);
        assert!(!cfg.unbounded_fringe);
    }

    #[test]
    fn test_learner_unbounded_fringe_from_toml() {
        let toml_str = r#"
            max_macros = 100
            fringe_factor = 3
            unbounded_fringe = true
        "#;
        let cfg: LearnerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.fringe_capacity(), None);
        assert_eq!(cfg.output_size(), 100);
    }

    #[test]
    fn test_learner_degenerate_values_clamped() {
        let cfg = LearnerConfig {
            max_macros: 0,
            reduction: 0,
            fringe_factor: 0,
            ..Default::default()
        };
        cfg.validate(); // Should log warnings but not panic
        assert_eq!(cfg.retention(), 1);
        assert_eq!(cfg.output_size(), 1);
        assert_eq!(cfg.fringe_capacity(), Some(1));
    }

    #[test]
    fn test_learner_reduction_larger_than_max() {
        let cfg = LearnerConfig {
            max_macros: 3,
            reduction: 8,
            ..Default::default()
        };
        assert_eq!(cfg.output_size(), 0);
        cfg.validate();
    }

    #[test]
    fn test_planner_default_values() {
        let cfg = PlannerConfig::default();
        assert_eq!(cfg.budget, 1_000_000);
        assert!(cfg.max_rounds.is_none());
        cfg.validate();
    }

    #[test]
    fn test_planner_rounds_from_budget() {
        let cfg = PlannerConfig::default();
        // 12 primitives + 576 macros, as in the cube setup.
        assert_eq!(cfg.rounds(12 + 576), 1_000_000 / 588);
    }

    #[test]
    fn test_planner_rounds_at_least_one() {
        let cfg = PlannerConfig {
            budget: 5,
            max_rounds: None,
        };
        assert_eq!(cfg.rounds(100), 1);
    }

    #[test]
    fn test_planner_rounds_capped() {
        let toml_str = r#"
            budget = 10000
            max_rounds = 7
        "#;
        let cfg: PlannerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.rounds(10), 7);
    }
}
