//! Mutable cube simulator with action history.

use std::fmt;

use crate::geometry::{Geometry, NUM_FACELETS};
use crate::types::{action_by_label, CubeError, Face, ACTION_LABELS, NUM_ACTIONS};

/// Maximum goal-count distance: every non-centre facelet misplaced.
pub const MAX_DIFF: u32 = 48;

/// Cube simulator.
///
/// Holds the current facelet coloring and the sequence of actions applied
/// since the last [`reset`](CubeEnv::reset). All actions are reversible:
/// stepping `a` then `inverse(a)` restores the previous coloring exactly.
#[derive(Clone)]
pub struct CubeEnv {
    state: [u8; NUM_FACELETS],
    history: Vec<usize>,
    geometry: &'static Geometry,
}

impl Default for CubeEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl CubeEnv {
    /// A solved cube with empty history.
    pub fn new() -> Self {
        Self {
            state: Geometry::solved(),
            history: Vec::new(),
            geometry: Geometry::get(),
        }
    }

    /// Restore the solved configuration and replay `sequence`.
    pub fn reset(&mut self, sequence: &[usize]) {
        self.state = Geometry::solved();
        self.history.clear();
        for &action in sequence {
            self.step(action);
        }
    }

    /// Apply one quarter turn and return whether the cube is solved.
    ///
    /// # Panics
    ///
    /// Panics if `action >= NUM_ACTIONS`; ids come from the fixed action table.
    pub fn step(&mut self, action: usize) -> bool {
        self.permute(action);
        self.history.push(action);
        self.is_solved()
    }

    /// Take back `action` by turning the face the other way.
    ///
    /// When `action` is the most recent history entry it is popped, so the
    /// history reads as if the action was never applied. Otherwise the
    /// inverse turn is recorded.
    pub fn undo(&mut self, action: usize) {
        let inverse = Self::inverse(action);
        self.permute(inverse);
        if self.history.last() == Some(&action) {
            self.history.pop();
        } else {
            self.history.push(inverse);
        }
    }

    fn permute(&mut self, action: usize) {
        let perm = self.geometry.permutation(action);
        let prev = self.state;
        for (dst, &src) in perm.iter().enumerate() {
            self.state[dst] = prev[src as usize];
        }
    }

    /// Inverse of `action`: the opposite-direction turn of the same face.
    pub fn inverse(action: usize) -> usize {
        (action + NUM_ACTIONS / 2) % NUM_ACTIONS
    }

    /// Raw facelet colors.
    pub fn facelets(&self) -> &[u8; NUM_FACELETS] {
        &self.state
    }

    /// Actions applied since the last reset.
    pub fn sequence(&self) -> &[usize] {
        &self.history
    }

    /// Number of non-centre facelets whose color differs from `baseline`,
    /// or from the solved configuration when `baseline` is `None`.
    ///
    /// A baseline shorter than the facelet array only compares the overlap.
    pub fn diff(&self, baseline: Option<&[u8]>) -> u32 {
        let solved;
        let reference: &[u8] = match baseline {
            Some(b) => b,
            None => {
                solved = Geometry::solved();
                &solved
            }
        };
        self.state
            .iter()
            .zip(reference)
            .enumerate()
            .filter(|(slot, (a, b))| !Geometry::is_centre(*slot) && a != b)
            .count() as u32
    }

    /// True when every facelet matches its face.
    pub fn is_solved(&self) -> bool {
        self.diff(None) == 0
    }

    /// Label for an action id.
    pub fn action_label(action: usize) -> Result<&'static str, CubeError> {
        ACTION_LABELS
            .get(action)
            .copied()
            .ok_or(CubeError::InvalidAction(action))
    }

    /// Parse a space-separated label string such as `"R U R' U'"`.
    pub fn parse_sequence(text: &str) -> Result<Vec<usize>, CubeError> {
        text.split_whitespace().map(action_by_label).collect()
    }

    /// Format an action sequence as a space-separated label string.
    pub fn format_sequence(sequence: &[usize]) -> Result<String, CubeError> {
        let labels = sequence
            .iter()
            .map(|&a| Self::action_label(a))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(labels.join(" "))
    }

    /// Unfolded net of the current coloring.
    ///
    /// ```text
    ///       U U U
    ///       U U U
    ///       U U U
    /// L L L F F F R R R B B B
    /// L L L F F F R R R B B B
    /// L L L F F F R R R B B B
    ///       D D D
    ///       D D D
    ///       D D D
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        let pad = " ".repeat(6);
        for row in 0..3 {
            out.push_str(&pad);
            out.push_str(&self.render_row(Face::Up, row));
            out.push('\n');
        }
        for row in 0..3 {
            let line = [Face::Left, Face::Front, Face::Right, Face::Back]
                .iter()
                .map(|&face| self.render_row(face, row))
                .collect::<Vec<_>>()
                .join(" ");
            out.push_str(&line);
            out.push('\n');
        }
        for row in 0..3 {
            out.push_str(&pad);
            out.push_str(&self.render_row(Face::Down, row));
            out.push('\n');
        }
        out
    }

    fn render_row(&self, face: Face, row: i8) -> String {
        (0..3i8)
            .map(|col| {
                let pos = net_position(face, row, col);
                self.geometry
                    .slot_of(pos, face.normal())
                    .and_then(|slot| Face::from_color(self.state[slot]))
                    .map_or('?', Face::letter)
            })
            .map(String::from)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Cubie position shown at `(row, col)` of `face` in the unfolded net.
fn net_position(face: Face, row: i8, col: i8) -> [i8; 3] {
    match face {
        Face::Up => [col - 1, 1, row - 1],
        Face::Down => [col - 1, -1, 1 - row],
        Face::Front => [col - 1, 1 - row, 1],
        Face::Back => [1 - col, 1 - row, -1],
        Face::Left => [-1, 1 - row, col - 1],
        Face::Right => [1, 1 - row, 1 - col],
    }
}

impl fmt::Debug for CubeEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CubeEnv")
            .field("diff", &self.diff(None))
            .field("history", &self.history)
            .finish()
    }
}

impl fmt::Display for CubeEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_new_is_solved() {
        let env = CubeEnv::new();
        assert!(env.is_solved());
        assert_eq!(env.diff(None), 0);
        assert!(env.sequence().is_empty());
    }

    #[test]
    fn test_single_turn_diff() {
        let mut env = CubeEnv::new();
        let done = env.step(1);
        assert!(!done);
        // 8 on the turned face keep their color; 12 ring facelets change.
        assert_eq!(env.diff(None), 12);
        assert_eq!(env.sequence(), &[1]);
    }

    #[test]
    fn test_step_then_inverse_restores() {
        let mut env = CubeEnv::new();
        for a in 0..NUM_ACTIONS {
            let before = *env.facelets();
            env.step(a);
            assert_ne!(*env.facelets(), before);
            env.step(CubeEnv::inverse(a));
            assert_eq!(*env.facelets(), before, "action {a}");
        }
    }

    #[test]
    fn test_undo_pops_history() {
        let mut env = CubeEnv::new();
        env.reset(&[0, 8]);
        let before = *env.facelets();
        env.step(3);
        env.undo(3);
        assert_eq!(env.facelets(), &before);
        assert_eq!(env.sequence(), &[0, 8]);

        // Undoing something other than the last action records the inverse.
        env.undo(0);
        assert_eq!(env.sequence(), &[0, 8, 6]);
    }

    #[test]
    fn test_four_turns_identity() {
        let mut env = CubeEnv::new();
        env.reset(&[2, 4]);
        let before = *env.facelets();
        for _ in 0..4 {
            env.step(3);
        }
        assert_eq!(*env.facelets(), before);
    }

    #[test]
    fn test_reversibility_random_sequences() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut env = CubeEnv::new();
        for _ in 0..200 {
            let len = rng.gen_range(0..=20);
            let seq: Vec<usize> = (0..len).map(|_| rng.gen_range(0..NUM_ACTIONS)).collect();
            env.reset(&seq);
            for a in 0..NUM_ACTIONS {
                let before = *env.facelets();
                env.step(a);
                env.step(CubeEnv::inverse(a));
                assert_eq!(*env.facelets(), before);
            }
        }
    }

    #[test]
    fn test_reset_replays_sequence() {
        let mut a = CubeEnv::new();
        a.reset(&[0, 2, 7]);
        let mut b = CubeEnv::new();
        b.step(0);
        b.step(2);
        b.step(7);
        assert_eq!(a.facelets(), b.facelets());
        assert_eq!(a.sequence(), &[0, 2, 7]);

        a.reset(&[]);
        assert!(a.is_solved());
        assert!(a.sequence().is_empty());
    }

    #[test]
    fn test_diff_against_baseline() {
        let mut env = CubeEnv::new();
        env.reset(&[0, 3, 5]);
        let baseline = *env.facelets();
        assert_eq!(env.diff(Some(&baseline)), 0);
        env.step(2);
        let moved = env.diff(Some(&baseline));
        assert!(moved > 0 && moved <= 20, "quarter turn moves at most 20 facelets, got {moved}");
        env.step(CubeEnv::inverse(2));
        assert_eq!(env.diff(Some(&baseline)), 0);
    }

    #[test]
    fn test_diff_bounded() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut env = CubeEnv::new();
        for _ in 0..100 {
            env.step(rng.gen_range(0..NUM_ACTIONS));
            assert!(env.diff(None) <= MAX_DIFF);
        }
    }

    #[test]
    fn test_parse_and_format_sequence() {
        let seq = CubeEnv::parse_sequence("R U R' U'").unwrap();
        assert_eq!(seq, vec![1, 2, 7, 8]);
        assert_eq!(CubeEnv::format_sequence(&seq).unwrap(), "R U R' U'");
        assert!(CubeEnv::parse_sequence("R X").is_err());
        assert!(CubeEnv::parse_sequence("").unwrap().is_empty());
    }

    #[test]
    fn test_sexy_move_order_six() {
        let seq = CubeEnv::parse_sequence("R U R' U'").unwrap();
        let mut env = CubeEnv::new();
        for _ in 0..6 {
            for &a in &seq {
                env.step(a);
            }
        }
        assert!(env.is_solved());
    }

    #[test]
    fn test_render_solved() {
        let env = CubeEnv::new();
        let text = env.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "      U U U");
        assert_eq!(lines[4], "L L L F F F R R R B B B");
        assert_eq!(lines[8], "      D D D");
    }

    #[test]
    fn test_render_after_turn_has_no_unknowns() {
        let mut env = CubeEnv::new();
        env.reset(&[1, 2, 4]);
        assert!(!env.render().contains('?'));
    }
}
