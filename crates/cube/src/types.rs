use std::fmt;

/// Number of primitive actions (6 faces x 2 directions).
pub const NUM_ACTIONS: usize = 12;

/// Labels indexed by action id. Ids `0..6` are clockwise quarter turns,
/// ids `6..12` the matching counter-clockwise turns, so the inverse of
/// action `a` is always `(a + 6) % 12`.
pub const ACTION_LABELS: [&str; NUM_ACTIONS] = [
    "L", "R", "U", "D", "F", "B", "L'", "R'", "U'", "D'", "F'", "B'",
];

/// Errors that can occur when interpreting cube input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CubeError {
    /// A move label that is not part of the action table.
    #[error("unknown action label '{0}'")]
    UnknownAction(String),

    /// An action id outside `0..NUM_ACTIONS`.
    #[error("action id {0} out of range (expected < {NUM_ACTIONS})")]
    InvalidAction(usize),
}

/// A face of the cube. Also used as the facelet color: in the solved
/// configuration every facelet carries the color of the face it sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    Front = 4,
    Back = 5,
}

impl Face {
    /// All faces in color order.
    pub const ALL: [Face; 6] = [
        Face::Up,
        Face::Down,
        Face::Left,
        Face::Right,
        Face::Front,
        Face::Back,
    ];

    /// Outward normal of this face as an integer vector.
    pub fn normal(self) -> [i8; 3] {
        match self {
            Face::Up => [0, 1, 0],
            Face::Down => [0, -1, 0],
            Face::Left => [-1, 0, 0],
            Face::Right => [1, 0, 0],
            Face::Front => [0, 0, 1],
            Face::Back => [0, 0, -1],
        }
    }

    /// Axis index (0 = x, 1 = y, 2 = z) and sign of the outward normal.
    pub fn axis(self) -> (usize, i8) {
        let n = self.normal();
        let axis = n.iter().position(|&c| c != 0).unwrap_or(0);
        (axis, n[axis])
    }

    /// Single-letter name, also used to render facelet colors.
    pub fn letter(self) -> char {
        match self {
            Face::Up => 'U',
            Face::Down => 'D',
            Face::Left => 'L',
            Face::Right => 'R',
            Face::Front => 'F',
            Face::Back => 'B',
        }
    }

    /// Face for a color byte, if valid.
    pub fn from_color(color: u8) -> Option<Face> {
        Face::ALL.get(color as usize).copied()
    }

    /// Face turned by the given action id.
    pub fn of_action(action: usize) -> Result<Face, CubeError> {
        if action >= NUM_ACTIONS {
            return Err(CubeError::InvalidAction(action));
        }
        Ok(match action % 6 {
            0 => Face::Left,
            1 => Face::Right,
            2 => Face::Up,
            3 => Face::Down,
            4 => Face::Front,
            _ => Face::Back,
        })
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Look up an action id by its label.
pub fn action_by_label(label: &str) -> Result<usize, CubeError> {
    ACTION_LABELS
        .iter()
        .position(|&l| l == label)
        .ok_or_else(|| CubeError::UnknownAction(label.to_string()))
}

/// Whether `action` turns clockwise (ids `0..6`).
pub fn is_clockwise(action: usize) -> bool {
    action < NUM_ACTIONS / 2
}
