//! Facelet geometry and precomputed move permutations.
//!
//! Every facelet is identified by the cubie position it sits on (each
//! coordinate in `{-1, 0, 1}`) together with its outward normal. A quarter
//! turn rotates both vectors 90 degrees about the face axis; the resulting
//! slot mapping is stored as a gather permutation so applying a move is a
//! single pass over the 54 facelets.

use std::sync::OnceLock;

use crate::types::{is_clockwise, Face, NUM_ACTIONS};

/// Number of facelets on the cube.
pub const NUM_FACELETS: usize = 54;

/// Index of the centre facelet within a face's block of nine.
const CENTRE: usize = 4;

type Vec3 = [i8; 3];

/// Static sticker layout and move tables.
pub struct Geometry {
    positions: [Vec3; NUM_FACELETS],
    normals: [Vec3; NUM_FACELETS],
    /// `moves[a][slot]` is the slot whose color lands in `slot` after action `a`.
    moves: [[u8; NUM_FACELETS]; NUM_ACTIONS],
}

impl Geometry {
    /// Shared instance, built on first use.
    pub fn get() -> &'static Geometry {
        static GEOMETRY: OnceLock<Geometry> = OnceLock::new();
        GEOMETRY.get_or_init(Geometry::build)
    }

    fn build() -> Self {
        let mut positions = [[0i8; 3]; NUM_FACELETS];
        let mut normals = [[0i8; 3]; NUM_FACELETS];

        for face in Face::ALL {
            let (axis, sign) = face.axis();
            let (u, v) = other_axes(axis);
            for a in -1i8..=1 {
                for b in -1i8..=1 {
                    let slot = face as usize * 9 + ((a + 1) * 3 + (b + 1)) as usize;
                    let mut pos = [0i8; 3];
                    pos[axis] = sign;
                    pos[u] = a;
                    pos[v] = b;
                    positions[slot] = pos;
                    normals[slot] = face.normal();
                }
            }
        }

        let mut geometry = Geometry {
            positions,
            normals,
            moves: [[0u8; NUM_FACELETS]; NUM_ACTIONS],
        };

        for action in 0..NUM_ACTIONS {
            let face = Face::of_action(action).expect("action id within table");
            let (axis, sign) = face.axis();
            // Clockwise as seen from outside the face is -90 degrees about the
            // outward normal.
            let quarter_turns = match (is_clockwise(action), sign > 0) {
                (true, true) | (false, false) => 3,
                (true, false) | (false, true) => 1,
            };

            let mut table = [0u8; NUM_FACELETS];
            for (slot, entry) in table.iter_mut().enumerate() {
                *entry = slot as u8;
            }
            for src in 0..NUM_FACELETS {
                if geometry.positions[src][axis] != sign {
                    continue;
                }
                let pos = rotate(geometry.positions[src], axis, quarter_turns);
                let normal = rotate(geometry.normals[src], axis, quarter_turns);
                let dst = geometry
                    .slot_of(pos, normal)
                    .expect("rotated facelet maps onto the cube surface");
                table[dst] = src as u8;
            }
            geometry.moves[action] = table;
        }

        tracing::debug!(
            facelets = NUM_FACELETS,
            actions = NUM_ACTIONS,
            "Built cube move tables"
        );
        geometry
    }

    /// Slot index of the facelet at `pos` facing `normal`.
    pub fn slot_of(&self, pos: Vec3, normal: Vec3) -> Option<usize> {
        (0..NUM_FACELETS).find(|&i| self.positions[i] == pos && self.normals[i] == normal)
    }

    /// Gather permutation for `action`.
    pub fn permutation(&self, action: usize) -> &[u8; NUM_FACELETS] {
        &self.moves[action]
    }

    /// Whether `slot` is a face centre (centres never move).
    pub fn is_centre(slot: usize) -> bool {
        slot % 9 == CENTRE
    }

    /// Solved coloring: each facelet carries its face's color.
    pub fn solved() -> [u8; NUM_FACELETS] {
        let mut state = [0u8; NUM_FACELETS];
        for (slot, color) in state.iter_mut().enumerate() {
            *color = (slot / 9) as u8;
        }
        state
    }
}

fn other_axes(axis: usize) -> (usize, usize) {
    match axis {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    }
}

/// Rotate `v` by `quarter_turns` x 90 degrees counter-clockwise about `axis`.
fn rotate(v: Vec3, axis: usize, quarter_turns: u8) -> Vec3 {
    let mut out = v;
    for _ in 0..quarter_turns {
        let [x, y, z] = out;
        out = match axis {
            0 => [x, -z, y],
            1 => [z, y, -x],
            _ => [-y, x, z],
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_full_circle() {
        let v = [1, -1, 0];
        for axis in 0..3 {
            assert_eq!(rotate(v, axis, 4), v);
        }
    }

    #[test]
    fn test_rotate_about_y() {
        // +x rotates towards -z for a counter-clockwise quarter turn about +y.
        assert_eq!(rotate([1, 0, 0], 1, 1), [0, 0, -1]);
    }

    #[test]
    fn test_every_move_is_a_permutation() {
        let g = Geometry::get();
        for action in 0..NUM_ACTIONS {
            let mut seen = [false; NUM_FACELETS];
            for &src in g.permutation(action) {
                assert!(!seen[src as usize], "action {action} maps two slots from {src}");
                seen[src as usize] = true;
            }
        }
    }

    #[test]
    fn test_move_touches_twenty_facelets() {
        let g = Geometry::get();
        for action in 0..NUM_ACTIONS {
            let moved = g
                .permutation(action)
                .iter()
                .enumerate()
                .filter(|(dst, &src)| *dst != src as usize)
                .count();
            // 8 on the turned face (centre stays) + 12 on the adjacent ring.
            assert_eq!(moved, 20, "action {action}");
        }
    }

    #[test]
    fn test_centres_fixed() {
        let g = Geometry::get();
        for action in 0..NUM_ACTIONS {
            for face in 0..6 {
                let centre = face * 9 + CENTRE;
                assert_eq!(g.permutation(action)[centre] as usize, centre);
            }
        }
    }

    #[test]
    fn test_solved_layout() {
        let s = Geometry::solved();
        assert_eq!(s[0], 0);
        assert_eq!(s[53], 5);
        assert!(Geometry::is_centre(4));
        assert!(Geometry::is_centre(49));
        assert!(!Geometry::is_centre(5));
    }
}
