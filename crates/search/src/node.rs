use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::simulator::Action;

/// A node in the macro-learning search tree.
///
/// Nodes are stored in the learner's fringe and visited tables, keyed by
/// the canonical [`StateKey`](crate::StateKey) of the state they reach.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchNode {
    /// `h + g`: net effect against the base state plus path length.
    /// Infinite for the root.
    pub f: OrderedFloat<f64>,
    /// Actions from the learning root to this state.
    pub actions: Vec<Action>,
}

impl SearchNode {
    /// The learning root: empty path, infinite cost.
    pub fn root() -> Self {
        Self {
            f: OrderedFloat(f64::INFINITY),
            actions: Vec::new(),
        }
    }

    /// Node reached by `actions` with net effect `h`.
    pub fn new(actions: Vec<Action>, h: u32) -> Self {
        let g = actions.len();
        Self {
            f: OrderedFloat(f64::from(h) + g as f64),
            actions,
        }
    }

    /// Path length from the root.
    pub fn g(&self) -> usize {
        self.actions.len()
    }

    /// `f - g`: distance of this state from the base state.
    pub fn net_effect(&self) -> OrderedFloat<f64> {
        OrderedFloat(self.f.0 - self.g() as f64)
    }

    /// Retention order: net effect, then path length.
    pub fn rank(&self) -> (OrderedFloat<f64>, usize) {
        (self.net_effect(), self.g())
    }

    /// True if `self` ranks ahead of `other`: smaller net effect, then
    /// shorter path.
    pub fn better_than(&self, other: &SearchNode) -> bool {
        self.rank() < other.rank()
    }

    pub fn is_root(&self) -> bool {
        self.actions.is_empty()
    }
}

/// A fixed, non-empty sequence of primitive actions applied as one step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Macro {
    /// Primitive actions in application order.
    pub actions: Vec<Action>,
    /// Net effect measured when the macro was learned (lower = more focused).
    pub net_effect: u32,
}

impl Macro {
    pub fn new(actions: Vec<Action>, net_effect: u32) -> Self {
        Self {
            actions,
            net_effect,
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Ordered collection of learned macros.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroSet {
    macros: Vec<Macro>,
}

impl MacroSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `m`, ignoring empty macros and exact duplicates.
    pub fn push(&mut self, m: Macro) -> bool {
        if m.is_empty() || self.macros.iter().any(|x| x.actions == m.actions) {
            return false;
        }
        self.macros.push(m);
        true
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Macro> {
        self.macros.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Macro> {
        self.macros.get(index)
    }

    /// Length of the longest macro, 0 if empty.
    pub fn max_len(&self) -> usize {
        self.macros.iter().map(Macro::len).max().unwrap_or(0)
    }
}

impl FromIterator<Macro> for MacroSet {
    fn from_iter<I: IntoIterator<Item = Macro>>(iter: I) -> Self {
        let mut set = MacroSet::new();
        for m in iter {
            set.push(m);
        }
        set
    }
}

impl<'a> IntoIterator for &'a MacroSet {
    type Item = &'a Macro;
    type IntoIter = std::slice::Iter<'a, Macro>;

    fn into_iter(self) -> Self::IntoIter {
        self.macros.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_node() {
        let root = SearchNode::root();
        assert!(root.is_root());
        assert_eq!(root.g(), 0);
        assert!(root.f.0.is_infinite());
        assert!(root.net_effect().0.is_infinite());
    }

    #[test]
    fn test_node_cost() {
        let node = SearchNode::new(vec![1, 2, 3], 8);
        assert_eq!(node.f, OrderedFloat(11.0));
        assert_eq!(node.net_effect(), OrderedFloat(8.0));
        assert_eq!(node.g(), 3);
        assert_eq!(node.rank(), (OrderedFloat(8.0), 3));
    }

    #[test]
    fn test_better_than() {
        let short = SearchNode::new(vec![1, 2], 6);
        let long = SearchNode::new(vec![1, 2, 3, 4], 6);
        let focused = SearchNode::new(vec![1, 2, 3, 4], 4);
        assert!(short.better_than(&long));
        assert!(!long.better_than(&short));
        assert!(focused.better_than(&short));
        assert!(short.better_than(&SearchNode::root()));
    }

    #[test]
    fn test_macro_set_dedup() {
        let mut set = MacroSet::new();
        assert!(set.push(Macro::new(vec![1, 2], 4)));
        assert!(!set.push(Macro::new(vec![1, 2], 4)));
        assert!(!set.push(Macro::new(vec![], 0)));
        assert!(set.push(Macro::new(vec![3], 12)));
        assert_eq!(set.len(), 2);
        assert_eq!(set.max_len(), 2);
    }

    #[test]
    fn test_macro_set_from_iter_keeps_order() {
        let set: MacroSet = vec![
            Macro::new(vec![5, 1, 2], 6),
            Macro::new(vec![0], 12),
            Macro::new(vec![5, 1, 2], 6),
        ]
        .into_iter()
        .collect();
        let lens: Vec<usize> = set.iter().map(Macro::len).collect();
        assert_eq!(lens, vec![3, 1]);
        assert_eq!(set.get(1).map(|m| m.net_effect), Some(12));
    }
}
