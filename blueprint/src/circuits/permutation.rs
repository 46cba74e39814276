//! Copy-constraint equivalence classes.
//!
//! The permutation argument of a PLONK backend needs, for every cell, the
//! cycle of cells it is wired to. Chains of copy constraints collapse into one
//! class here, with a union-find over the constrained cells.

use crate::circuits::{gate::CopyConstraint, variable::Variable};
use std::collections::{BTreeMap, HashMap};

/// Union-find over the cells touched by copy constraints
#[derive(Clone, Debug, Default)]
pub struct CopyClasses {
    index: HashMap<Variable, usize>,
    cells: Vec<Variable>,
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl CopyClasses {
    pub fn new(constraints: &[CopyConstraint]) -> Self {
        let mut classes = Self::default();
        for CopyConstraint(a, b) in constraints {
            classes.union(*a, *b);
        }
        classes
    }

    fn id(&mut self, var: Variable) -> usize {
        if let Some(id) = self.index.get(&var) {
            return *id;
        }
        let id = self.cells.len();
        self.index.insert(var, id);
        self.cells.push(var);
        self.parent.push(id);
        self.rank.push(0);
        id
    }

    fn find(&mut self, mut id: usize) -> usize {
        while self.parent[id] != id {
            // path halving
            self.parent[id] = self.parent[self.parent[id]];
            id = self.parent[id];
        }
        id
    }

    pub fn union(&mut self, a: Variable, b: Variable) {
        let (a, b) = (self.id(a), self.id(b));
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }

    /// Returns true when `a` and `b` are in the same class
    pub fn connected(&mut self, a: &Variable, b: &Variable) -> bool {
        match (self.index.get(a).copied(), self.index.get(b).copied()) {
            (Some(a), Some(b)) => self.find(a) == self.find(b),
            _ => a == b,
        }
    }

    /// All classes, each sorted, in a deterministic order
    pub fn classes(&mut self) -> Vec<Vec<Variable>> {
        let mut classes: BTreeMap<Variable, Vec<Variable>> = BTreeMap::new();
        let mut by_root: HashMap<usize, Vec<Variable>> = HashMap::new();
        for id in 0..self.cells.len() {
            let root = self.find(id);
            by_root.entry(root).or_default().push(self.cells[id]);
        }
        for (_, mut class) in by_root {
            class.sort();
            classes.insert(class[0], class);
        }
        classes.into_values().collect()
    }
}
