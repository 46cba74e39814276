//! Manifests describe a component's resource shape before any layout exists.
//!
//! A component first states which witness-column counts it can be laid out
//! over ([`ManifestParam`]). Once a count is chosen, its [`Manifest`] gives
//! the resolved shape: columns, rows, gates and whether lookups are used.
//! Both are pure functions of static parameters.

use serde::{Deserialize, Serialize};

/// The witness-column counts a component accepts
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManifestParam {
    /// Exactly this many columns
    Single(usize),
    /// Any count in `[min, max]`, unbounded above when `max` is `None`
    Range { min: usize, max: Option<usize> },
    /// Any of these counts
    Set(Vec<usize>),
}

impl ManifestParam {
    /// Returns true when the component can be laid out over `columns` columns
    pub fn accepts(&self, columns: usize) -> bool {
        match self {
            ManifestParam::Single(n) => *n == columns,
            ManifestParam::Range { min, max } => {
                columns >= *min && max.map_or(true, |max| columns <= max)
            }
            ManifestParam::Set(set) => set.contains(&columns),
        }
    }

    /// The widest acceptable count that fits in `available` columns
    pub fn choose(&self, available: usize) -> Option<usize> {
        match self {
            ManifestParam::Single(n) => (*n <= available).then_some(*n),
            ManifestParam::Range { min, max } => {
                let top = max.map_or(available, |max| max.min(available));
                (top >= *min).then_some(top)
            }
            ManifestParam::Set(set) => set.iter().copied().filter(|n| *n <= available).max(),
        }
    }

    /// The counts accepted by both `self` and `other`
    pub fn intersect(&self, other: &ManifestParam) -> ManifestParam {
        use ManifestParam::*;
        match (self, other) {
            (Single(n), other) | (other, Single(n)) => {
                if other.accepts(*n) {
                    Single(*n)
                } else {
                    Set(vec![])
                }
            }
            (Set(set), other) | (other, Set(set)) => {
                Set(set.iter().copied().filter(|n| other.accepts(*n)).collect())
            }
            (Range { min: a, max: x }, Range { min: b, max: y }) => Range {
                min: *a.max(b),
                max: match (x, y) {
                    (Some(x), Some(y)) => Some(*x.min(y)),
                    (Some(m), None) | (None, Some(m)) => Some(*m),
                    (None, None) => None,
                },
            },
        }
    }

    /// Picks one column count acceptable to every requirement, as wide as
    /// possible within `available`
    pub fn negotiate(requirements: &[ManifestParam], available: usize) -> Option<usize> {
        let merged = requirements
            .iter()
            .fold(ManifestParam::Range { min: 0, max: None }, |acc, req| {
                acc.intersect(req)
            });
        merged.choose(available)
    }
}

/// The resolved shape of a component for a chosen witness-column count
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Manifest {
    pub witness_columns: usize,
    pub constant_columns: usize,
    pub public_input_columns: usize,
    pub rows: usize,
    pub gate_count: usize,
    pub needs_lookup: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn choose() {
        assert_eq!(ManifestParam::Single(5).choose(15), Some(5));
        assert_eq!(ManifestParam::Single(5).choose(4), None);
        assert_eq!(ManifestParam::Set(vec![9, 15]).choose(12), Some(9));
        assert_eq!(ManifestParam::Set(vec![9, 15]).choose(8), None);
        assert_eq!(
            ManifestParam::Range { min: 5, max: None }.choose(15),
            Some(15)
        );
        assert_eq!(
            ManifestParam::Range {
                min: 5,
                max: Some(13)
            }
            .choose(15),
            Some(13)
        );
    }

    #[test]
    fn negotiate() {
        let requirements = [
            ManifestParam::Single(5),
            ManifestParam::Range { min: 5, max: None },
        ];
        assert_eq!(ManifestParam::negotiate(&requirements, 15), Some(5));

        let requirements = [
            ManifestParam::Set(vec![9, 15]),
            ManifestParam::Range { min: 5, max: None },
        ];
        assert_eq!(ManifestParam::negotiate(&requirements, 15), Some(15));
        assert_eq!(ManifestParam::negotiate(&requirements, 14), Some(9));

        let requirements = [ManifestParam::Set(vec![9, 15]), ManifestParam::Single(5)];
        assert_eq!(ManifestParam::negotiate(&requirements, 15), None);
    }

    proptest! {
        #[test]
        fn chosen_counts_are_accepted(
            min in 0usize..20,
            span in 0usize..20,
            available in 0usize..40,
        ) {
            let param = ManifestParam::Range { min, max: Some(min + span) };
            if let Some(n) = param.choose(available) {
                prop_assert!(param.accepts(n));
                prop_assert!(n <= available);
            } else {
                prop_assert!(available < min);
            }
        }
    }
}
