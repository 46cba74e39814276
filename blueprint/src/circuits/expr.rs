//! Polynomial constraint expressions over table cells.
//!
//! A gate constraint is an [`Expr`] built from cell references and field
//! constants with `+`, `-`, `*` and unary negation. The expression is
//! satisfied at a row when it evaluates to zero with its relative variables
//! resolved against that row.

use crate::circuits::variable::Variable;
use ark_ff::Field;
use std::{
    collections::BTreeSet,
    fmt,
    ops::{Add, Mul, Neg, Sub},
};

/// A polynomial expression over table cells
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr<F> {
    Constant(F),
    Cell(Variable),
    Add(Box<Expr<F>>, Box<Expr<F>>),
    Sub(Box<Expr<F>>, Box<Expr<F>>),
    Mul(Box<Expr<F>>, Box<Expr<F>>),
    Neg(Box<Expr<F>>),
}

impl<F: Field> Expr<F> {
    pub fn constant(value: F) -> Self {
        Expr::Constant(value)
    }

    pub fn cell(var: Variable) -> Self {
        Expr::Cell(var)
    }

    pub fn zero() -> Self {
        Expr::Constant(F::zero())
    }

    pub fn one() -> Self {
        Expr::Constant(F::one())
    }

    /// `self * value`
    pub fn scale(self, value: F) -> Self {
        Expr::Constant(value) * self
    }

    /// `self * (self - 1)`, which vanishes iff `self` is 0 or 1
    pub fn boolean(self) -> Self {
        self.clone() * (self - Expr::one())
    }

    /// Total degree of the expression, counting every cell as degree one
    pub fn degree(&self) -> usize {
        match self {
            Expr::Constant(_) => 0,
            Expr::Cell(_) => 1,
            Expr::Add(a, b) | Expr::Sub(a, b) => a.degree().max(b.degree()),
            Expr::Mul(a, b) => a.degree() + b.degree(),
            Expr::Neg(a) => a.degree(),
        }
    }

    /// Every cell referenced by the expression
    pub fn cells(&self) -> BTreeSet<Variable> {
        let mut cells = BTreeSet::new();
        self.collect_cells(&mut cells);
        cells
    }

    fn collect_cells(&self, cells: &mut BTreeSet<Variable>) {
        match self {
            Expr::Constant(_) => {}
            Expr::Cell(var) => {
                cells.insert(*var);
            }
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) => {
                a.collect_cells(cells);
                b.collect_cells(cells);
            }
            Expr::Neg(a) => a.collect_cells(cells),
        }
    }

    /// Evaluates the expression, reading cells through `cell`
    pub fn evaluate<E>(&self, cell: &impl Fn(&Variable) -> Result<F, E>) -> Result<F, E> {
        Ok(match self {
            Expr::Constant(c) => *c,
            Expr::Cell(var) => cell(var)?,
            Expr::Add(a, b) => a.evaluate(cell)? + b.evaluate(cell)?,
            Expr::Sub(a, b) => a.evaluate(cell)? - b.evaluate(cell)?,
            Expr::Mul(a, b) => a.evaluate(cell)? * b.evaluate(cell)?,
            Expr::Neg(a) => -a.evaluate(cell)?,
        })
    }
}

impl<F> From<Variable> for Expr<F> {
    fn from(var: Variable) -> Self {
        Expr::Cell(var)
    }
}

impl<F> Add for Expr<F> {
    type Output = Expr<F>;

    fn add(self, other: Self) -> Self {
        Expr::Add(Box::new(self), Box::new(other))
    }
}

impl<F> Sub for Expr<F> {
    type Output = Expr<F>;

    fn sub(self, other: Self) -> Self {
        Expr::Sub(Box::new(self), Box::new(other))
    }
}

impl<F> Mul for Expr<F> {
    type Output = Expr<F>;

    fn mul(self, other: Self) -> Self {
        Expr::Mul(Box::new(self), Box::new(other))
    }
}

impl<F> Neg for Expr<F> {
    type Output = Expr<F>;

    fn neg(self) -> Self {
        Expr::Neg(Box::new(self))
    }
}

impl<F: fmt::Display> fmt::Display for Expr<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(c) => write!(f, "{c}"),
            Expr::Cell(var) => write!(f, "{var}"),
            Expr::Add(a, b) => write!(f, "({a} + {b})"),
            Expr::Sub(a, b) => write!(f, "({a} - {b})"),
            Expr::Mul(a, b) => write!(f, "{a} * {b}"),
            Expr::Neg(a) => write!(f, "-{a}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr as Fp;
    use ark_ff::{One, Zero};
    use std::convert::Infallible;

    fn w(i: usize) -> Expr<Fp> {
        Variable::witness_rel(i, 0).into()
    }

    #[test]
    fn degree() {
        assert_eq!(Expr::<Fp>::one().degree(), 0);
        assert_eq!(w(0).degree(), 1);
        assert_eq!((w(0) * w(1) + w(2)).degree(), 2);
        assert_eq!(w(0).boolean().degree(), 2);
        assert_eq!((w(0) * w(1) * w(2)).scale(Fp::from(3u64)).degree(), 3);
    }

    #[test]
    fn evaluate() {
        // cell i holds i + 1
        let read = |var: &Variable| -> Result<Fp, Infallible> { Ok(Fp::from(var.index as u64 + 1)) };

        let expr = w(0) * w(1) - w(2).scale(Fp::from(2u64)) + -w(0);
        // 1 * 2 - 2 * 3 - 1
        assert_eq!(expr.evaluate(&read), Ok(-Fp::from(5u64)));

        assert_eq!(w(0).boolean().evaluate(&read), Ok(Fp::zero()));
        assert_eq!(w(1).boolean().evaluate(&read), Ok(Fp::from(2u64)));
    }

    #[test]
    fn cells() {
        let expr = w(0) * w(1) + w(0) - Expr::constant(Fp::one());
        let cells = expr.cells();
        assert_eq!(cells.len(), 2);
        assert!(cells.contains(&Variable::witness_rel(1, 0)));
    }
}
