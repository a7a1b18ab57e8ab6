//! Backend-agnostic mixed-integer linear model.
//!
//! Formulations build a [`MilpModel`]; a [`MilpBackend`](super::MilpBackend)
//! translates it for a concrete solver. Variables are identified by
//! [`VarId`], a dense index into [`MilpModel::variables`].

use std::collections::BTreeMap;

/// Index of a variable in its model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Binary,
    Integer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDef {
    pub name: String,
    pub kind: VarKind,
    pub lower: f64,
    /// `None` means unbounded above.
    pub upper: Option<f64>,
}

/// `Σ coef · var + constant`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
    constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single variable with coefficient 1.
    pub fn var(var: VarId) -> Self {
        Self::new().term(var, 1.0)
    }

    pub fn term(mut self, var: VarId, coef: f64) -> Self {
        self.add_term(var, coef);
        self
    }

    pub fn plus(mut self, value: f64) -> Self {
        self.constant += value;
        self
    }

    pub fn add_term(&mut self, var: VarId, coef: f64) {
        if coef != 0.0 {
            self.terms.push((var, coef));
        }
    }

    /// Adds every term and the constant of `other`, scaled by `factor`.
    pub fn add_scaled(&mut self, other: &LinearExpr, factor: f64) {
        for &(v, c) in &other.terms {
            self.add_term(v, c * factor);
        }
        self.constant += other.constant * factor;
    }

    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn value(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(v, c)| c * values[v.index()])
            .sum::<f64>()
            + self.constant
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Le,
    Ge,
    Eq,
}

/// `expr (<= | >= | ==) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub expr: LinearExpr,
    pub sense: Sense,
    pub rhs: f64,
}

impl Constraint {
    pub fn is_satisfied(&self, values: &[f64], tol: f64) -> bool {
        let lhs = self.expr.value(values);
        match self.sense {
            Sense::Le => lhs <= self.rhs + tol,
            Sense::Ge => lhs >= self.rhs - tol,
            Sense::Eq => (lhs - self.rhs).abs() <= tol,
        }
    }
}

/// A minimization model.
#[derive(Debug, Clone, PartialEq)]
pub struct MilpModel {
    name: String,
    variables: Vec<VarDef>,
    constraints: Vec<Constraint>,
    objective: LinearExpr,
    warm_start: BTreeMap<VarId, f64>,
}

impl MilpModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: LinearExpr::new(),
            warm_start: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        self.push_var(VarDef {
            name: name.into(),
            kind: VarKind::Binary,
            lower: 0.0,
            upper: Some(1.0),
        })
    }

    pub fn add_integer(&mut self, name: impl Into<String>, lower: f64, upper: Option<f64>) -> VarId {
        self.push_var(VarDef {
            name: name.into(),
            kind: VarKind::Integer,
            lower,
            upper,
        })
    }

    fn push_var(&mut self, def: VarDef) -> VarId {
        self.variables.push(def);
        VarId(self.variables.len() - 1)
    }

    pub fn add_constraint(&mut self, expr: LinearExpr, sense: Sense, rhs: f64) {
        // Fold the constant into the right-hand side.
        let rhs = rhs - expr.constant;
        let expr = LinearExpr {
            constant: 0.0,
            ..expr
        };
        self.constraints.push(Constraint { expr, sense, rhs });
    }

    pub fn add_le(&mut self, expr: LinearExpr, rhs: f64) {
        self.add_constraint(expr, Sense::Le, rhs);
    }

    pub fn add_ge(&mut self, expr: LinearExpr, rhs: f64) {
        self.add_constraint(expr, Sense::Ge, rhs);
    }

    pub fn add_eq(&mut self, expr: LinearExpr, rhs: f64) {
        self.add_constraint(expr, Sense::Eq, rhs);
    }

    pub fn minimize(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    pub fn set_warm_start(&mut self, var: VarId, value: f64) {
        self.warm_start.insert(var, value);
    }

    pub fn variables(&self) -> &[VarDef] {
        &self.variables
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn warm_start(&self) -> &BTreeMap<VarId, f64> {
        &self.warm_start
    }

    /// Full assignment from the warm start; unset variables take their
    /// lower bound.
    pub fn warm_start_values(&self) -> Vec<f64> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, def)| self.warm_start.get(&VarId(i)).copied().unwrap_or(def.lower))
            .collect()
    }

    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.objective.value(values)
    }

    /// Index of the first violated constraint, or `None`.
    ///
    /// Bounds and integrality are checked first and reported as
    /// `Some(usize::MAX)`.
    pub fn first_violation(&self, values: &[f64], tol: f64) -> Option<usize> {
        if values.len() != self.variables.len() {
            return Some(usize::MAX);
        }
        let in_domain = self.variables.iter().zip(values).all(|(def, &v)| {
            v >= def.lower - tol
                && def.upper.map_or(true, |ub| v <= ub + tol)
                && (v - v.round()).abs() <= tol
        });
        if !in_domain {
            return Some(usize::MAX);
        }
        self.constraints
            .iter()
            .position(|c| !c.is_satisfied(values, tol))
    }

    pub fn is_satisfied(&self, values: &[f64], tol: f64) -> bool {
        self.first_violation(values, tol).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knapsack() -> (MilpModel, VarId, VarId) {
        let mut m = MilpModel::new("test");
        let a = m.add_binary("a");
        let b = m.add_integer("b", 0.0, Some(5.0));
        m.add_le(LinearExpr::var(a).term(b, 2.0), 6.0);
        m.add_ge(LinearExpr::var(b).plus(1.0), 2.0);
        m.minimize(LinearExpr::var(a).term(b, -1.0));
        (m, a, b)
    }

    #[test]
    fn test_constant_folds_into_rhs() {
        let (m, _, _) = knapsack();
        let c = &m.constraints()[1];
        assert_eq!(c.expr.constant(), 0.0);
        assert_eq!(c.rhs, 1.0);
    }

    #[test]
    fn test_is_satisfied() {
        let (m, _, _) = knapsack();
        assert!(m.is_satisfied(&[0.0, 3.0], 1e-9));
        assert!(m.is_satisfied(&[1.0, 2.0], 1e-9));
        assert_eq!(m.first_violation(&[1.0, 3.0], 1e-9), Some(0));
        assert_eq!(m.first_violation(&[0.0, 0.0], 1e-9), Some(1));
    }

    #[test]
    fn test_domain_violations() {
        let (m, _, _) = knapsack();
        // Fractional value
        assert_eq!(m.first_violation(&[0.5, 2.0], 1e-9), Some(usize::MAX));
        // Above the upper bound
        assert_eq!(m.first_violation(&[0.0, 6.0], 1e-9), Some(usize::MAX));
        // Wrong length
        assert!(!m.is_satisfied(&[0.0], 1e-9));
    }

    #[test]
    fn test_evaluate_and_warm_start() {
        let (mut m, a, b) = knapsack();
        assert_eq!(m.evaluate(&[1.0, 2.0]), -1.0);
        m.set_warm_start(b, 3.0);
        assert_eq!(m.warm_start_values(), vec![0.0, 3.0]);
        assert_eq!(m.warm_start().get(&a), None);
    }

    #[test]
    fn test_equality_constraint() {
        let (mut m, a, b) = knapsack();
        let before = m.clone();
        m.add_eq(LinearExpr::var(a).term(b, 1.0), 3.0);
        assert_ne!(m, before);
        assert_eq!(m.constraints().len(), 3);
        assert_eq!(m.constraints()[2].sense, Sense::Eq);
        assert!(m.is_satisfied(&[1.0, 2.0], 1e-9));
        assert_eq!(m.first_violation(&[0.0, 2.0], 1e-9), Some(2));
    }

    #[test]
    fn test_zero_coefficients_dropped() {
        let mut m = MilpModel::new("z");
        let a = m.add_binary("a");
        let e = LinearExpr::new().term(a, 0.0).plus(2.0);
        assert!(e.terms().is_empty());
        assert_eq!(e.value(&[1.0]), 2.0);
    }
}
