use linprog_model::{ConstraintId, VarId};

/// The result of a successful solve
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Optimal objective value, evaluated with the model's own coefficients
    pub objective_value: f64,
    /// Variable identifiers in declaration order
    pub variables: Vec<String>,
    /// Optimal value for each variable, indexed like `variables`
    pub values: Vec<f64>,
    /// Left-hand side value of each constraint, in insertion order
    pub activities: Vec<f64>,
    /// Simplex pivots performed across both phases
    pub iterations: usize,
}

impl Solution {
    /// Value of a variable of the solved model.
    ///
    /// # Panics
    ///
    /// Panics if `var` was issued by a model with fewer variables.
    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.index()]
    }

    /// Look up a value by variable identifier
    pub fn get(&self, name: &str) -> Option<f64> {
        self.variables
            .iter()
            .position(|v| v == name)
            .map(|i| self.values[i])
    }

    /// Left-hand side value of a constraint of the solved model.
    ///
    /// # Panics
    ///
    /// Panics if `constraint` was issued by a model with fewer constraints.
    pub fn activity(&self, constraint: ConstraintId) -> f64 {
        self.activities[constraint.index()]
    }

    /// `(identifier, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.variables
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}
