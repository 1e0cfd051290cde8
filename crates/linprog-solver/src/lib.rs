//! Two-phase simplex solver for [`linprog_model`] models.
//!
//! ```
//! use linprog_solver::{Model, Relation, Sense, Solver};
//!
//! let mut model = Model::new();
//! let x = model.add_variable("x").unwrap();
//! let y = model.add_variable("y").unwrap();
//! model.add_constraint([(x, 1.0), (y, 1.0)], Relation::Le, 4.0).unwrap();
//! model.set_objective([(x, 3.0), (y, 2.0)], Sense::Maximize).unwrap();
//!
//! let solution = Solver::new().solve(&model).unwrap();
//! assert!((solution.objective_value - 12.0).abs() < 1e-9);
//! ```

mod error;
mod simplex;
mod solution;
mod standard;
mod tableau;

pub use error::SolveError;
pub use linprog_model::{
    Constraint, ConstraintId, Model, ModelError, Objective, Relation, Sense, VarId, VarKey, Variable,
};
pub use simplex::Solver;
pub use solution::Solution;

/// Solve with default options
pub fn solve(model: &Model) -> Result<Solution, SolveError> {
    Solver::new().solve(model)
}
