mod error;
mod model;
#[cfg(feature = "serde")]
mod serde_bounds;

pub use error::ModelError;
pub use model::{Constraint, ConstraintId, Model, Objective, Relation, Sense, VarId, VarKey, Variable};
