use std::collections::HashMap;
use std::fmt;

use crate::error::ModelError;

/// Handle to a variable declared in a [`Model`]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    /// Position of the variable in declaration order
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a constraint added to a [`Model`]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(usize);

impl ConstraintId {
    /// Position of the constraint in insertion order
    pub fn index(self) -> usize {
        self.0
    }
}

/// A decision variable with its bounds
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Identifier, unique within the model
    pub name: String,
    /// Lower bound (may be `-inf`)
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_bounds::lower"))]
    pub lower: f64,
    /// Upper bound (may be `+inf`)
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_bounds::upper"))]
    pub upper: f64,
}

impl Variable {
    /// Whether `value` lies within the bounds, up to `tolerance`
    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        value >= self.lower - tolerance && value <= self.upper + tolerance
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (=)
    Eq,
}

impl Relation {
    /// The relation that holds after multiplying both sides by -1
    pub fn reversed(self) -> Self {
        match self {
            Relation::Le => Relation::Ge,
            Relation::Ge => Relation::Le,
            Relation::Eq => Relation::Eq,
        }
    }

    /// Whether `lhs <relation> rhs` holds within `tolerance`
    pub fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            Relation::Le => lhs <= rhs + tolerance,
            Relation::Ge => lhs >= rhs - tolerance,
            Relation::Eq => (lhs - rhs).abs() <= tolerance,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Relation::Le => "<=",
            Relation::Ge => ">=",
            Relation::Eq => "=",
        };
        f.write_str(symbol)
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sense {
    Maximize,
    Minimize,
}

/// A linear constraint `sum(coefficient * variable) <relation> rhs`
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Optional label for diagnostics
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    /// Sparse coefficient row, one entry per referenced variable
    pub terms: Vec<(VarId, f64)>,
    pub relation: Relation,
    pub rhs: f64,
}

impl Constraint {
    /// Left-hand side value for an assignment indexed by [`VarId`]
    pub fn activity(&self, values: &[f64]) -> f64 {
        linear_value(&self.terms, values)
    }

    /// Whether an assignment indexed by [`VarId`] satisfies the constraint
    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        self.relation.holds(self.activity(values), self.rhs, tolerance)
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub terms: Vec<(VarId, f64)>,
    pub sense: Sense,
}

impl Objective {
    /// Objective value for an assignment indexed by [`VarId`]
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        linear_value(&self.terms, values)
    }
}

fn linear_value(terms: &[(VarId, f64)], values: &[f64]) -> f64 {
    terms
        .iter()
        .map(|&(var, coefficient)| coefficient * values.get(var.0).copied().unwrap_or(0.0))
        .sum()
}

/// Anything that names a variable of a model: its handle or its identifier
pub trait VarKey {
    fn resolve(&self, model: &Model) -> Result<VarId, ModelError>;
}

impl VarKey for VarId {
    fn resolve(&self, model: &Model) -> Result<VarId, ModelError> {
        if self.0 < model.variables.len() {
            Ok(*self)
        } else {
            Err(ModelError::UnknownVariable(format!("#{}", self.0)))
        }
    }
}

impl VarKey for str {
    fn resolve(&self, model: &Model) -> Result<VarId, ModelError> {
        model
            .var_id(self)
            .ok_or_else(|| ModelError::UnknownVariable(self.to_string()))
    }
}

impl VarKey for String {
    fn resolve(&self, model: &Model) -> Result<VarId, ModelError> {
        self.as_str().resolve(model)
    }
}

impl<K: VarKey + ?Sized> VarKey for &K {
    fn resolve(&self, model: &Model) -> Result<VarId, ModelError> {
        (**self).resolve(model)
    }
}

/// A linear program: variables, constraints and an optional objective.
///
/// Every term must reference a variable that was declared beforehand. A
/// rejected call leaves the model untouched.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawModel"))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: Option<Objective>,
    #[cfg_attr(feature = "serde", serde(skip))]
    index: HashMap<String, VarId>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a variable with bounds `[0, +inf)`
    pub fn add_variable(&mut self, name: impl Into<String>) -> Result<VarId, ModelError> {
        self.add_bounded_variable(name, 0.0, f64::INFINITY)
    }

    /// Declare a variable with explicit bounds.
    ///
    /// `lower` may be `-inf` and `upper` may be `+inf`; `lower <= upper` is required.
    pub fn add_bounded_variable(
        &mut self,
        name: impl Into<String>,
        lower: f64,
        upper: f64,
    ) -> Result<VarId, ModelError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(ModelError::DuplicateVariable(name));
        }
        let valid = !lower.is_nan()
            && !upper.is_nan()
            && lower <= upper
            && lower < f64::INFINITY
            && upper > f64::NEG_INFINITY;
        if !valid {
            return Err(ModelError::InvalidBounds { variable: name, lower, upper });
        }

        let id = VarId(self.variables.len());
        self.index.insert(name.clone(), id);
        self.variables.push(Variable { name, lower, upper });
        Ok(id)
    }

    pub fn add_constraint<K, I>(
        &mut self,
        terms: I,
        relation: Relation,
        rhs: f64,
    ) -> Result<ConstraintId, ModelError>
    where
        K: VarKey,
        I: IntoIterator<Item = (K, f64)>,
    {
        self.push_constraint(None, terms, relation, rhs)
    }

    pub fn add_named_constraint<K, I>(
        &mut self,
        name: impl Into<String>,
        terms: I,
        relation: Relation,
        rhs: f64,
    ) -> Result<ConstraintId, ModelError>
    where
        K: VarKey,
        I: IntoIterator<Item = (K, f64)>,
    {
        self.push_constraint(Some(name.into()), terms, relation, rhs)
    }

    /// Set the objective, replacing any previous one
    pub fn set_objective<K, I>(&mut self, terms: I, sense: Sense) -> Result<(), ModelError>
    where
        K: VarKey,
        I: IntoIterator<Item = (K, f64)>,
    {
        let terms = self.resolve_terms(terms)?;
        self.objective = Some(Objective { terms, sense });
        Ok(())
    }

    fn push_constraint<K, I>(
        &mut self,
        name: Option<String>,
        terms: I,
        relation: Relation,
        rhs: f64,
    ) -> Result<ConstraintId, ModelError>
    where
        K: VarKey,
        I: IntoIterator<Item = (K, f64)>,
    {
        if !rhs.is_finite() {
            return Err(ModelError::NonFiniteCoefficient {
                term: "right-hand side".to_string(),
                value: rhs,
            });
        }
        let terms = self.resolve_terms(terms)?;

        let id = ConstraintId(self.constraints.len());
        self.constraints.push(Constraint { name, terms, relation, rhs });
        Ok(id)
    }

    /// Resolve keys to handles, merging repeated references to one variable
    fn resolve_terms<K, I>(&self, terms: I) -> Result<Vec<(VarId, f64)>, ModelError>
    where
        K: VarKey,
        I: IntoIterator<Item = (K, f64)>,
    {
        let mut resolved: Vec<(VarId, f64)> = Vec::new();
        let mut positions: HashMap<VarId, usize> = HashMap::new();

        for (key, coefficient) in terms {
            let var = key.resolve(self)?;
            if !coefficient.is_finite() {
                return Err(ModelError::NonFiniteCoefficient {
                    term: self.variables[var.0].name.clone(),
                    value: coefficient,
                });
            }
            match positions.get(&var) {
                Some(&pos) => resolved[pos].1 += coefficient,
                None => {
                    positions.insert(var, resolved.len());
                    resolved.push((var, coefficient));
                }
            }
        }

        Ok(resolved)
    }

    pub fn var_id(&self, name: &str) -> Option<VarId> {
        self.index.get(name).copied()
    }

    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.0)
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.get(id.0)
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
}

/// Wire shape of a model; deserialization replays the build calls so a
/// malformed document is rejected like the equivalent API misuse.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawModel {
    variables: Vec<Variable>,
    #[serde(default)]
    constraints: Vec<Constraint>,
    #[serde(default)]
    objective: Option<Objective>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawModel> for Model {
    type Error = ModelError;

    fn try_from(raw: RawModel) -> Result<Self, Self::Error> {
        let mut model = Model::new();
        for var in raw.variables {
            model.add_bounded_variable(var.name, var.lower, var.upper)?;
        }
        for c in raw.constraints {
            model.push_constraint(c.name, c.terms, c.relation, c.rhs)?;
        }
        if let Some(objective) = raw.objective {
            model.set_objective(objective.terms, objective.sense)?;
        }
        Ok(model)
    }
}
