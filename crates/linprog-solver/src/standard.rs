use linprog_model::{Model, Relation, Sense};

/// How a model variable is expressed through nonnegative tableau columns
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Substitution {
    /// `x = lower + x'`
    Shifted { column: usize, lower: f64 },
    /// `x = upper - x'`
    Reflected { column: usize, upper: f64 },
    /// `x = x⁺ - x⁻`
    Split { positive: usize, negative: usize },
}

impl Substitution {
    /// Add `coefficient * x` to a dense row over tableau columns and return
    /// the constant part that has to move to the right-hand side.
    fn scatter(&self, coefficient: f64, row: &mut [f64]) -> f64 {
        match *self {
            Substitution::Shifted { column, lower } => {
                row[column] += coefficient;
                coefficient * lower
            }
            Substitution::Reflected { column, upper } => {
                row[column] -= coefficient;
                coefficient * upper
            }
            Substitution::Split { positive, negative } => {
                row[positive] += coefficient;
                row[negative] -= coefficient;
                0.0
            }
        }
    }

    /// Value of the original variable from tableau column values
    pub(crate) fn recover(&self, columns: &[f64]) -> f64 {
        match *self {
            Substitution::Shifted { column, lower } => lower + columns[column],
            Substitution::Reflected { column, upper } => upper - columns[column],
            Substitution::Split { positive, negative } => columns[positive] - columns[negative],
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct StandardRow {
    /// Dense coefficients over structural columns
    pub coefficients: Vec<f64>,
    pub relation: Relation,
    /// Always nonnegative
    pub rhs: f64,
}

/// A model rewritten over nonnegative structural columns with nonnegative
/// right-hand sides. The objective is always maximized.
#[derive(Debug, Clone)]
pub(crate) struct StandardForm {
    pub substitutions: Vec<Substitution>,
    pub rows: Vec<StandardRow>,
    pub objective: Vec<f64>,
    pub n_columns: usize,
}

impl StandardForm {
    pub fn from_model(model: &Model) -> Self {
        let mut substitutions = Vec::with_capacity(model.num_variables());
        let mut n_columns = 0;
        for var in model.variables() {
            let substitution = if var.lower.is_finite() {
                Substitution::Shifted { column: n_columns, lower: var.lower }
            } else if var.upper.is_finite() {
                Substitution::Reflected { column: n_columns, upper: var.upper }
            } else {
                n_columns += 1;
                Substitution::Split { positive: n_columns - 1, negative: n_columns }
            };
            n_columns += 1;
            substitutions.push(substitution);
        }

        let mut rows = Vec::with_capacity(model.num_constraints());
        for c in model.constraints() {
            let mut coefficients = vec![0.0; n_columns];
            let mut rhs = c.rhs;
            for &(var, coefficient) in &c.terms {
                rhs -= substitutions[var.index()].scatter(coefficient, &mut coefficients);
            }
            rows.push(StandardRow { coefficients, relation: c.relation, rhs });
        }

        // Finite upper bounds of shifted variables become explicit rows
        for (var, substitution) in model.variables().iter().zip(&substitutions) {
            if let Substitution::Shifted { column, lower } = *substitution {
                if var.upper.is_finite() {
                    let mut coefficients = vec![0.0; n_columns];
                    coefficients[column] = 1.0;
                    rows.push(StandardRow {
                        coefficients,
                        relation: Relation::Le,
                        rhs: var.upper - lower,
                    });
                }
            }
        }

        for row in &mut rows {
            if row.rhs < 0.0 {
                row.coefficients.iter_mut().for_each(|a| *a = -*a);
                row.rhs = -row.rhs;
                row.relation = row.relation.reversed();
            }
        }

        let mut objective = vec![0.0; n_columns];
        if let Some(obj) = model.objective() {
            let sign = match obj.sense {
                Sense::Maximize => 1.0,
                Sense::Minimize => -1.0,
            };
            for &(var, coefficient) in &obj.terms {
                // The constant part does not affect the optimal point
                substitutions[var.index()].scatter(sign * coefficient, &mut objective);
            }
        }

        Self { substitutions, rows, objective, n_columns }
    }
}
