use std::time::{Duration, Instant};

use linprog_model::Model;
use tracing::{debug, trace};

use crate::error::SolveError;
use crate::solution::Solution;
use crate::standard::StandardForm;
use crate::tableau::{PivotRule, Tableau};

/// Two-phase simplex solver for linear programming problems.
///
/// A `Solver` only carries options; every call to [`Solver::solve`] builds its
/// own tableau, so one solver can be shared across threads.
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum pivots across both phases before giving up
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
    /// Wall-clock limit for a single solve
    time_limit: Option<Duration>,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            tolerance: 1e-9,
            time_limit: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    One,
    Two,
}

/// Pivot and time allowance shared by both phases of one solve
struct Budget {
    iterations: usize,
    max_iterations: usize,
    started: Instant,
    time_limit: Option<Duration>,
}

impl Budget {
    fn charge(&mut self) -> Result<(), SolveError> {
        if self.iterations >= self.max_iterations {
            return Err(SolveError::DegenerateCycle { iterations: self.iterations });
        }
        if let Some(limit) = self.time_limit {
            let elapsed = self.started.elapsed();
            if elapsed >= limit {
                return Err(SolveError::Timeout { elapsed });
            }
        }
        self.iterations += 1;
        Ok(())
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Solve the model using the two-phase simplex method.
    ///
    /// The model is only read. On failure no partial solution is produced.
    pub fn solve(&self, model: &Model) -> Result<Solution, SolveError> {
        let form = StandardForm::from_model(model);
        let mut tableau = Tableau::from_standard(&form);
        let mut budget = Budget {
            iterations: 0,
            max_iterations: self.max_iterations,
            started: Instant::now(),
            time_limit: self.time_limit,
        };

        debug!(
            variables = model.num_variables(),
            rows = tableau.n_rows(),
            columns = tableau.n_columns(),
            artificials = tableau.n_artificial,
            "starting two-phase simplex"
        );

        if let Err(err) = self.run_phases(&form, &mut tableau, &mut budget) {
            debug!(code = err.code(), pivots = budget.iterations, "solve failed");
            return Err(err);
        }

        let columns = tableau.structural_values(self.tolerance);
        let values: Vec<f64> = form.substitutions.iter().map(|s| s.recover(&columns)).collect();
        let objective_value = model.objective().map_or(0.0, |o| o.evaluate(&values));
        let activities = model.constraints().iter().map(|c| c.activity(&values)).collect();

        debug!(objective_value, pivots = budget.iterations, "optimal solution found");

        Ok(Solution {
            objective_value,
            variables: model.variables().iter().map(|v| v.name.clone()).collect(),
            values,
            activities,
            iterations: budget.iterations,
        })
    }

    fn run_phases(
        &self,
        form: &StandardForm,
        tableau: &mut Tableau,
        budget: &mut Budget,
    ) -> Result<(), SolveError> {
        if tableau.n_artificial > 0 {
            self.phase1(tableau, budget)?;
        }

        tableau.set_objective(&form.objective);
        self.optimize(tableau, Phase::Two, budget)
    }

    /// Find a basic feasible solution by minimizing the sum of artificials,
    /// then remove the artificial columns.
    fn phase1(&self, tableau: &mut Tableau, budget: &mut Budget) -> Result<(), SolveError> {
        let costs: Vec<f64> = (0..tableau.n_columns())
            .map(|j| if tableau.is_artificial(j) { -1.0 } else { 0.0 })
            .collect();
        tableau.set_objective(&costs);

        match self.optimize(tableau, Phase::One, budget) {
            Ok(()) => {}
            // The auxiliary objective is bounded above by zero
            Err(SolveError::Unbounded) => return Err(SolveError::Infeasible),
            Err(err) => return Err(err),
        }

        // Each artificial is judged against its own row's magnitude
        let residual = (0..tableau.n_rows())
            .map(|i| (tableau.basis[i], tableau.rhs(i)))
            .filter(|&(col, _)| tableau.is_artificial(col))
            .find(|&(col, level)| level > tableau.artificial_tolerance(col, self.tolerance));
        if let Some((column, level)) = residual {
            debug!(column, level, "artificial variable remains positive");
            return Err(SolveError::Infeasible);
        }

        self.drive_out_artificials(tableau);
        tableau.remove_artificial_columns();
        Ok(())
    }

    /// Replace artificials left in the basis at zero level (already checked
    /// against their row tolerance). A row with no usable column is a linear
    /// combination of the others and is dropped.
    fn drive_out_artificials(&self, tableau: &mut Tableau) {
        let start = tableau.artificial_start();
        let mut i = 0;
        while i < tableau.n_rows() {
            if !tableau.is_artificial(tableau.basis[i]) {
                i += 1;
                continue;
            }

            let replacement = (0..start).find(|&j| tableau.rows[i][j].abs() > self.tolerance);
            match replacement {
                Some(col) => {
                    let rhs_col = tableau.n_columns();
                    tableau.rows[i][rhs_col] = 0.0;
                    tableau.pivot(i, col);
                    i += 1;
                }
                None => {
                    debug!(row = i, "dropping redundant row");
                    tableau.remove_row(i);
                }
            }
        }
    }

    fn optimize(&self, tableau: &mut Tableau, phase: Phase, budget: &mut Budget) -> Result<(), SolveError> {
        let mut rule = PivotRule::Dantzig;
        let mut degenerate_run = 0;
        let stall_limit = tableau.n_rows() + tableau.n_columns();
        let first = budget.iterations;

        while let Some(col) = tableau.entering_column(rule, self.tolerance) {
            let Some((row, ratio)) = tableau.leaving_row(col, rule, self.tolerance) else {
                debug!(?phase, column = col, "no row bounds the entering column");
                return Err(SolveError::Unbounded);
            };
            budget.charge()?;

            trace!(?phase, entering = col, leaving = tableau.basis[row], row, ratio, "pivot");
            tableau.pivot(row, col);

            if ratio <= self.tolerance {
                degenerate_run += 1;
                if rule == PivotRule::Dantzig && degenerate_run > stall_limit {
                    debug!(?phase, degenerate_run, "degenerate stall, switching to Bland's rule");
                    rule = PivotRule::Bland;
                }
            } else {
                degenerate_run = 0;
            }
        }

        debug!(
            ?phase,
            pivots = budget.iterations - first,
            objective = tableau.objective_value(),
            "phase complete"
        );
        Ok(())
    }
}
