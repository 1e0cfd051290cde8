use linprog_model::Relation;

use crate::standard::StandardForm;

/// Pivoting rule used to pick entering and leaving variables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PivotRule {
    /// Most negative reduced cost, ratio ties to the lowest row
    Dantzig,
    /// Lowest eligible column, ratio ties to the lowest basic variable
    Bland,
}

/// Dense simplex tableau.
///
/// Columns are laid out as `[structural | slack/surplus | artificial | rhs]`.
/// The objective row holds reduced costs for a maximization (`-c` before any
/// pivot) and the current objective value in its last entry.
#[derive(Debug, Clone)]
pub(crate) struct Tableau {
    pub rows: Vec<Vec<f64>>,
    pub objective: Vec<f64>,
    pub basis: Vec<usize>,
    pub n_structural: usize,
    pub n_slack: usize,
    pub n_artificial: usize,
    /// `1 + rhs` of the row that seeded each artificial column
    artificial_scales: Vec<f64>,
}

impl Tableau {
    pub fn from_standard(form: &StandardForm) -> Self {
        let n_structural = form.n_columns;
        let mut n_slack = 0;
        let mut n_artificial = 0;
        for row in &form.rows {
            match row.relation {
                Relation::Le => n_slack += 1,
                Relation::Ge => {
                    n_slack += 1; // surplus
                    n_artificial += 1;
                }
                Relation::Eq => n_artificial += 1,
            }
        }

        let width = n_structural + n_slack + n_artificial + 1;
        let mut rows = Vec::with_capacity(form.rows.len());
        let mut basis = Vec::with_capacity(form.rows.len());
        let mut slack_idx = n_structural;
        let mut artificial_idx = n_structural + n_slack;
        let mut artificial_scales = Vec::with_capacity(n_artificial);

        for standard in &form.rows {
            let mut row = vec![0.0; width];
            row[..n_structural].copy_from_slice(&standard.coefficients);
            row[width - 1] = standard.rhs;

            match standard.relation {
                Relation::Le => {
                    row[slack_idx] = 1.0;
                    basis.push(slack_idx);
                    slack_idx += 1;
                }
                Relation::Ge => {
                    row[slack_idx] = -1.0;
                    slack_idx += 1;
                    row[artificial_idx] = 1.0;
                    basis.push(artificial_idx);
                    artificial_scales.push(1.0 + standard.rhs);
                    artificial_idx += 1;
                }
                Relation::Eq => {
                    row[artificial_idx] = 1.0;
                    basis.push(artificial_idx);
                    artificial_scales.push(1.0 + standard.rhs);
                    artificial_idx += 1;
                }
            }
            rows.push(row);
        }

        Self {
            rows,
            objective: vec![0.0; width],
            basis,
            n_structural,
            n_slack,
            n_artificial,
            artificial_scales,
        }
    }

    /// Number of columns excluding the right-hand side
    pub fn n_columns(&self) -> usize {
        self.n_structural + self.n_slack + self.n_artificial
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn artificial_start(&self) -> usize {
        self.n_structural + self.n_slack
    }

    pub fn is_artificial(&self, column: usize) -> bool {
        column >= self.artificial_start() && column < self.n_columns()
    }

    /// Largest level an artificial column may keep and still count as zero
    pub fn artificial_tolerance(&self, column: usize, tolerance: f64) -> f64 {
        tolerance * self.artificial_scales[column - self.artificial_start()]
    }

    pub fn rhs(&self, row: usize) -> f64 {
        self.rows[row][self.n_columns()]
    }

    pub fn objective_value(&self) -> f64 {
        self.objective[self.n_columns()]
    }

    /// Install a maximization objective given by per-column `costs` (missing
    /// entries are zero) and price out the current basis.
    pub fn set_objective(&mut self, costs: &[f64]) {
        let n_cols = self.n_columns();
        self.objective.iter_mut().for_each(|d| *d = 0.0);
        for (j, &cost) in costs.iter().enumerate().take(n_cols) {
            self.objective[j] = -cost;
        }

        for i in 0..self.rows.len() {
            let factor = self.objective[self.basis[i]];
            if factor != 0.0 {
                for (d, &a) in self.objective.iter_mut().zip(&self.rows[i]) {
                    *d -= factor * a;
                }
            }
        }
    }

    pub fn entering_column(&self, rule: PivotRule, tolerance: f64) -> Option<usize> {
        let reduced = &self.objective[..self.n_columns()];
        match rule {
            PivotRule::Dantzig => {
                let mut best = -tolerance;
                let mut best_col = None;
                for (j, &d) in reduced.iter().enumerate() {
                    if d < best {
                        best = d;
                        best_col = Some(j);
                    }
                }
                best_col
            }
            PivotRule::Bland => reduced.iter().position(|&d| d < -tolerance),
        }
    }

    /// Minimum ratio test; returns the pivot row and its ratio, or `None`
    /// when no row bounds the entering column.
    pub fn leaving_row(&self, col: usize, rule: PivotRule, tolerance: f64) -> Option<(usize, f64)> {
        let rhs_col = self.n_columns();
        let mut best: Option<(usize, f64)> = None;

        for (i, row) in self.rows.iter().enumerate() {
            let a = row[col];
            if a <= tolerance {
                continue;
            }
            let ratio = row[rhs_col].max(0.0) / a;
            best = match best {
                None => Some((i, ratio)),
                Some((_, min)) if ratio < min - tolerance => Some((i, ratio)),
                Some((r, min))
                    if rule == PivotRule::Bland
                        && (ratio - min).abs() <= tolerance
                        && self.basis[i] < self.basis[r] =>
                {
                    Some((i, ratio))
                }
                keep => keep,
            };
        }

        best
    }

    pub fn pivot(&mut self, row: usize, col: usize) {
        self.basis[row] = col;

        let pivot_val = self.rows[row][col];
        for a in self.rows[row].iter_mut() {
            *a /= pivot_val;
        }
        self.rows[row][col] = 1.0;

        let pivot_row = std::mem::take(&mut self.rows[row]);
        for (i, other) in self.rows.iter_mut().enumerate() {
            if i != row {
                eliminate(other, &pivot_row, col);
            }
        }
        eliminate(&mut self.objective, &pivot_row, col);
        self.rows[row] = pivot_row;
    }

    pub fn remove_row(&mut self, row: usize) {
        self.rows.remove(row);
        self.basis.remove(row);
    }

    /// Drop every artificial column. Artificial variables must already be
    /// nonbasic.
    pub fn remove_artificial_columns(&mut self) {
        let start = self.artificial_start();
        let end = self.n_columns();
        for row in &mut self.rows {
            row.drain(start..end);
        }
        self.objective.drain(start..end);
        self.n_artificial = 0;
        self.artificial_scales.clear();
    }

    /// Values of the structural columns at the current basic solution
    pub fn structural_values(&self, tolerance: f64) -> Vec<f64> {
        let mut values = vec![0.0; self.n_structural];
        for (i, &basic) in self.basis.iter().enumerate() {
            if basic < self.n_structural {
                let value = self.rhs(i);
                values[basic] = if value.abs() <= tolerance { 0.0 } else { value };
            }
        }
        values
    }
}

fn eliminate(target: &mut [f64], pivot_row: &[f64], col: usize) {
    let factor = target[col];
    if factor == 0.0 {
        return;
    }
    for (t, &p) in target.iter_mut().zip(pivot_row) {
        *t -= factor * p;
    }
    target[col] = 0.0;
}
