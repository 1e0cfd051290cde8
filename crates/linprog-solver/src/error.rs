use std::time::Duration;

use thiserror::Error;

/// Why a solve produced no solution
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("[SOLVER_INFEASIBLE] No assignment satisfies all constraints")]
    Infeasible,
    #[error("[SOLVER_UNBOUNDED] Objective can be improved without limit")]
    Unbounded,
    #[error("[SOLVER_ITERATION_LIMIT] Iteration limit reached after {iterations} pivots")]
    DegenerateCycle { iterations: usize },
    #[error("[SOLVER_TIME_LIMIT] Time limit exceeded after {elapsed:?}")]
    Timeout { elapsed: Duration },
}

impl SolveError {
    /// Stable code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            SolveError::Infeasible => "SOLVER_INFEASIBLE",
            SolveError::Unbounded => "SOLVER_UNBOUNDED",
            SolveError::DegenerateCycle { .. } => "SOLVER_ITERATION_LIMIT",
            SolveError::Timeout { .. } => "SOLVER_TIME_LIMIT",
        }
    }

    /// Whether the solve was cut short by a limit rather than proven
    /// infeasible or unbounded
    pub fn is_limit(&self) -> bool {
        matches!(self, SolveError::DegenerateCycle { .. } | SolveError::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let msg = SolveError::Infeasible.to_string();
        assert!(msg.contains("SOLVER_INFEASIBLE"));

        let msg = SolveError::DegenerateCycle { iterations: 42 }.to_string();
        assert!(msg.contains("SOLVER_ITERATION_LIMIT"));
        assert!(msg.contains("42"));

        let msg = SolveError::Timeout { elapsed: Duration::from_millis(5) }.to_string();
        assert!(msg.contains("SOLVER_TIME_LIMIT"));
    }

    #[test]
    fn test_is_limit() {
        assert!(!SolveError::Infeasible.is_limit());
        assert!(!SolveError::Unbounded.is_limit());
        assert!(SolveError::DegenerateCycle { iterations: 1 }.is_limit());
        assert!(SolveError::Timeout { elapsed: Duration::ZERO }.is_limit());
    }
}
