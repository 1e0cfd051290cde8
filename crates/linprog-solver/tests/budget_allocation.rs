#![allow(clippy::float_cmp)]

use linprog_solver::{Model, ModelError, Relation, Sense, SolveError, Solver, VarId};

const TOTAL_BUDGET: f64 = 1_000_000.0;
const PRINT_BUDGET: f64 = 100_000.0;
const VIEWER_TARGET: f64 = 1_500_000.0;
const CONVENTIONAL_SHARE: f64 = 0.4;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Four marketing channels: print, tv, seo, social
fn budget_model() -> (Model, [VarId; 4]) {
    let mut model = Model::new();
    let print = model.add_variable("print").unwrap();
    let tv = model.add_variable("tv").unwrap();
    let seo = model.add_variable("seo").unwrap();
    let social = model.add_variable("social").unwrap();
    let all = [print, tv, seo, social];

    model
        .add_named_constraint("total_budget", all.map(|v| (v, 1.0)), Relation::Le, TOTAL_BUDGET)
        .unwrap();
    model
        .add_named_constraint(
            "conventional",
            [(print, 1.0), (tv, 1.0)],
            Relation::Ge,
            CONVENTIONAL_SHARE * TOTAL_BUDGET,
        )
        .unwrap();
    model
        .add_named_constraint("print_budget", [(print, 1.0)], Relation::Le, PRINT_BUDGET)
        .unwrap();
    model
        .add_named_constraint("social_vs_seo", [(social, 1.0), (seo, -3.0)], Relation::Le, 0.0)
        .unwrap();
    model
        .add_named_constraint(
            "viewers",
            [(print, 2.1), (tv, 2.5), (seo, 3.0), (social, 0.9)],
            Relation::Ge,
            VIEWER_TARGET,
        )
        .unwrap();
    model
        .set_objective(
            [(print, 0.16), (tv, 0.09), (seo, 0.06), (social, 0.14)],
            Sense::Maximize,
        )
        .unwrap();

    (model, all)
}

fn assert_feasible(model: &Model, values: &[f64]) {
    for c in model.constraints() {
        let tolerance = 1e-6 * (1.0 + c.rhs.abs());
        assert!(
            c.is_satisfied_by(values, tolerance),
            "{:?} violated: {} {} {}",
            c.name,
            c.activity(values),
            c.relation,
            c.rhs
        );
    }
    for (var, &value) in model.variables().iter().zip(values) {
        assert!(var.contains(value, 1e-6), "{} = {} out of bounds", var.name, value);
    }
}

#[test]
fn test_budget_allocation_golden() {
    init_tracing();
    let (model, [print, tv, seo, social]) = budget_model();

    let solution = Solver::new().solve(&model).unwrap();

    assert!(
        (solution.objective_value - 115_000.0).abs() < 1e-4,
        "objective = {}",
        solution.objective_value
    );
    assert!((solution.value(print) - 100_000.0).abs() < 1e-4);
    assert!((solution.value(tv) - 300_000.0).abs() < 1e-4);
    assert!((solution.value(seo) - 150_000.0).abs() < 1e-4);
    assert!((solution.value(social) - 450_000.0).abs() < 1e-4);
    assert_feasible(&model, &solution.values);

    assert_eq!(solution.get("social"), Some(solution.value(social)));
    assert_eq!(solution.get("radio"), None);
    let names: Vec<&str> = solution.iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["print", "tv", "seo", "social"]);

    // Budget and print caps are tight, the viewer target is not
    assert!((solution.activities[0] - TOTAL_BUDGET).abs() < 1e-4);
    assert!((solution.activities[2] - PRINT_BUDGET).abs() < 1e-4);
    assert!(solution.activities[4] > VIEWER_TARGET);
}

#[test]
fn test_solving_twice_is_identical() {
    let (model, _) = budget_model();
    let solver = Solver::new();

    let first = solver.solve(&model).unwrap();
    let second = solver.solve(&model).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_rejected_constraint_keeps_model_solvable() {
    let (mut model, _) = budget_model();
    let before = model.clone();

    let err = model
        .add_constraint([("print", 1.0), ("radio", 1.0)], Relation::Le, 50_000.0)
        .unwrap_err();
    assert_eq!(err, ModelError::UnknownVariable("radio".to_string()));
    assert_eq!(model, before);

    let solution = linprog_solver::solve(&model).unwrap();
    assert!((solution.objective_value - 115_000.0).abs() < 1e-4);
}

#[test]
fn test_infeasible_fixture() {
    let mut model = Model::new();
    let x = model.add_variable("x").unwrap();
    model.add_constraint([(x, 1.0)], Relation::Ge, 10.0).unwrap();
    model.add_constraint([(x, 1.0)], Relation::Le, 5.0).unwrap();
    model.add_constraint([(x, 1.0)], Relation::Ge, 0.0).unwrap();
    model.set_objective([(x, 1.0)], Sense::Maximize).unwrap();

    let err = linprog_solver::solve(&model).unwrap_err();
    assert_eq!(err, SolveError::Infeasible);
    assert!(!err.is_limit());
}

#[test]
fn test_unbounded_fixture() {
    let mut model = Model::new();
    let x = model.add_variable("x").unwrap();
    model.add_constraint([(x, 1.0)], Relation::Ge, 0.0).unwrap();
    model.set_objective([(x, 1.0)], Sense::Maximize).unwrap();

    assert_eq!(linprog_solver::solve(&model), Err(SolveError::Unbounded));
}

#[test]
fn test_budget_without_viewer_headroom_is_infeasible() {
    // Raising the viewer target above what the budget can buy
    let (mut model, all) = budget_model();
    model
        .add_constraint(
            all.iter().copied().zip([2.1, 2.5, 3.0, 0.9]),
            Relation::Ge,
            3_500_000.0,
        )
        .unwrap();

    assert_eq!(linprog_solver::solve(&model), Err(SolveError::Infeasible));
}

#[test]
fn test_concurrent_solves() {
    let (model, _) = budget_model();
    let solver = Solver::new();
    let expected = solver.solve(&model).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| solver.solve(&model).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[cfg(feature = "serde")]
#[test]
fn test_solution_serializes() {
    let (model, _) = budget_model();
    let solution = linprog_solver::solve(&model).unwrap();

    let json = serde_json::to_value(&solution).unwrap();
    assert_eq!(json["variables"][3], "social");
    assert_eq!(json["values"].as_array().unwrap().len(), 4);

    let restored: Model = serde_json::from_str(&serde_json::to_string(&model).unwrap()).unwrap();
    assert_eq!(linprog_solver::solve(&restored).unwrap(), solution);
}
