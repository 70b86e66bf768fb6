//! Shared scenario builders for the integration tests.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use foreman_lib::dataset::Dataset;
use foreman_lib::dataset::DatasetTables;
use foreman_lib::engine::Solver;
use foreman_lib::engine::SolverOptions;
use foreman_lib::formulation::formulate;
use foreman_lib::formulation::FormulatedModel;
use foreman_lib::formulation::FormulationOptions;
use foreman_lib::results::SolveResult;
use foreman_lib::schedule::Schedule;

/// A factory with a single line containing every stage, no equipment, and every worker
/// available and eligible everywhere.
pub(crate) fn single_line_tables(shifts: usize, stages: usize, workers: usize) -> DatasetTables {
    let mut tables = DatasetTables::new(shifts, 1, stages, workers, 0, 0);
    for stage in 0..stages {
        tables.line_stage[0][stage] = 1;
    }
    tables
}

/// Formulates and solves the given instance without a time limit.
pub(crate) fn solve(
    tables: DatasetTables,
    options: FormulationOptions,
) -> (FormulatedModel, SolveResult) {
    let dataset = Dataset::populate(tables).expect("the tables are well-formed");
    let formulated = formulate(&dataset, options).expect("the instance formulates");

    let mut solver = Solver::with_options(SolverOptions {
        time_limit: None,
        ..Default::default()
    });
    let result = solver.solve(formulated.model());

    (formulated, result)
}

/// Solves the instance and projects the proven-optimal solution into a schedule.
pub(crate) fn solve_to_schedule(tables: DatasetTables, options: FormulationOptions) -> Schedule {
    let (formulated, result) = solve(tables, options);

    assert!(result.is_optimal(), "expected optimality, got {result:?}");
    let solution = result.solution().expect("an optimal result carries a solution");

    formulated.extract_schedule(solution)
}

/// Solves the instance and reports the proven-optimal objective value next to the schedule.
pub(crate) fn solve_to_objective(
    tables: DatasetTables,
    options: FormulationOptions,
) -> (Schedule, i32) {
    let (formulated, result) = solve(tables, options);

    assert!(result.is_optimal(), "expected optimality, got {result:?}");
    let solution = result.solution().expect("an optimal result carries a solution");

    let objective = solution.get_integer_value(formulated.objective_variable());
    (formulated.extract_schedule(solution), objective)
}
