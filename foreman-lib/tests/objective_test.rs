#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use foreman_lib::dataset::ObjectiveTerm;
use foreman_lib::dataset::ShiftId;
use foreman_lib::dataset::StageId;
use foreman_lib::dataset::WorkerId;
use foreman_lib::formulation::FormulationOptions;
use helpers::single_line_tables;
use helpers::solve;
use helpers::solve_to_objective;

#[test]
fn level_crews_close_the_productivity_gap() {
    let mut tables = single_line_tables(1, 2, 3);
    tables.health = vec![100, 100, 100];
    tables.experience[0] = vec![100, 0, 60];
    tables.experience[1] = vec![0, 100, 60];
    tables.activation = vec![1, 0, 0, 0, 0];

    let (formulated, result) = solve(tables, FormulationOptions::default());

    assert!(result.is_optimal());
    let solution = result.solution().expect("an optimal result carries a solution");

    let gap_total = formulated
        .term_total(ObjectiveTerm::ProductivityGap)
        .expect("the gap term is active");
    assert_eq!(solution.get_integer_value(gap_total), 0);
    assert_eq!(
        solution.get_integer_value(formulated.objective_variable()),
        0
    );
}

#[test]
fn salary_weighting_prefers_a_small_crew() {
    let mut tables = single_line_tables(2, 1, 2);
    tables.salary = vec![10, 10];
    tables.activation = vec![0, 0, 0, 1, 0];

    let (schedule, objective) = solve_to_objective(tables, FormulationOptions::default());

    assert_eq!(objective, 10);
    assert_eq!(
        schedule.worker_for(ShiftId::new(0), StageId::new(0)),
        schedule.worker_for(ShiftId::new(1), StageId::new(0))
    );
}

#[test]
fn the_shuffle_term_counts_distinct_stage_crews() {
    let mut tables = single_line_tables(2, 1, 2);
    tables.activation = vec![0, 1, 0, 0, 0];

    let (schedule, objective) = solve_to_objective(tables, FormulationOptions::default());

    assert_eq!(objective, 1);
    assert_eq!(
        schedule.worker_for(ShiftId::new(0), StageId::new(0)),
        schedule.worker_for(ShiftId::new(1), StageId::new(0))
    );
}

#[test]
fn newcomers_are_drawn_in_when_rewarded() {
    let mut tables = single_line_tables(1, 1, 2);
    tables.experience[0] = vec![50, 0];
    tables.activation = vec![0, 0, 0, 0, 1];

    let (schedule, objective) = solve_to_objective(tables, FormulationOptions::default());

    assert_eq!(objective, -1);
    assert_eq!(
        schedule.worker_for(ShiftId::new(0), StageId::new(0)),
        Some(WorkerId::new(1))
    );
}

#[test]
fn delivered_productivity_is_maximised_when_activated() {
    let mut tables = single_line_tables(1, 1, 2);
    tables.health = vec![100, 100];
    tables.experience[0] = vec![0, 60];
    tables.activation = vec![0, 0, 1, 0, 0];

    let (schedule, objective) = solve_to_objective(tables, FormulationOptions::default());

    assert_eq!(objective, -80);
    assert_eq!(
        schedule.worker_for(ShiftId::new(0), StageId::new(0)),
        Some(WorkerId::new(1))
    );
}

#[test]
fn repeated_solves_agree() {
    let mut tables = single_line_tables(2, 2, 3);
    tables.health = vec![90, 70, 50];
    tables.experience[0] = vec![40, 80, 0];
    tables.experience[1] = vec![70, 0, 30];
    tables.salary = vec![25, 40, 15];
    tables.activation = vec![1, 0, 0, 1, 0];

    let (first_schedule, first_objective) =
        solve_to_objective(tables.clone(), FormulationOptions::default());
    let (second_schedule, second_objective) =
        solve_to_objective(tables, FormulationOptions::default());

    assert_eq!(first_objective, second_objective);
    assert_eq!(first_schedule, second_schedule);
}
