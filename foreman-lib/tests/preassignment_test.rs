#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use foreman_lib::dataset::ShiftId;
use foreman_lib::dataset::StageId;
use foreman_lib::dataset::WorkerId;
use foreman_lib::formulation::formulate;
use foreman_lib::formulation::FormulationError;
use foreman_lib::formulation::FormulationOptions;
use foreman_lib::Dataset;
use helpers::single_line_tables;
use helpers::solve_to_schedule;

#[test]
fn a_forced_worker_appears_wherever_they_can() {
    let mut tables = single_line_tables(2, 1, 3);
    tables.preassign[0][1] = 1;

    let schedule = solve_to_schedule(tables, FormulationOptions::default());

    for shift in 0..2 {
        assert_eq!(
            schedule.worker_for(ShiftId::new(shift), StageId::new(0)),
            Some(WorkerId::new(1))
        );
    }
}

#[test]
fn an_excluded_worker_never_appears() {
    let mut tables = single_line_tables(3, 1, 2);
    tables.preassign[0][0] = -2;

    let schedule = solve_to_schedule(tables, FormulationOptions::default());

    for shift in 0..3 {
        assert_eq!(
            schedule.worker_for(ShiftId::new(shift), StageId::new(0)),
            Some(WorkerId::new(1))
        );
    }
}

#[test]
fn excluding_the_only_eligible_worker_is_reported() {
    let mut tables = single_line_tables(2, 1, 2);
    tables.experience_threshold = vec![60];
    tables.experience[0] = vec![80, 0];
    tables.preassign[0][0] = -2;

    let dataset = Dataset::populate(tables).expect("the tables are well-formed");
    let error = formulate(&dataset, FormulationOptions::default())
        .expect_err("the only eligible worker is excluded");

    assert_eq!(
        error,
        FormulationError::UnsatisfiableCoverage {
            shift: ShiftId::new(0),
            stage: StageId::new(0),
        }
    );
}

#[test]
fn a_soft_exclusion_only_steers_the_search() {
    let mut tables = single_line_tables(1, 1, 2);
    tables.preassign[0][0] = -1;

    let schedule = solve_to_schedule(tables, FormulationOptions::default());

    assert_eq!(
        schedule.worker_for(ShiftId::new(0), StageId::new(0)),
        Some(WorkerId::new(1))
    );
}

#[test]
fn a_soft_exclusion_yields_when_nobody_else_can() {
    let mut tables = single_line_tables(1, 1, 2);
    tables.preassign[0][0] = -1;
    tables.worker_shift[1][0] = -1;

    let schedule = solve_to_schedule(tables, FormulationOptions::default());

    assert_eq!(
        schedule.worker_for(ShiftId::new(0), StageId::new(0)),
        Some(WorkerId::new(0))
    );
}

#[test]
fn the_day_limit_confines_a_worker_to_one_shift_per_day() {
    let tables = single_line_tables(3, 1, 3);
    let options = FormulationOptions {
        one_assignment_per_worker_per_day: true,
        ..Default::default()
    };

    let schedule = solve_to_schedule(tables, options);

    let crew: Vec<_> = (0..3)
        .map(|shift| schedule.worker_for(ShiftId::new(shift), StageId::new(0)))
        .collect();
    assert!(crew.iter().all(Option::is_some));
    assert_ne!(crew[0], crew[1]);
    assert_ne!(crew[0], crew[2]);
    assert_ne!(crew[1], crew[2]);
}

#[test]
fn without_the_day_limit_a_worker_may_repeat_within_a_day() {
    let tables = single_line_tables(3, 1, 1);
    let schedule = solve_to_schedule(tables, FormulationOptions::default());

    for shift in 0..3 {
        assert_eq!(
            schedule.worker_for(ShiftId::new(shift), StageId::new(0)),
            Some(WorkerId::new(0))
        );
    }
}
