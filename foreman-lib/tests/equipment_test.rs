#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use foreman_lib::dataset::DatasetTables;
use foreman_lib::dataset::EquipmentId;
use foreman_lib::dataset::LineId;
use foreman_lib::dataset::ShiftId;
use foreman_lib::formulation::FormulationOptions;
use foreman_lib::results::SolveResult;
use helpers::solve;
use helpers::solve_to_schedule;

/// Two single-stage lines, two workers to cover them, and one item providing the only function.
fn two_line_tables() -> DatasetTables {
    let mut tables = DatasetTables::new(1, 2, 2, 2, 1, 1);
    tables.line_stage[0][0] = 1;
    tables.line_stage[1][1] = 1;
    tables.equipment_function[0][0] = 1;
    tables
}

#[test]
fn an_item_cannot_serve_two_lines_in_the_same_shift() {
    let mut tables = two_line_tables();
    tables.line_requirement[0][0] = 1;
    tables.line_requirement[1][0] = 1;

    let (_, result) = solve(tables, FormulationOptions::default());
    assert!(matches!(result, SolveResult::Infeasible));
}

#[test]
fn a_single_demanding_line_gets_the_item() {
    let mut tables = two_line_tables();
    tables.line_requirement[0][0] = 1;

    let schedule = solve_to_schedule(tables, FormulationOptions::default());

    assert!(schedule.is_equipment_assigned(ShiftId::new(0), LineId::new(0), EquipmentId::new(0)));
    assert!(!schedule.is_equipment_assigned(ShiftId::new(0), LineId::new(1), EquipmentId::new(0)));
}

#[test]
fn requirements_accumulate_over_multi_unit_items() {
    let mut tables = DatasetTables::new(1, 1, 1, 1, 2, 1);
    tables.line_stage[0][0] = 1;
    tables.equipment_function[0][0] = 2;
    tables.equipment_function[1][0] = 3;
    tables.line_requirement[0][0] = 4;

    let schedule = solve_to_schedule(tables, FormulationOptions::default());

    let shift = ShiftId::new(0);
    let line = LineId::new(0);
    assert!(schedule.is_equipment_assigned(shift, line, EquipmentId::new(0)));
    assert!(schedule.is_equipment_assigned(shift, line, EquipmentId::new(1)));
}

#[test]
fn a_zero_requirement_leaves_items_unassigned() {
    let mut tables = DatasetTables::new(1, 1, 1, 1, 1, 1);
    tables.line_stage[0][0] = 1;
    tables.equipment_function[0][0] = 5;

    let schedule = solve_to_schedule(tables, FormulationOptions::default());

    assert!(!schedule.is_equipment_assigned(ShiftId::new(0), LineId::new(0), EquipmentId::new(0)));
}

#[test]
fn the_productivity_floor_pulls_equipment_in() {
    let mut tables = DatasetTables::new(3, 1, 1, 1, 1, 0);
    tables.line_stage[0][0] = 1;
    tables.experience[0][0] = 50;
    tables.health[0] = 50;
    tables.age[0] = 50;
    tables.equipment_productivity[0] = 40;
    tables.min_line_productivity[0] = 160;

    let options = FormulationOptions {
        enforce_minimum_line_productivity: true,
        ..Default::default()
    };
    let schedule = solve_to_schedule(tables, options);

    // The lone worker delivers 150 per day, so the floor of 160 needs the item at least once.
    let equipped_shifts = (0..3)
        .filter(|&shift| {
            schedule.is_equipment_assigned(ShiftId::new(shift), LineId::new(0), EquipmentId::new(0))
        })
        .count();
    assert!(equipped_shifts >= 1);
}
