//! Second formulation pass: posts the hard constraints in rule precedence.
//!
//! Order matters for error reporting: an empty coverage set is detected before any directive is
//! applied, and the directive recheck runs before the equipment rules so structural defects
//! always surface with their (shift, stage) coordinates.

use itertools::Itertools;

use crate::constraints;
use crate::dataset::PreassignDirective;
use crate::dataset::ShiftId;
use crate::dataset::StageId;
use crate::formulation::context::FormulationContext;
use crate::formulation::FormulationError;
use crate::model::BoolVar;
use crate::model::LinearTerm;

pub(crate) fn run(context: &mut FormulationContext<'_>) -> Result<(), FormulationError> {
    post_stage_coverage(context)?;
    post_single_stage_per_worker(context)?;
    post_day_window_coverage(context)?;
    apply_preassignment_directives(context)?;
    recheck_coverage_after_directives(context)?;
    post_equipment_exclusivity(context)?;
    post_function_fulfillment(context)?;

    if context.options.one_assignment_per_worker_per_day {
        post_worker_day_limit(context)?;
    }
    if context.options.enforce_minimum_line_productivity {
        post_minimum_line_productivity(context)?;
    }

    Ok(())
}

/// The existing worker slots of one (shift, stage) cell, in worker order.
fn coverage_slots(
    context: &FormulationContext<'_>,
    shift: ShiftId,
    stage: StageId,
) -> Vec<BoolVar> {
    context
        .dataset
        .workers()
        .filter_map(|worker| context.variables.worker(shift, stage, worker))
        .collect()
}

fn post_stage_coverage(context: &mut FormulationContext<'_>) -> Result<(), FormulationError> {
    let dataset = context.dataset;

    for shift in dataset.shifts() {
        for stage in dataset.stages() {
            let slots = coverage_slots(context, shift, stage);
            if slots.is_empty() {
                return Err(FormulationError::UnsatisfiableCoverage { shift, stage });
            }

            context
                .model
                .add_constraint(constraints::exactly_one(slots))
                .post()?;
        }
    }

    Ok(())
}

fn post_single_stage_per_worker(
    context: &mut FormulationContext<'_>,
) -> Result<(), FormulationError> {
    let dataset = context.dataset;

    for shift in dataset.shifts() {
        for worker in dataset.workers() {
            let slots: Vec<BoolVar> = dataset
                .stages()
                .filter_map(|stage| context.variables.worker(shift, stage, worker))
                .collect();

            for (first, second) in slots.into_iter().tuple_combinations() {
                context
                    .model
                    .add_constraint(constraints::at_most_one([first, second]))
                    .post()?;
            }
        }
    }

    Ok(())
}

/// Day grouping is defined by re-running the per-(shift, stage) coverage rule inside each day
/// window, not by a worker-level cardinality; the worker-level reading is the optional
/// [`post_worker_day_limit`] below.
fn post_day_window_coverage(context: &mut FormulationContext<'_>) -> Result<(), FormulationError> {
    let dataset = context.dataset;

    for day in dataset.day_windows() {
        for shift in day.shifts() {
            for stage in dataset.stages() {
                let slots = coverage_slots(context, shift, stage);
                if slots.is_empty() {
                    return Err(FormulationError::UnsatisfiableCoverage { shift, stage });
                }

                context
                    .model
                    .add_constraint(constraints::exactly_one(slots))
                    .post()?;
            }
        }
    }

    Ok(())
}

fn apply_preassignment_directives(
    context: &mut FormulationContext<'_>,
) -> Result<(), FormulationError> {
    let dataset = context.dataset;

    for shift in dataset.shifts() {
        for stage in dataset.stages() {
            for worker in dataset.workers() {
                // A directive on a slot that does not exist is a no-op.
                let Some(variable) = context.variables.worker(shift, stage, worker) else {
                    continue;
                };

                match dataset.preassign_directive(stage, worker) {
                    PreassignDirective::ForceIn => context.model.fix_boolean(variable, true)?,
                    PreassignDirective::ForceOut => context.model.fix_boolean(variable, false)?,
                    PreassignDirective::HintOut => context.model.add_hint(variable, false),
                    PreassignDirective::Neutral => {}
                }
            }
        }
    }

    Ok(())
}

/// A coverage set whose members are all fixed false by directives is as unsatisfiable as an
/// empty one; report it with coordinates here instead of leaving an opaque infeasibility to the
/// search.
fn recheck_coverage_after_directives(
    context: &FormulationContext<'_>,
) -> Result<(), FormulationError> {
    let dataset = context.dataset;

    for shift in dataset.shifts() {
        for stage in dataset.stages() {
            let slots = coverage_slots(context, shift, stage);

            let all_excluded = slots
                .iter()
                .all(|&slot| context.model.fixed_boolean(slot) == Some(false));
            if all_excluded {
                return Err(FormulationError::UnsatisfiableCoverage { shift, stage });
            }
        }
    }

    Ok(())
}

fn post_equipment_exclusivity(
    context: &mut FormulationContext<'_>,
) -> Result<(), FormulationError> {
    let dataset = context.dataset;

    for shift in dataset.shifts() {
        for equipment in dataset.equipments() {
            for (first, second) in dataset.lines().tuple_combinations() {
                let pair = [
                    context.variables.equipment(shift, first, equipment),
                    context.variables.equipment(shift, second, equipment),
                ];

                context
                    .model
                    .add_constraint(constraints::at_most_one(pair))
                    .post()?;
            }
        }
    }

    Ok(())
}

fn post_function_fulfillment(
    context: &mut FormulationContext<'_>,
) -> Result<(), FormulationError> {
    let dataset = context.dataset;

    for shift in dataset.shifts() {
        for line in dataset.lines() {
            for function in dataset.functions() {
                let requirement = dataset.function_requirement(line, function);
                if requirement <= 0 {
                    continue;
                }

                let terms: Vec<LinearTerm> = dataset
                    .equipments()
                    .filter_map(|equipment| {
                        let quantity = dataset.equipment_quantity(equipment, function);
                        (quantity > 0).then(|| {
                            context
                                .variables
                                .equipment(shift, line, equipment)
                                .scaled(quantity)
                        })
                    })
                    .collect();

                context
                    .model
                    .add_constraint(constraints::greater_than_or_equals(terms, requirement))
                    .post()?;
            }
        }
    }

    Ok(())
}

/// The worker-level day rule: within each day window, a worker holds at most one slot across
/// the window's shifts and all stages.
fn post_worker_day_limit(context: &mut FormulationContext<'_>) -> Result<(), FormulationError> {
    let dataset = context.dataset;

    for day in dataset.day_windows() {
        for worker in dataset.workers() {
            let mut slots: Vec<BoolVar> = Vec::new();
            for shift in day.shifts() {
                for stage in dataset.stages() {
                    if let Some(variable) = context.variables.worker(shift, stage, worker) {
                        slots.push(variable);
                    }
                }
            }

            for (first, second) in slots.into_iter().tuple_combinations() {
                context
                    .model
                    .add_constraint(constraints::at_most_one([first, second]))
                    .post()?;
            }
        }
    }

    Ok(())
}

/// The productivity floor: per line and day window, the workers on the line's stages and the
/// equipment on the line must together deliver at least the dataset's threshold.
fn post_minimum_line_productivity(
    context: &mut FormulationContext<'_>,
) -> Result<(), FormulationError> {
    let dataset = context.dataset;

    for line in dataset.lines() {
        let floor = dataset.minimum_line_productivity(line);
        if floor <= 0 {
            continue;
        }

        for day in dataset.day_windows() {
            let mut terms: Vec<LinearTerm> = Vec::new();

            for shift in day.shifts() {
                for stage in dataset.stages() {
                    if !dataset.line_has_stage(line, stage) {
                        continue;
                    }
                    for worker in dataset.workers() {
                        if let Some(variable) = context.variables.worker(shift, stage, worker) {
                            let score = dataset.productivity_score(stage, worker);
                            if score > 0 {
                                terms.push(variable.scaled(score));
                            }
                        }
                    }
                }

                for equipment in dataset.equipments() {
                    let score = dataset.equipment_productivity(equipment);
                    if score > 0 {
                        terms.push(
                            context
                                .variables
                                .equipment(shift, line, equipment)
                                .scaled(score),
                        );
                    }
                }
            }

            context
                .model
                .add_constraint(constraints::greater_than_or_equals(terms, floor))
                .post()?;
        }
    }

    Ok(())
}
