//! Third formulation pass: composes the objective from the activated terms.
//!
//! Each activated term produces one total variable tied to its summands by a linear equality;
//! the objective is the weighted sum of the totals, minimised. Terms that are not activated
//! leave no trace in the model.

use itertools::Itertools;

use crate::constraints;
use crate::dataset::ObjectiveTerm;
use crate::dataset::StageId;
use crate::formulation::context::FormulationContext;
use crate::formulation::FormulationError;
use crate::formulation::ObjectiveHandles;
use crate::model::BoolVar;
use crate::model::IntVar;
use crate::model::LinearTerm;
use crate::model::Model;

pub(crate) fn run(
    context: &mut FormulationContext<'_>,
) -> Result<ObjectiveHandles, FormulationError> {
    let mut totals: Vec<(ObjectiveTerm, IntVar)> = Vec::new();

    for term in ObjectiveTerm::ALL {
        if !context.dataset.objective_activated(term) {
            continue;
        }

        let total = match term {
            ObjectiveTerm::ProductivityGap => productivity_gap_total(context)?,
            ObjectiveTerm::TeamShuffle => team_shuffle_total(context)?,
            ObjectiveTerm::LineProductivity => line_productivity_total(context)?,
            ObjectiveTerm::Salary => salary_total(context)?,
            ObjectiveTerm::NewcomerChance => newcomer_total(context)?,
        };

        totals.push((term, total));
    }

    let weighted: Vec<LinearTerm> = totals
        .iter()
        .map(|&(term, total)| total.scaled(context.dataset.objective_weight(term)))
        .collect();
    let objective = total_of(&mut context.model, "objective", weighted)?;
    context.model.minimise(objective);

    Ok(ObjectiveHandles { objective, totals })
}

/// Gap auxiliaries: per shift and line, for every unordered pair of distinct stages of the line
/// and every pair of distinct workers that could hold them, a signed difference variable equal
/// to the workers' score difference when both are assigned, plus its absolute value. The
/// absolute values sum into the total; a pair that is not selected leaves its auxiliary
/// unconstrained, and minimisation relaxes it to zero.
fn productivity_gap_total(
    context: &mut FormulationContext<'_>,
) -> Result<IntVar, FormulationError> {
    let dataset = context.dataset;
    let mut magnitudes: Vec<LinearTerm> = Vec::new();

    for shift in dataset.shifts() {
        for line in dataset.lines() {
            let line_stages: Vec<StageId> = dataset
                .stages()
                .filter(|&stage| dataset.line_has_stage(line, stage))
                .collect();

            for (first_stage, second_stage) in line_stages.iter().copied().tuple_combinations() {
                for first_worker in dataset.workers() {
                    let Some(first_slot) =
                        context.variables.worker(shift, first_stage, first_worker)
                    else {
                        continue;
                    };

                    for second_worker in dataset.workers() {
                        if first_worker == second_worker {
                            continue;
                        }
                        let Some(second_slot) =
                            context.variables.worker(shift, second_stage, second_worker)
                        else {
                            continue;
                        };

                        let difference = dataset.productivity_score(first_stage, first_worker)
                            - dataset.productivity_score(second_stage, second_worker);

                        let signed = context.model.new_bounded_integer(-100, 100);
                        let magnitude = context.model.new_bounded_integer(0, 100);

                        context
                            .model
                            .add_constraint(constraints::equals([signed.scaled(1)], difference))
                            .implied_by([first_slot, second_slot])?;
                        context
                            .model
                            .add_constraint(constraints::absolute(signed, magnitude))
                            .post()?;

                        magnitudes.push(magnitude.scaled(1));
                    }
                }
            }
        }
    }

    total_of(&mut context.model, "gap_total", magnitudes)
}

/// One boolean per (worker, stage) with at least one slot, implied by every assignment of that
/// worker to that stage. The total counts the distinct stage crews each worker joins over the
/// horizon.
fn team_shuffle_total(context: &mut FormulationContext<'_>) -> Result<IntVar, FormulationError> {
    let dataset = context.dataset;
    let mut members: Vec<LinearTerm> = Vec::new();

    for worker in dataset.workers() {
        for stage in dataset.stages() {
            let slots: Vec<BoolVar> = dataset
                .shifts()
                .filter_map(|shift| context.variables.worker(shift, stage, worker))
                .collect();
            if slots.is_empty() {
                continue;
            }

            let works_stage = context
                .model
                .new_named_boolean(format!("works_stage({worker},{stage})"));

            for slot in slots {
                context
                    .model
                    .add_constraint(constraints::less_than_or_equals(
                        [slot.scaled(1), works_stage.scaled(-1)],
                        0,
                    ))
                    .post()?;
            }

            members.push(works_stage.scaled(1));
        }
    }

    total_of(&mut context.model, "shuffle_total", members)
}

/// Productivity delivered to the lines: every worker slot weighted by its stage score, every
/// equipment slot by its productivity. Maximisation comes from a negative term weight.
fn line_productivity_total(
    context: &mut FormulationContext<'_>,
) -> Result<IntVar, FormulationError> {
    let dataset = context.dataset;
    let mut terms: Vec<LinearTerm> = Vec::new();

    for shift in dataset.shifts() {
        for stage in dataset.stages() {
            for worker in dataset.workers() {
                if let Some(slot) = context.variables.worker(shift, stage, worker) {
                    let score = dataset.productivity_score(stage, worker);
                    if score > 0 {
                        terms.push(slot.scaled(score));
                    }
                }
            }
        }

        for line in dataset.lines() {
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
    }

    total_of(&mut context.model, "productivity_total", terms)
}

/// A hired indicator per salaried worker, implied by each of the worker's slots; the total
/// weights the indicators by salary.
fn salary_total(context: &mut FormulationContext<'_>) -> Result<IntVar, FormulationError> {
    let dataset = context.dataset;
    let mut costs: Vec<LinearTerm> = Vec::new();

    for worker in dataset.workers() {
        let salary = dataset.salary(worker);
        if salary <= 0 {
            continue;
        }

        let mut slots: Vec<BoolVar> = Vec::new();
        for shift in dataset.shifts() {
            for stage in dataset.stages() {
                if let Some(variable) = context.variables.worker(shift, stage, worker) {
                    slots.push(variable);
                }
            }
        }
        if slots.is_empty() {
            continue;
        }

        let hired = context.model.new_named_boolean(format!("hired({worker})"));
        for slot in slots {
            context
                .model
                .add_constraint(constraints::less_than_or_equals(
                    [slot.scaled(1), hired.scaled(-1)],
                    0,
                ))
                .post()?;
        }

        costs.push(hired.scaled(salary));
    }

    total_of(&mut context.model, "salary_total", costs)
}

/// Slots held by workers without any recorded experience; the total counts their assignments
/// and is weighted negatively when the term maximises newcomer participation.
fn newcomer_total(context: &mut FormulationContext<'_>) -> Result<IntVar, FormulationError> {
    let dataset = context.dataset;
    let mut terms: Vec<LinearTerm> = Vec::new();

    for worker in dataset.workers() {
        if !dataset.is_newcomer(worker) {
            continue;
        }

        for shift in dataset.shifts() {
            for stage in dataset.stages() {
                if let Some(slot) = context.variables.worker(shift, stage, worker) {
                    terms.push(slot.scaled(1));
                }
            }
        }
    }

    total_of(&mut context.model, "newcomer_total", terms)
}

/// A bounded integer equal to the sum of the terms, with bounds computed by interval arithmetic
/// over the terms' current domains. An empty term list produces a constant zero.
fn total_of(
    model: &mut Model,
    name: &str,
    terms: Vec<LinearTerm>,
) -> Result<IntVar, FormulationError> {
    let (lower, upper) = term_sum_bounds(model, &terms);
    let total = model.new_named_bounded_integer(lower, upper, name);

    let mut equality = terms;
    equality.push(total.scaled(-1));
    model.add_constraint(constraints::equals(equality, 0)).post()?;

    Ok(total)
}

fn term_sum_bounds(model: &Model, terms: &[LinearTerm]) -> (i32, i32) {
    let mut lower: i64 = 0;
    let mut upper: i64 = 0;

    for term in terms {
        let info = &model.variable_infos()[term.variable];
        let weight = i64::from(term.weight);
        let variable_lower = i64::from(info.lower_bound);
        let variable_upper = i64::from(info.upper_bound);

        if weight >= 0 {
            lower += weight * variable_lower;
            upper += weight * variable_upper;
        } else {
            lower += weight * variable_upper;
            upper += weight * variable_lower;
        }
    }

    (clamp_to_i32(lower), clamp_to_i32(upper))
}

fn clamp_to_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
