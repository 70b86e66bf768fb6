//! Turning a [`Dataset`] into a solvable [`Model`] and reading solutions back out.
//!
//! [`formulate`] runs three passes over a fresh model: variable creation, constraint posting in
//! rule precedence, objective composition. The passes communicate through a shared context; the
//! result bundles the model with its variable arenas so a solution can be projected into a
//! [`Schedule`].

mod context;
mod create_objective;
mod create_variables;
mod post_constraints;

use log::debug;
use thiserror::Error;

use context::AssignmentVariables;
use context::FormulationContext;

use crate::dataset::Dataset;
use crate::dataset::EquipmentId;
use crate::dataset::LineId;
use crate::dataset::ObjectiveTerm;
use crate::dataset::ShiftId;
use crate::dataset::StageId;
use crate::dataset::WorkerId;
use crate::model::BoolVar;
use crate::model::ConstraintOperationError;
use crate::model::IntVar;
use crate::model::Model;
use crate::results::Solution;
use crate::schedule::Schedule;

/// Switches for the configurable constraints; the canonical build leaves both disabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct FormulationOptions {
    /// Restrict every worker to at most one slot within each day window.
    pub one_assignment_per_worker_per_day: bool,
    /// Enforce the per-line productivity floor given by the dataset's `min_line_productivity`.
    pub enforce_minimum_line_productivity: bool,
}

/// Failures while building the model from a dataset.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FormulationError {
    /// A (shift, stage) cell no worker can cover: its coverage set is empty, or directives fix
    /// every member false.
    #[error("no worker can cover stage {stage} in shift {shift}")]
    UnsatisfiableCoverage { shift: ShiftId, stage: StageId },

    #[error(transparent)]
    Operation(#[from] ConstraintOperationError),
}

/// Handles to the objective variable and the activated per-term totals.
#[derive(Debug)]
pub(crate) struct ObjectiveHandles {
    pub(crate) objective: IntVar,
    pub(crate) totals: Vec<(ObjectiveTerm, IntVar)>,
}

/// Build the model for a dataset.
///
/// The passes run in rule precedence, and the first structural defect aborts the build with its
/// coordinates. Iteration order is deterministic, so the same dataset and options always
/// produce a structurally identical model.
pub fn formulate(
    dataset: &Dataset,
    options: FormulationOptions,
) -> Result<FormulatedModel, FormulationError> {
    let mut context = FormulationContext::new(dataset, options);

    create_variables::run(&mut context);
    post_constraints::run(&mut context)?;
    let objective = create_objective::run(&mut context)?;

    debug!(
        "formulated a model with {} variables and {} constraints",
        context.model.number_of_variables(),
        context.model.number_of_constraints()
    );

    Ok(FormulatedModel {
        model: context.model,
        variables: context.variables,
        objective,
    })
}

/// The output of [`formulate`]: the model plus the handles needed to interpret its solutions.
#[derive(Debug)]
pub struct FormulatedModel {
    model: Model,
    variables: AssignmentVariables,
    objective: ObjectiveHandles,
}

impl FormulatedModel {
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The variable the backend minimises.
    pub fn objective_variable(&self) -> IntVar {
        self.objective.objective
    }

    /// The total variable of an objective term, or `None` when the term is not activated.
    pub fn term_total(&self, term: ObjectiveTerm) -> Option<IntVar> {
        self.objective
            .totals
            .iter()
            .find(|&&(candidate, _)| candidate == term)
            .map(|&(_, total)| total)
    }

    /// The worker assignment variable of a slot, when the slot exists.
    pub fn worker_variable(
        &self,
        shift: ShiftId,
        stage: StageId,
        worker: WorkerId,
    ) -> Option<BoolVar> {
        self.variables.worker(shift, stage, worker)
    }

    pub fn equipment_variable(
        &self,
        shift: ShiftId,
        line: LineId,
        equipment: EquipmentId,
    ) -> BoolVar {
        self.variables.equipment(shift, line, equipment)
    }

    /// Project a solution of [`FormulatedModel::model`] into a domain-level schedule.
    pub fn extract_schedule(&self, solution: &Solution) -> Schedule {
        let shifts = self.variables.shifts();
        let stages = self.variables.stages();
        let worker_count = self.variables.workers();
        let lines = self.variables.lines();
        let equipments = self.variables.equipments();

        let mut workers: Vec<Option<WorkerId>> = Vec::with_capacity(shifts * stages);
        for shift in (0..shifts).map(ShiftId::new) {
            for stage in (0..stages).map(StageId::new) {
                let assigned = (0..worker_count).map(WorkerId::new).find(|&worker| {
                    self.variables
                        .worker(shift, stage, worker)
                        .is_some_and(|variable| solution.get_boolean_value(variable))
                });
                workers.push(assigned);
            }
        }

        let mut equipment: Vec<bool> = Vec::with_capacity(shifts * lines * equipments);
        for shift in (0..shifts).map(ShiftId::new) {
            for line in (0..lines).map(LineId::new) {
                for item in (0..equipments).map(EquipmentId::new) {
                    let variable = self.variables.equipment(shift, line, item);
                    equipment.push(solution.get_boolean_value(variable));
                }
            }
        }

        Schedule::new(shifts, stages, lines, equipments, workers, equipment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetTables;

    fn line_on_all_stages(tables: &mut DatasetTables) {
        for row in &mut tables.line_stage {
            for cell in row {
                *cell = 1;
            }
        }
    }

    #[test]
    fn an_uncoverable_cell_is_reported_with_coordinates() {
        let mut tables = DatasetTables::new(2, 1, 1, 2, 0, 0);
        line_on_all_stages(&mut tables);
        // Nobody clears the threshold on the only stage.
        tables.experience_threshold[0] = 60;
        let dataset = Dataset::populate(tables).unwrap();

        let error = formulate(&dataset, FormulationOptions::default()).unwrap_err();
        assert_eq!(
            error,
            FormulationError::UnsatisfiableCoverage {
                shift: ShiftId::new(0),
                stage: StageId::new(0),
            }
        );
    }

    #[test]
    fn unavailable_shifts_have_no_worker_slots() {
        let mut tables = DatasetTables::new(2, 1, 1, 2, 0, 0);
        line_on_all_stages(&mut tables);
        tables.worker_shift[1][0] = -1;
        let dataset = Dataset::populate(tables).unwrap();

        let formulated = formulate(&dataset, FormulationOptions::default()).unwrap();

        assert!(formulated
            .worker_variable(ShiftId::new(0), StageId::new(0), WorkerId::new(1))
            .is_none());
        assert!(formulated
            .worker_variable(ShiftId::new(1), StageId::new(0), WorkerId::new(1))
            .is_some());
    }

    #[test]
    fn repeated_builds_are_structurally_identical() {
        let mut tables = DatasetTables::new(4, 2, 2, 3, 2, 1);
        line_on_all_stages(&mut tables);
        tables.equipment_function[0][0] = 2;
        tables.line_requirement[0][0] = 1;
        let dataset = Dataset::populate(tables).unwrap();

        let first = formulate(&dataset, FormulationOptions::default()).unwrap();
        let second = formulate(&dataset, FormulationOptions::default()).unwrap();

        assert_eq!(
            first.model().number_of_variables(),
            second.model().number_of_variables()
        );
        assert_eq!(
            first.model().number_of_constraints(),
            second.model().number_of_constraints()
        );
    }

    #[test]
    fn inactive_terms_have_no_totals() {
        let mut tables = DatasetTables::new(2, 1, 1, 1, 0, 0);
        line_on_all_stages(&mut tables);
        let dataset = Dataset::populate(tables).unwrap();

        let formulated = formulate(&dataset, FormulationOptions::default()).unwrap();

        assert!(formulated
            .term_total(ObjectiveTerm::ProductivityGap)
            .is_some());
        assert!(formulated.term_total(ObjectiveTerm::Salary).is_none());
    }
}
