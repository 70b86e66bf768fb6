//! First formulation pass: creates the assignment variables.
//!
//! Worker slots exist only for eligible-and-available combinations; equipment slots exist for
//! every (shift, line, equipment) triple. Iteration is in ascending index order so repeated runs
//! over the same dataset produce identical models.

use log::debug;

use crate::formulation::context::FormulationContext;

pub(crate) fn run(context: &mut FormulationContext<'_>) {
    let dataset = context.dataset;

    for shift in dataset.shifts() {
        for stage in dataset.stages() {
            for worker in dataset.workers() {
                if !dataset.is_available(worker, shift) || !dataset.is_eligible(worker, stage) {
                    continue;
                }

                let variable = context
                    .model
                    .new_named_boolean(format!("assign_worker({shift},{stage},{worker})"));
                context.variables.set_worker(shift, stage, worker, variable);
            }
        }
    }

    for shift in dataset.shifts() {
        for line in dataset.lines() {
            for equipment in dataset.equipments() {
                let variable = context
                    .model
                    .new_named_boolean(format!("assign_equipment({shift},{line},{equipment})"));
                context.variables.push_equipment(variable);
            }
        }
    }

    debug!(
        "created {} worker slots and {} equipment slots",
        context.variables.number_of_worker_slots(),
        context.variables.number_of_equipment_slots()
    );
}
