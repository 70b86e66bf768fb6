//! The domain-level result of a solve: who stands where in each shift, and which equipment
//! serves which line.

use std::fmt::Display;
use std::fmt::Formatter;

use itertools::Itertools;

use crate::containers::StorageKey;
use crate::dataset::EquipmentId;
use crate::dataset::LineId;
use crate::dataset::ShiftId;
use crate::dataset::StageId;
use crate::dataset::WorkerId;

/// A solved roster with the echoed instance dimensions.
///
/// A `None` worker cell can only come from a stage that had no coverage constraint; under the
/// standard formulation every cell is `Some`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    shifts: usize,
    stages: usize,
    lines: usize,
    equipments: usize,
    workers: Vec<Option<WorkerId>>,
    equipment: Vec<bool>,
}

impl Schedule {
    pub(crate) fn new(
        shifts: usize,
        stages: usize,
        lines: usize,
        equipments: usize,
        workers: Vec<Option<WorkerId>>,
        equipment: Vec<bool>,
    ) -> Schedule {
        debug_assert_eq!(workers.len(), shifts * stages);
        debug_assert_eq!(equipment.len(), shifts * lines * equipments);

        Schedule {
            shifts,
            stages,
            lines,
            equipments,
            workers,
            equipment,
        }
    }

    pub fn number_of_shifts(&self) -> usize {
        self.shifts
    }

    pub fn number_of_stages(&self) -> usize {
        self.stages
    }

    pub fn number_of_lines(&self) -> usize {
        self.lines
    }

    pub fn number_of_equipments(&self) -> usize {
        self.equipments
    }

    /// The worker holding the (shift, stage) cell.
    pub fn worker_for(&self, shift: ShiftId, stage: StageId) -> Option<WorkerId> {
        self.workers[shift.index() * self.stages + stage.index()]
    }

    pub fn is_equipment_assigned(
        &self,
        shift: ShiftId,
        line: LineId,
        equipment: EquipmentId,
    ) -> bool {
        self.equipment[self.equipment_index(shift, line, equipment)]
    }

    /// The equipment items serving the line in the shift, in index order.
    pub fn equipment_for(
        &self,
        shift: ShiftId,
        line: LineId,
    ) -> impl Iterator<Item = EquipmentId> + '_ {
        let base = (shift.index() * self.lines + line.index()) * self.equipments;
        (0..self.equipments)
            .filter(move |&item| self.equipment[base + item])
            .map(EquipmentId::new)
    }

    /// All worker assignments, in (shift, stage) order.
    pub fn worker_assignments(&self) -> impl Iterator<Item = (ShiftId, StageId, WorkerId)> + '_ {
        (0..self.shifts).flat_map(move |shift| {
            (0..self.stages).filter_map(move |stage| {
                self.workers[shift * self.stages + stage]
                    .map(|worker| (ShiftId::new(shift), StageId::new(stage), worker))
            })
        })
    }

    fn equipment_index(&self, shift: ShiftId, line: LineId, equipment: EquipmentId) -> usize {
        (shift.index() * self.lines + line.index()) * self.equipments + equipment.index()
    }
}

impl Display for Schedule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for shift in (0..self.shifts).map(ShiftId::new) {
            writeln!(f, "shift {shift}")?;

            for stage in (0..self.stages).map(StageId::new) {
                match self.worker_for(shift, stage) {
                    Some(worker) => writeln!(f, "  stage {stage}: worker {worker}")?,
                    None => writeln!(f, "  stage {stage}: unassigned")?,
                }
            }

            for line in (0..self.lines).map(LineId::new) {
                let items = self
                    .equipment_for(shift, line)
                    .map(|item| item.to_string())
                    .join(", ");
                if !items.is_empty() {
                    writeln!(f, "  line {line} equipment: {items}")?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Schedule {
        Schedule::new(
            2,
            2,
            1,
            2,
            vec![
                Some(WorkerId::new(1)),
                Some(WorkerId::new(0)),
                Some(WorkerId::new(0)),
                Some(WorkerId::new(1)),
            ],
            vec![true, false, false, true],
        )
    }

    #[test]
    fn cells_are_addressed_by_shift_and_stage() {
        let schedule = sample();

        assert_eq!(
            schedule.worker_for(ShiftId::new(0), StageId::new(0)),
            Some(WorkerId::new(1))
        );
        assert_eq!(
            schedule.worker_for(ShiftId::new(1), StageId::new(1)),
            Some(WorkerId::new(1))
        );
    }

    #[test]
    fn equipment_lists_follow_the_shift() {
        let schedule = sample();

        let first: Vec<_> = schedule
            .equipment_for(ShiftId::new(0), LineId::new(0))
            .collect();
        let second: Vec<_> = schedule
            .equipment_for(ShiftId::new(1), LineId::new(0))
            .collect();

        assert_eq!(first, vec![EquipmentId::new(0)]);
        assert_eq!(second, vec![EquipmentId::new(1)]);
    }

    #[test]
    fn the_roster_prints_every_shift() {
        let rendered = sample().to_string();

        assert!(rendered.contains("shift 0"));
        assert!(rendered.contains("  stage 1: worker 0"));
        assert!(rendered.contains("  line 0 equipment: 1"));
    }

    #[test]
    fn assignments_iterate_in_shift_order() {
        let assignments: Vec<_> = sample().worker_assignments().collect();

        assert_eq!(assignments.len(), 4);
        assert_eq!(
            assignments[0],
            (ShiftId::new(0), StageId::new(0), WorkerId::new(1))
        );
    }
}
