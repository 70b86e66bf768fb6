use crate::containers::StorageKey;
use crate::dataset::Dataset;
use crate::dataset::EquipmentId;
use crate::dataset::LineId;
use crate::dataset::ShiftId;
use crate::dataset::StageId;
use crate::dataset::WorkerId;
use crate::formulation::FormulationOptions;
use crate::model::BoolVar;
use crate::model::Model;

/// State shared between the formulation passes: the dataset they read, the model they build
/// into, and the variable arenas that connect them.
pub(crate) struct FormulationContext<'a> {
    pub(crate) dataset: &'a Dataset,
    pub(crate) options: FormulationOptions,
    pub(crate) model: Model,
    pub(crate) variables: AssignmentVariables,
}

impl<'a> FormulationContext<'a> {
    pub(crate) fn new(dataset: &'a Dataset, options: FormulationOptions) -> FormulationContext<'a> {
        FormulationContext {
            dataset,
            options,
            model: Model::default(),
            variables: AssignmentVariables::new(dataset),
        }
    }
}

/// The assignment variables of one model, addressable by coordinates.
///
/// Worker slots are sparse: a slot exists only when the worker is both available for the shift
/// and eligible for the stage, and existence is an O(1) check on the flat arena. Equipment slots
/// are dense over (shift, line, equipment) and filled in that iteration order.
#[derive(Debug)]
pub(crate) struct AssignmentVariables {
    shifts: usize,
    stages: usize,
    workers: usize,
    lines: usize,
    equipments: usize,
    worker_slots: Vec<Option<BoolVar>>,
    equipment_slots: Vec<BoolVar>,
}

impl AssignmentVariables {
    pub(crate) fn new(dataset: &Dataset) -> AssignmentVariables {
        let shifts = dataset.number_of_shifts();
        let stages = dataset.number_of_stages();
        let workers = dataset.number_of_workers();
        let lines = dataset.number_of_lines();
        let equipments = dataset.number_of_equipments();

        AssignmentVariables {
            shifts,
            stages,
            workers,
            lines,
            equipments,
            worker_slots: vec![None; shifts * stages * workers],
            equipment_slots: Vec::with_capacity(shifts * lines * equipments),
        }
    }

    pub(crate) fn shifts(&self) -> usize {
        self.shifts
    }

    pub(crate) fn stages(&self) -> usize {
        self.stages
    }

    pub(crate) fn workers(&self) -> usize {
        self.workers
    }

    pub(crate) fn lines(&self) -> usize {
        self.lines
    }

    pub(crate) fn equipments(&self) -> usize {
        self.equipments
    }

    pub(crate) fn set_worker(
        &mut self,
        shift: ShiftId,
        stage: StageId,
        worker: WorkerId,
        variable: BoolVar,
    ) {
        let index = self.worker_index(shift, stage, worker);
        self.worker_slots[index] = Some(variable);
    }

    /// Append the next equipment slot; callers fill the arena in (shift, line, equipment)
    /// iteration order.
    pub(crate) fn push_equipment(&mut self, variable: BoolVar) {
        self.equipment_slots.push(variable);
    }

    /// The worker assignment variable for the slot, when the slot exists.
    pub(crate) fn worker(
        &self,
        shift: ShiftId,
        stage: StageId,
        worker: WorkerId,
    ) -> Option<BoolVar> {
        self.worker_slots[self.worker_index(shift, stage, worker)]
    }

    pub(crate) fn equipment(
        &self,
        shift: ShiftId,
        line: LineId,
        equipment: EquipmentId,
    ) -> BoolVar {
        self.equipment_slots[self.equipment_index(shift, line, equipment)]
    }

    pub(crate) fn number_of_worker_slots(&self) -> usize {
        self.worker_slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub(crate) fn number_of_equipment_slots(&self) -> usize {
        self.equipment_slots.len()
    }

    fn worker_index(&self, shift: ShiftId, stage: StageId, worker: WorkerId) -> usize {
        (shift.index() * self.stages + stage.index()) * self.workers + worker.index()
    }

    fn equipment_index(&self, shift: ShiftId, line: LineId, equipment: EquipmentId) -> usize {
        (shift.index() * self.lines + line.index()) * self.equipments + equipment.index()
    }
}
