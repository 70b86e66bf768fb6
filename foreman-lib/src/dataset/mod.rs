//! Instance data: dimensions, capability tables, and the scores derived from them.
//!
//! Raw instances arrive as [`DatasetTables`], whether parsed from a file or assembled in code
//! through a [`DatasetProvider`]. [`Dataset::populate`] validates the tables and exposes them
//! through typed accessors, which is the only view the model formulation ever sees.

mod days;
mod ids;
mod tables;

pub use days::DayWindow;
pub use days::SHIFTS_PER_DAY;
pub use ids::EquipmentId;
pub use ids::FunctionId;
pub use ids::LineId;
pub use ids::ShiftId;
pub use ids::StageId;
pub use ids::WorkerId;
pub use tables::DatasetTables;
pub use tables::TableError;

use crate::containers::StorageKey;

/// Directive attached to a (stage, worker) cell before solving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreassignDirective {
    /// The worker holds the stage in every shift they are available for.
    ForceIn,
    /// Prefer leaving the worker off the stage; search tries the alternative first.
    HintOut,
    /// The worker never takes the stage.
    ForceOut,
    /// No directive.
    Neutral,
}

/// An objective term which instances can toggle and weight individually.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectiveTerm {
    /// Productivity gaps between workers staffing the same line in a shift.
    ProductivityGap,
    /// Number of distinct stages each worker touches over the horizon.
    TeamShuffle,
    /// Combined productivity brought to the lines by workers and equipment.
    LineProductivity,
    /// Salary cost of the set of workers used at all.
    Salary,
    /// Stage assignments given to workers without any recorded experience.
    NewcomerChance,
}

impl ObjectiveTerm {
    /// All terms, in the order the activation and weight vectors index them.
    pub const ALL: [ObjectiveTerm; 5] = [
        ObjectiveTerm::ProductivityGap,
        ObjectiveTerm::TeamShuffle,
        ObjectiveTerm::LineProductivity,
        ObjectiveTerm::Salary,
        ObjectiveTerm::NewcomerChance,
    ];

    fn position(self) -> usize {
        match self {
            ObjectiveTerm::ProductivityGap => 0,
            ObjectiveTerm::TeamShuffle => 1,
            ObjectiveTerm::LineProductivity => 2,
            ObjectiveTerm::Salary => 3,
            ObjectiveTerm::NewcomerChance => 4,
        }
    }
}

/// Source of raw instance tables: a parsed file, a generator, or a test fixture.
pub trait DatasetProvider {
    fn tables(&self) -> DatasetTables;
}

impl DatasetProvider for DatasetTables {
    fn tables(&self) -> DatasetTables {
        self.clone()
    }
}

/// A validated instance.
#[derive(Clone, Debug)]
pub struct Dataset {
    tables: DatasetTables,
    /// `stages x workers` productivity scores derived from experience, health and age.
    productivity: Vec<Vec<i32>>,
}

impl Dataset {
    /// Validate raw tables and derive the productivity scores.
    pub fn populate(tables: DatasetTables) -> Result<Dataset, TableError> {
        tables.validate()?;

        let productivity = (0..tables.stages)
            .map(|stage| {
                (0..tables.workers)
                    .map(|worker| {
                        let experience = tables.experience[stage][worker];
                        let health = tables.health[worker];
                        let age = tables.age[worker];
                        (50 * experience + 30 * health + 20 * (100 - age)) / 100
                    })
                    .collect()
            })
            .collect();

        Ok(Dataset {
            tables,
            productivity,
        })
    }

    /// Build a dataset from any [`DatasetProvider`].
    pub fn from_provider(provider: &impl DatasetProvider) -> Result<Dataset, TableError> {
        Dataset::populate(provider.tables())
    }

    pub fn number_of_shifts(&self) -> usize {
        self.tables.shifts
    }

    pub fn number_of_lines(&self) -> usize {
        self.tables.lines
    }

    pub fn number_of_stages(&self) -> usize {
        self.tables.stages
    }

    pub fn number_of_workers(&self) -> usize {
        self.tables.workers
    }

    pub fn number_of_equipments(&self) -> usize {
        self.tables.equipments
    }

    pub fn number_of_functions(&self) -> usize {
        self.tables.functions
    }

    pub fn shifts(&self) -> impl Iterator<Item = ShiftId> {
        (0..self.tables.shifts).map(ShiftId::new)
    }

    pub fn lines(&self) -> impl Iterator<Item = LineId> + Clone {
        (0..self.tables.lines).map(LineId::new)
    }

    pub fn stages(&self) -> impl Iterator<Item = StageId> {
        (0..self.tables.stages).map(StageId::new)
    }

    pub fn workers(&self) -> impl Iterator<Item = WorkerId> {
        (0..self.tables.workers).map(WorkerId::new)
    }

    pub fn equipments(&self) -> impl Iterator<Item = EquipmentId> {
        (0..self.tables.equipments).map(EquipmentId::new)
    }

    pub fn functions(&self) -> impl Iterator<Item = FunctionId> {
        (0..self.tables.functions).map(FunctionId::new)
    }

    /// The horizon cut into working days of up to [`SHIFTS_PER_DAY`] shifts.
    pub fn day_windows(&self) -> impl Iterator<Item = DayWindow> {
        days::day_windows(self.tables.shifts)
    }

    pub fn number_of_days(&self) -> usize {
        self.tables.shifts.div_ceil(SHIFTS_PER_DAY)
    }

    /// Whether the stage sits on the line.
    pub fn line_has_stage(&self, line: LineId, stage: StageId) -> bool {
        self.tables.line_stage[line.index()][stage.index()] == 1
    }

    /// Whether the worker is available for the shift.
    pub fn is_available(&self, worker: WorkerId, shift: ShiftId) -> bool {
        self.tables.worker_shift[worker.index()][shift.index()] > 0
    }

    /// Whether the worker's experience on the stage clears the stage's threshold.
    pub fn is_eligible(&self, worker: WorkerId, stage: StageId) -> bool {
        self.tables.experience[stage.index()][worker.index()]
            >= self.tables.experience_threshold[stage.index()]
    }

    pub fn preassign_directive(&self, stage: StageId, worker: WorkerId) -> PreassignDirective {
        match self.tables.preassign[stage.index()][worker.index()] {
            1 => PreassignDirective::ForceIn,
            -1 => PreassignDirective::HintOut,
            -2 => PreassignDirective::ForceOut,
            _ => PreassignDirective::Neutral,
        }
    }

    /// Productivity score of the worker on the stage.
    ///
    /// Derived during [`Dataset::populate`] as
    /// `(50 * experience + 30 * health + 20 * (100 - age)) / 100`, so it lives in `0..=100` like
    /// its inputs.
    pub fn productivity_score(&self, stage: StageId, worker: WorkerId) -> i32 {
        self.productivity[stage.index()][worker.index()]
    }

    /// Units of the function one item of the equipment type provides.
    pub fn equipment_quantity(&self, equipment: EquipmentId, function: FunctionId) -> i32 {
        self.tables.equipment_function[equipment.index()][function.index()]
    }

    pub fn equipment_productivity(&self, equipment: EquipmentId) -> i32 {
        self.tables.equipment_productivity[equipment.index()]
    }

    /// Units of the function the line needs in every shift.
    pub fn function_requirement(&self, line: LineId, function: FunctionId) -> i32 {
        self.tables.line_requirement[line.index()][function.index()]
    }

    /// Minimum combined productivity required on the line; 0 disables the floor.
    pub fn minimum_line_productivity(&self, line: LineId) -> i32 {
        self.tables.min_line_productivity[line.index()]
    }

    pub fn salary(&self, worker: WorkerId) -> i32 {
        self.tables.salary[worker.index()]
    }

    /// A newcomer has no recorded experience on any stage.
    pub fn is_newcomer(&self, worker: WorkerId) -> bool {
        (0..self.tables.stages).all(|stage| self.tables.experience[stage][worker.index()] == 0)
    }

    pub fn objective_activated(&self, term: ObjectiveTerm) -> bool {
        self.tables.activation[term.position()] == 1
    }

    pub fn objective_weight(&self, term: ObjectiveTerm) -> i32 {
        self.tables.weights[term.position()]
    }
}
