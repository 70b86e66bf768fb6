use thiserror::Error;

use crate::dataset::ObjectiveTerm;

/// The dimensions and raw tables of an instance, prior to validation.
///
/// All tables are plain row-major vectors so they can come straight out of a parser or a test
/// fixture. [`Dataset::populate`](crate::dataset::Dataset::populate) checks shapes and value
/// ranges and turns the tables into typed accessors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetTables {
    /// Number of shifts in the planning horizon.
    pub shifts: usize,
    /// Number of production lines.
    pub lines: usize,
    /// Number of stages across all lines.
    pub stages: usize,
    /// Number of workers.
    pub workers: usize,
    /// Number of equipment items.
    pub equipments: usize,
    /// Number of functions equipment items can perform.
    pub functions: usize,

    /// `lines x stages`; 1 when the stage sits on the line.
    pub line_stage: Vec<Vec<i32>>,
    /// `workers x shifts`; 1 when the worker is available for the shift, -1 when not.
    pub worker_shift: Vec<Vec<i32>>,
    /// `stages x workers`; experience scores in `0..=100`.
    pub experience: Vec<Vec<i32>>,
    /// Per stage, the experience score required to work it, in `0..=100`.
    pub experience_threshold: Vec<i32>,
    /// Worker ages in `0..=100`.
    pub age: Vec<i32>,
    /// Worker health scores in `0..=100`.
    pub health: Vec<i32>,
    /// Worker salaries, non-negative.
    pub salary: Vec<i32>,
    /// `stages x workers`; pre-assignment directives in `-2..=1`.
    pub preassign: Vec<Vec<i32>>,
    /// `equipments x functions`; units of the function one item provides, non-negative.
    pub equipment_function: Vec<Vec<i32>>,
    /// Equipment productivity scores in `0..=100`.
    pub equipment_productivity: Vec<i32>,
    /// `lines x functions`; units of the function the line needs each shift, non-negative.
    pub line_requirement: Vec<Vec<i32>>,
    /// Per line, the minimum combined productivity when the floor is enforced; 0 disables it.
    pub min_line_productivity: Vec<i32>,
    /// Which objective terms are active, 0/1, indexed like [`ObjectiveTerm::ALL`].
    pub activation: Vec<i32>,
    /// Weights of the objective terms, same indexing.
    pub weights: Vec<i32>,
}

impl DatasetTables {
    /// Tables of the given dimensions with neutral contents: everyone available every shift, no
    /// experience, no directives, no equipment capabilities, and only the productivity-gap
    /// objective active.
    pub fn new(
        shifts: usize,
        lines: usize,
        stages: usize,
        workers: usize,
        equipments: usize,
        functions: usize,
    ) -> DatasetTables {
        DatasetTables {
            shifts,
            lines,
            stages,
            workers,
            equipments,
            functions,
            line_stage: vec![vec![0; stages]; lines],
            worker_shift: vec![vec![1; shifts]; workers],
            experience: vec![vec![0; workers]; stages],
            experience_threshold: vec![0; stages],
            age: vec![0; workers],
            health: vec![0; workers],
            salary: vec![0; workers],
            preassign: vec![vec![0; workers]; stages],
            equipment_function: vec![vec![0; functions]; equipments],
            equipment_productivity: vec![0; equipments],
            line_requirement: vec![vec![0; functions]; lines],
            min_line_productivity: vec![0; lines],
            activation: vec![1, 0, 0, 0, 0],
            weights: vec![1, 1, -1, 1, -1],
        }
    }

    pub(crate) fn validate(&self) -> Result<(), TableError> {
        check_matrix(
            "line_stage",
            &self.line_stage,
            self.lines,
            self.stages,
            "0 or 1",
            |value| value == 0 || value == 1,
        )?;
        check_matrix(
            "worker_shift",
            &self.worker_shift,
            self.workers,
            self.shifts,
            "-1 or 1",
            |value| value == -1 || value == 1,
        )?;
        check_matrix(
            "experience",
            &self.experience,
            self.stages,
            self.workers,
            "0..=100",
            |value| (0..=100).contains(&value),
        )?;
        check_vector(
            "experience_threshold",
            &self.experience_threshold,
            self.stages,
            "0..=100",
            |value| (0..=100).contains(&value),
        )?;
        check_vector("age", &self.age, self.workers, "0..=100", |value| {
            (0..=100).contains(&value)
        })?;
        check_vector("health", &self.health, self.workers, "0..=100", |value| {
            (0..=100).contains(&value)
        })?;
        check_vector(
            "salary",
            &self.salary,
            self.workers,
            "a non-negative value",
            |value| value >= 0,
        )?;
        check_matrix(
            "preassign",
            &self.preassign,
            self.stages,
            self.workers,
            "-2..=1",
            |value| (-2..=1).contains(&value),
        )?;
        check_matrix(
            "equipment_function",
            &self.equipment_function,
            self.equipments,
            self.functions,
            "a non-negative value",
            |value| value >= 0,
        )?;
        check_vector(
            "equipment_productivity",
            &self.equipment_productivity,
            self.equipments,
            "0..=100",
            |value| (0..=100).contains(&value),
        )?;
        check_matrix(
            "line_requirement",
            &self.line_requirement,
            self.lines,
            self.functions,
            "a non-negative value",
            |value| value >= 0,
        )?;
        check_vector(
            "min_line_productivity",
            &self.min_line_productivity,
            self.lines,
            "a non-negative value",
            |value| value >= 0,
        )?;
        check_vector(
            "activation",
            &self.activation,
            ObjectiveTerm::ALL.len(),
            "0 or 1",
            |value| value == 0 || value == 1,
        )?;
        check_vector(
            "weights",
            &self.weights,
            ObjectiveTerm::ALL.len(),
            "any value",
            |_| true,
        )?;

        Ok(())
    }
}

/// Shape or range violations in a [`DatasetTables`] instance.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("table '{table}' has {found} rows, expected {expected}")]
    WrongRowCount {
        table: &'static str,
        found: usize,
        expected: usize,
    },

    #[error("table '{table}' row {row} has {found} entries, expected {expected}")]
    WrongRowWidth {
        table: &'static str,
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("table '{table}' entry ({row}, {column}) is {value}, allowed is {allowed}")]
    ValueOutOfRange {
        table: &'static str,
        row: usize,
        column: usize,
        value: i32,
        allowed: &'static str,
    },
}

fn check_matrix(
    table: &'static str,
    matrix: &[Vec<i32>],
    rows: usize,
    columns: usize,
    allowed: &'static str,
    is_allowed: impl Fn(i32) -> bool,
) -> Result<(), TableError> {
    if matrix.len() != rows {
        return Err(TableError::WrongRowCount {
            table,
            found: matrix.len(),
            expected: rows,
        });
    }

    for (row, entries) in matrix.iter().enumerate() {
        if entries.len() != columns {
            return Err(TableError::WrongRowWidth {
                table,
                row,
                found: entries.len(),
                expected: columns,
            });
        }

        for (column, &value) in entries.iter().enumerate() {
            if !is_allowed(value) {
                return Err(TableError::ValueOutOfRange {
                    table,
                    row,
                    column,
                    value,
                    allowed,
                });
            }
        }
    }

    Ok(())
}

fn check_vector(
    table: &'static str,
    values: &[i32],
    length: usize,
    allowed: &'static str,
    is_allowed: impl Fn(i32) -> bool,
) -> Result<(), TableError> {
    if values.len() != length {
        return Err(TableError::WrongRowCount {
            table,
            found: values.len(),
            expected: length,
        });
    }

    for (column, &value) in values.iter().enumerate() {
        if !is_allowed(value) {
            return Err(TableError::ValueOutOfRange {
                table,
                row: 0,
                column,
                value,
                allowed,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_tables_pass_validation() {
        let tables = DatasetTables::new(6, 2, 3, 4, 2, 2);
        assert_eq!(tables.validate(), Ok(()));
    }

    #[test]
    fn a_short_row_is_reported_with_its_position() {
        let mut tables = DatasetTables::new(6, 2, 3, 4, 2, 2);
        let _ = tables.experience[1].pop();

        assert_eq!(
            tables.validate(),
            Err(TableError::WrongRowWidth {
                table: "experience",
                row: 1,
                found: 3,
                expected: 4,
            })
        );
    }

    #[test]
    fn an_unknown_directive_value_is_rejected() {
        let mut tables = DatasetTables::new(6, 2, 3, 4, 2, 2);
        tables.preassign[2][1] = 7;

        assert_eq!(
            tables.validate(),
            Err(TableError::ValueOutOfRange {
                table: "preassign",
                row: 2,
                column: 1,
                value: 7,
                allowed: "-2..=1",
            })
        );
    }

    #[test]
    fn a_missing_table_row_is_rejected() {
        let mut tables = DatasetTables::new(6, 2, 3, 4, 2, 2);
        let _ = tables.worker_shift.pop();

        assert_eq!(
            tables.validate(),
            Err(TableError::WrongRowCount {
                table: "worker_shift",
                found: 3,
                expected: 4,
            })
        );
    }
}
