//! The outcomes a solve can produce and the variable assignment attached to the conclusive ones.

use crate::containers::KeyedVec;
use crate::model::BoolVar;
use crate::model::IntVar;
use crate::model::VariableId;

/// A full assignment of every decision variable of a solved model.
#[derive(Clone, Debug)]
pub struct Solution {
    values: KeyedVec<VariableId, i32>,
}

impl Solution {
    pub(crate) fn new(values: KeyedVec<VariableId, i32>) -> Solution {
        Solution { values }
    }

    /// The value of the given boolean.
    ///
    /// Panics when the variable does not belong to the solved model.
    pub fn get_boolean_value(&self, variable: BoolVar) -> bool {
        self.values[variable.id] != 0
    }

    /// The value of the given integer.
    ///
    /// Panics when the variable does not belong to the solved model.
    pub fn get_integer_value(&self, variable: IntVar) -> i32 {
        self.values[variable.id]
    }

    pub fn number_of_variables(&self) -> usize {
        self.values.len()
    }
}

/// The conclusion of a [`Solver::solve`](crate::engine::Solver::solve) call.
#[derive(Debug)]
pub enum SolveResult {
    /// A solution which is proved to minimise (or maximise) the objective.
    Optimal(Solution),
    /// The best solution found before the budget ran out; a better one may exist.
    Feasible(Solution),
    /// No assignment satisfies the constraints.
    Infeasible,
    /// The budget ran out before any solution was found. Unlike [`SolveResult::Infeasible`] this
    /// makes no claim that none exists.
    Timeout,
    /// The search stopped for another reason before reaching a conclusion.
    Unknown,
}

impl SolveResult {
    /// The solution carried by this result, if it has one.
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolveResult::Optimal(solution) | SolveResult::Feasible(solution) => Some(solution),
            SolveResult::Infeasible | SolveResult::Timeout | SolveResult::Unknown => None,
        }
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveResult::Optimal(_))
    }
}
