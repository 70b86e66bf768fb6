//! The model layer: a registry of decision variables, the constraints posted over them, and the
//! optimisation directive. A [`Model`] is pure data; solving it is the job of the
//! [`engine`](crate::engine) module, and any backend implementing
//! [`SearchBackend`](crate::engine::SearchBackend) can consume it.

mod variables;

use thiserror::Error;

pub use variables::BoolVar;
pub use variables::IntVar;
pub use variables::LinearTerm;
pub(crate) use variables::VariableId;
pub(crate) use variables::VariableInfo;

use crate::constraints::Constraint;
use crate::constraints::ConstraintPoster;
use crate::constraints::ConstraintRepr;
use crate::constraints::PostedConstraint;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// The direction of the optimisation, either maximising or minimising.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimisationDirection {
    Maximise,
    Minimise,
}

/// Errors raised while operating on a [`Model`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConstraintOperationError {
    /// A root-level fix contradicts an earlier fix of the same variable.
    #[error("fixing `{name}` to {value} contradicts an earlier fix")]
    InconsistentFix { name: String, value: bool },
    /// An unconditional exactly-one constraint over no literals can never hold.
    #[error("an exactly-one constraint requires at least one literal")]
    EmptyExactlyOne,
}

/// A constraint model: variables, constraints and an optional objective.
#[derive(Debug, Default)]
pub struct Model {
    variables: KeyedVec<VariableId, VariableInfo>,
    constraints: Vec<PostedConstraint>,
    objective: Option<(OptimisationDirection, IntVar)>,
}

impl Model {
    /// Create a new boolean decision variable.
    pub fn new_boolean(&mut self) -> BoolVar {
        self.create_boolean(None)
    }

    /// Create a new boolean decision variable with a debug name.
    pub fn new_named_boolean(&mut self, name: impl Into<String>) -> BoolVar {
        self.create_boolean(Some(name.into()))
    }

    /// Create a new integer decision variable with the given inclusive bounds.
    ///
    /// Panics if `lower_bound > upper_bound`.
    pub fn new_bounded_integer(&mut self, lower_bound: i32, upper_bound: i32) -> IntVar {
        self.create_integer(lower_bound, upper_bound, None)
    }

    /// Create a new integer decision variable with the given inclusive bounds and a debug name.
    pub fn new_named_bounded_integer(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: impl Into<String>,
    ) -> IntVar {
        self.create_integer(lower_bound, upper_bound, Some(name.into()))
    }

    fn create_boolean(&mut self, name: Option<String>) -> BoolVar {
        let id = self.variables.push(VariableInfo {
            lower_bound: 0,
            upper_bound: 1,
            is_boolean: true,
            hint: None,
            name,
        });

        BoolVar { id }
    }

    fn create_integer(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: Option<String>,
    ) -> IntVar {
        assert!(
            lower_bound <= upper_bound,
            "integer variable bounds [{lower_bound}, {upper_bound}] are empty"
        );

        let id = self.variables.push(VariableInfo {
            lower_bound,
            upper_bound,
            is_boolean: false,
            hint: None,
            name,
        });

        IntVar { id }
    }

    /// Stage a constraint for posting; the returned poster decides whether it holds
    /// unconditionally ([`ConstraintPoster::post`]) or only under conditions
    /// ([`ConstraintPoster::implied_by`]).
    pub fn add_constraint<C: Constraint>(&mut self, constraint: C) -> ConstraintPoster<'_, C> {
        ConstraintPoster::new(self, constraint)
    }

    /// Fix a boolean at the root of the search. Fixing the same variable to two different values
    /// is an error.
    pub fn fix_boolean(
        &mut self,
        variable: BoolVar,
        value: bool,
    ) -> Result<(), ConstraintOperationError> {
        let target = i32::from(value);
        let info = &mut self.variables[variable.id];

        if target < info.lower_bound || target > info.upper_bound {
            return Err(ConstraintOperationError::InconsistentFix {
                name: display_name(variable.id, info),
                value,
            });
        }

        info.lower_bound = target;
        info.upper_bound = target;
        Ok(())
    }

    /// Suggest a value for the variable to the search. Hints only steer value selection; they
    /// never exclude assignments.
    pub fn add_hint(&mut self, variable: BoolVar, value: bool) {
        self.variables[variable.id].hint = Some(i32::from(value));
    }

    /// Direct the solver to minimise the given variable.
    pub fn minimise(&mut self, objective: IntVar) {
        self.objective = Some((OptimisationDirection::Minimise, objective));
    }

    /// Direct the solver to maximise the given variable.
    pub fn maximise(&mut self, objective: IntVar) {
        self.objective = Some((OptimisationDirection::Maximise, objective));
    }

    /// The optimisation directive, if one has been set.
    pub fn objective(&self) -> Option<(OptimisationDirection, IntVar)> {
        self.objective
    }

    /// The current lower bound of an integer variable.
    pub fn lower_bound(&self, variable: IntVar) -> i32 {
        self.variables[variable.id].lower_bound
    }

    /// The current upper bound of an integer variable.
    pub fn upper_bound(&self, variable: IntVar) -> i32 {
        self.variables[variable.id].upper_bound
    }

    /// The value of a boolean that is fixed at the root, or `None` if it is still free.
    pub fn fixed_boolean(&self, variable: BoolVar) -> Option<bool> {
        let info = &self.variables[variable.id];

        (info.lower_bound == info.upper_bound).then(|| info.lower_bound != 0)
    }

    pub fn number_of_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn number_of_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub(crate) fn push_constraint(
        &mut self,
        repr: ConstraintRepr,
        enforced_by: Vec<BoolVar>,
    ) -> Result<(), ConstraintOperationError> {
        if matches!(&repr, ConstraintRepr::ExactlyOne { literals } if literals.is_empty())
            && enforced_by.is_empty()
        {
            return Err(ConstraintOperationError::EmptyExactlyOne);
        }

        self.constraints.push(PostedConstraint { repr, enforced_by });
        Ok(())
    }

    pub(crate) fn variable_infos(&self) -> &KeyedVec<VariableId, VariableInfo> {
        &self.variables
    }

    pub(crate) fn posted_constraints(&self) -> &[PostedConstraint] {
        &self.constraints
    }
}

fn display_name(id: VariableId, info: &VariableInfo) -> String {
    info.name
        .clone()
        .unwrap_or_else(|| format!("x{}", id.index()))
}
