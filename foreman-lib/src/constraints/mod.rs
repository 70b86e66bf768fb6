//! Defines the constraints which can be posted to a [`Model`].
//!
//! A constraint is a relation over decision variables. Constraints are created through the free
//! functions in this module (for example [`exactly_one`] or [`equals`]) and handed to
//! [`Model::add_constraint`], which returns a [`ConstraintPoster`]. The poster either posts the
//! constraint so it holds unconditionally, or attaches it to a set of enforcement booleans so it
//! only holds when all of them are true.

mod constraint_poster;

pub use constraint_poster::ConstraintPoster;

use crate::model::BoolVar;
use crate::model::ConstraintOperationError;
use crate::model::IntVar;
use crate::model::LinearTerm;
use crate::model::Model;

/// A value which can be posted to a [`Model`].
pub trait Constraint {
    /// Add the constraint to the model so it holds in every solution.
    fn post(self, model: &mut Model) -> Result<(), ConstraintOperationError>;

    /// Add the constraint to the model so it holds in every solution where all `conditions` are
    /// true. When any condition is false the constraint imposes nothing.
    fn implied_by(
        self,
        model: &mut Model,
        conditions: Vec<BoolVar>,
    ) -> Result<(), ConstraintOperationError>;
}

/// The normalised form in which constraints are stored and which backends interpret.
#[derive(Clone, Debug)]
pub(crate) enum ConstraintRepr {
    /// `Σ weight_i * variable_i <= rhs`
    LinearLessEqual { terms: Vec<LinearTerm>, rhs: i32 },
    /// `Σ weight_i * variable_i == rhs`
    LinearEqual { terms: Vec<LinearTerm>, rhs: i32 },
    /// Exactly one of the literals is true.
    ExactlyOne { literals: Vec<BoolVar> },
    /// At most one of the literals is true.
    AtMostOne { literals: Vec<BoolVar> },
    /// `absolute == |signed|`
    AbsoluteValue { signed: IntVar, absolute: IntVar },
}

/// A [`ConstraintRepr`] together with the booleans that enforce it; an empty set of enforcement
/// booleans means the constraint holds unconditionally.
#[derive(Clone, Debug)]
pub(crate) struct PostedConstraint {
    pub(crate) repr: ConstraintRepr,
    pub(crate) enforced_by: Vec<BoolVar>,
}

#[derive(Debug)]
struct Elementary {
    repr: ConstraintRepr,
}

impl Constraint for Elementary {
    fn post(self, model: &mut Model) -> Result<(), ConstraintOperationError> {
        model.push_constraint(self.repr, vec![])
    }

    fn implied_by(
        self,
        model: &mut Model,
        conditions: Vec<BoolVar>,
    ) -> Result<(), ConstraintOperationError> {
        model.push_constraint(self.repr, conditions)
    }
}

/// Create the constraint that exactly one of the literals is true.
pub fn exactly_one(literals: impl IntoIterator<Item = BoolVar>) -> impl Constraint {
    Elementary {
        repr: ConstraintRepr::ExactlyOne {
            literals: literals.into_iter().collect(),
        },
    }
}

/// Create the constraint that at most one of the literals is true.
pub fn at_most_one(literals: impl IntoIterator<Item = BoolVar>) -> impl Constraint {
    Elementary {
        repr: ConstraintRepr::AtMostOne {
            literals: literals.into_iter().collect(),
        },
    }
}

/// Create the constraint `Σ terms == rhs`.
pub fn equals(terms: impl IntoIterator<Item = LinearTerm>, rhs: i32) -> impl Constraint {
    Elementary {
        repr: ConstraintRepr::LinearEqual {
            terms: terms.into_iter().collect(),
            rhs,
        },
    }
}

/// Create the constraint `Σ terms <= rhs`.
pub fn less_than_or_equals(
    terms: impl IntoIterator<Item = LinearTerm>,
    rhs: i32,
) -> impl Constraint {
    Elementary {
        repr: ConstraintRepr::LinearLessEqual {
            terms: terms.into_iter().collect(),
            rhs,
        },
    }
}

/// Create the constraint `Σ terms >= rhs`, stored as `Σ -terms <= -rhs`.
pub fn greater_than_or_equals(
    terms: impl IntoIterator<Item = LinearTerm>,
    rhs: i32,
) -> impl Constraint {
    let negated = terms
        .into_iter()
        .map(|term| LinearTerm {
            variable: term.variable,
            weight: -term.weight,
        })
        .collect();

    Elementary {
        repr: ConstraintRepr::LinearLessEqual {
            terms: negated,
            rhs: -rhs,
        },
    }
}

/// Create the constraint `absolute == |signed|`.
pub fn absolute(signed: IntVar, absolute: IntVar) -> impl Constraint {
    Elementary {
        repr: ConstraintRepr::AbsoluteValue { signed, absolute },
    }
}
