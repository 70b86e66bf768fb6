use log::warn;

use super::Constraint;
use crate::model::BoolVar;
use crate::model::ConstraintOperationError;
use crate::model::Model;

/// A staged constraint waiting to be added to a [`Model`].
///
/// Created through [`Model::add_constraint`]; dropping the poster without calling either
/// [`ConstraintPoster::post`] or [`ConstraintPoster::implied_by`] discards the constraint and
/// logs a warning.
#[derive(Debug)]
pub struct ConstraintPoster<'model, ConstraintImpl> {
    model: &'model mut Model,
    constraint: Option<ConstraintImpl>,
}

impl<'model, ConstraintImpl> ConstraintPoster<'model, ConstraintImpl> {
    pub(crate) fn new(model: &'model mut Model, constraint: ConstraintImpl) -> Self {
        ConstraintPoster {
            model,
            constraint: Some(constraint),
        }
    }
}

impl<ConstraintImpl: Constraint> ConstraintPoster<'_, ConstraintImpl> {
    /// Add the constraint to the model so it holds in every solution.
    pub fn post(mut self) -> Result<(), ConstraintOperationError> {
        self.constraint
            .take()
            .expect("the constraint is consumed at most once")
            .post(self.model)
    }

    /// Add the constraint to the model so it is enforced only in solutions where all `conditions`
    /// are true.
    pub fn implied_by(
        mut self,
        conditions: impl IntoIterator<Item = BoolVar>,
    ) -> Result<(), ConstraintOperationError> {
        self.constraint
            .take()
            .expect("the constraint is consumed at most once")
            .implied_by(self.model, conditions.into_iter().collect())
    }
}

impl<ConstraintImpl> Drop for ConstraintPoster<'_, ConstraintImpl> {
    fn drop(&mut self) {
        if self.constraint.is_some() {
            warn!("A constraint poster is never used, this is likely a mistake.");
        }
    }
}
