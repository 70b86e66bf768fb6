use foreman_lib::dataset::TableError;
use foreman_lib::formulation::FormulationError;
use thiserror::Error;

use crate::instance::InstanceParseError;

pub(crate) type ForemanResult<T> = Result<T, ForemanError>;

#[derive(Debug, Error)]
pub(crate) enum ForemanError {
    #[error("failed to read instance file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] InstanceParseError),
    #[error("invalid instance table: {0}")]
    Table(#[from] TableError),
    #[error(transparent)]
    Formulation(#[from] FormulationError),
}
