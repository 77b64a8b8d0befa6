use std::fmt::Display;

use courier_sat::context::ContextError;
use courier_sat::routing::InstanceError;
use thiserror::Error;

use crate::instance_reader::InstanceParseError;

pub(crate) type CourierResult<T> = Result<T, CourierError>;

#[derive(Error, Debug)]
pub(crate) enum CourierError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("The file {0} is not supported.")]
    InvalidInstanceFile(String),
    #[error("The instance file could not be parsed, more details: {0}")]
    InvalidInstance(#[from] InstanceParseError),
    #[error("The instance is inconsistent, more details: {0}")]
    InconsistentInstance(#[from] InstanceError),
    #[error("The solver context was misused, more details: {0}")]
    Context(#[from] ContextError),
}

impl CourierError {
    pub(crate) fn invalid_instance(path: impl Display) -> Self {
        Self::InvalidInstanceFile(format!("{path}"))
    }
}
