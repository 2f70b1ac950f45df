use std::collections::TryReserveError;
use std::error;
use std::fmt;
use std::result;

/// Errors surfaced by operations that allocate tree nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The node arena could not reserve memory for another chunk of nodes.
    AllocationFailed(TryReserveError),
}

impl From<TryReserveError> for Error {
    fn from(err: TryReserveError) -> Error {
        Error::AllocationFailed(err)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::AllocationFailed(error) => Some(error),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::AllocationFailed(error) => write!(f, "failed to allocate tree node: {}", error),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
