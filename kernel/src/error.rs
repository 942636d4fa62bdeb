use std::fmt::Display;

use error_stack::Context;

#[derive(Debug)]
pub enum KernelError {
    Unauthenticated,
    InvalidRequest,
    NotFound,
    InvalidState,
    Concurrency,
    Timeout,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::Unauthenticated => write!(f, "Authentication required"),
            KernelError::InvalidRequest => write!(f, "Invalid request"),
            KernelError::NotFound => write!(f, "Resource not found"),
            KernelError::InvalidState => write!(f, "Operation not allowed in current state"),
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}
