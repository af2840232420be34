//! Crate-wide error type.
//!
//! Per the error-handling design: geometric routines never fail, they
//! return sentinel NaN/empty results. The only place a [`PlannerError`]
//! is raised is at shape/body construction and request validation time.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
