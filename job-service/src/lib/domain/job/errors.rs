use thiserror::Error;

use crate::domain::authorization::DenyReason;
use crate::domain::job::models::JobStatus;

/// Error for JobId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Field-level validation failures for job postings and queries.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum JobValidationError {
    #[error("{field} must not be empty")]
    Blank { field: &'static str },

    #[error("{field} too long: maximum {max} characters, got {actual}")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("Salary must not be negative")]
    NegativeSalary,

    #[error("Minimum salary {min} exceeds maximum salary {max}")]
    InvertedSalaryRange { min: f64, max: f64 },

    #[error("Unknown job type: {0}")]
    UnknownJobType(String),

    #[error("Unknown employment type: {0}")]
    UnknownEmploymentType(String),

    #[error("Unknown job status: {0}")]
    UnknownStatus(String),

    #[error("Invalid contact email: {0}")]
    InvalidContactEmail(String),
}

/// Top-level error for all job-related operations
#[derive(Debug, Clone, Error)]
pub enum JobError {
    #[error("Invalid job ID: {0}")]
    InvalidJobId(#[from] JobIdError),

    #[error("Invalid job: {0}")]
    Validation(#[from] JobValidationError),

    #[error("Job status cannot change from {from} to {to}")]
    InvalidStatusTransition { from: JobStatus, to: JobStatus },

    #[error("{0}")]
    Denied(#[from] DenyReason),

    #[error("Job not found: {0}")]
    NotFound(String),

    #[error("Job {0} kept changing during the update")]
    Conflict(String),

    // Infrastructure errors
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}
