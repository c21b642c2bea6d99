use thiserror::Error;

use crate::provider::ProviderError;

/// Everything that can stop an estimate from being produced.
///
/// Each variant maps to an [`ErrorKind`] and an HTTP status code so the
/// request layer can relay it without inspecting the message.
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("{0}")]
    InvalidParams(String),

    #[error("Workflow status is {status}. Status must be 'success' or 'failed' to estimate cost")]
    NotTerminal { status: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(
        "No pricing for executor '{executor}' (job '{job}'). The pricing table is out of date, please contact the maintainer"
    )]
    MissingExecutor { executor: String, job: String },

    #[error("No cost for resource class '{resource_class}' on executor '{executor}' (job '{job}')")]
    MissingResourceClass {
        executor: String,
        resource_class: String,
        job: String,
    },

    #[error("{failed} of {total} jobs could not be costed: {}", details.join("; "))]
    JobsFailed {
        failed: usize,
        total: usize,
        details: Vec<String>,
    },
}

impl EstimateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EstimateError::InvalidParams(_) => ErrorKind::InvalidInput,
            EstimateError::NotTerminal { .. } => ErrorKind::NotReady,
            EstimateError::Provider(_) => ErrorKind::Upstream,
            EstimateError::MissingExecutor { .. } | EstimateError::MissingResourceClass { .. } => {
                ErrorKind::PricingGap
            }
            EstimateError::JobsFailed { .. } => ErrorKind::Incomplete,
        }
    }

    /// HTTP-equivalent status for relaying this error to a caller.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::InvalidInput => 400,
            ErrorKind::NotReady => 202,
            ErrorKind::Upstream | ErrorKind::PricingGap | ErrorKind::Incomplete => 500,
        }
    }
}

/// Coarse classification of an [`EstimateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Missing or malformed request parameters.
    InvalidInput,
    /// The workflow has not finished yet; try again later.
    NotReady,
    /// Transport, status or payload failure from the CI provider.
    Upstream,
    /// The pricing table has no entry for an executor or resource class.
    PricingGap,
    /// At least one job in the workflow could not be costed.
    Incomplete,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidInput => write!(f, "InvalidInput"),
            ErrorKind::NotReady => write!(f, "NotReady"),
            ErrorKind::Upstream => write!(f, "Upstream"),
            ErrorKind::PricingGap => write!(f, "PricingGap"),
            ErrorKind::Incomplete => write!(f, "Incomplete"),
        }
    }
}
