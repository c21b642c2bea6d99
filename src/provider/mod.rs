pub mod client;
pub mod error;
pub mod types;

use std::future::Future;

pub use client::{CircleClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::ProviderError;
pub use types::{JobDetail, Step, Workflow, WorkflowJob};

use crate::params::ProjectRef;

/// Read access to a CI provider's workflow and job data.
///
/// The estimator only depends on this trait, so tests can substitute canned
/// responses for the network.
pub trait CiProvider: Send + Sync {
    fn workflow(
        &self,
        workflow_id: &str,
    ) -> impl Future<Output = Result<Workflow, ProviderError>> + Send;

    /// First page of jobs belonging to the workflow.
    fn workflow_jobs(
        &self,
        workflow_id: &str,
    ) -> impl Future<Output = Result<Vec<WorkflowJob>, ProviderError>> + Send;

    fn job_detail(
        &self,
        project: &ProjectRef,
        job_number: u64,
    ) -> impl Future<Output = Result<JobDetail, ProviderError>> + Send;
}
