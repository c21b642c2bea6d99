use std::time::Duration;

use super::pricing::PricingTable;
use super::runtime::{billable_runtime, runtime_minutes};
use crate::error::EstimateError;
use crate::params::ProjectRef;
use crate::provider::CiProvider;

/// Credits billed for a single job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobCost {
    pub job_name: String,
    pub job_number: u64,
    pub runtime: Duration,
    pub credits: f64,
}

/// Fetch one job's detail and price it.
///
/// Provider failures are returned unchanged; pricing gaps carry the job name.
pub async fn job_cost<P: CiProvider>(
    provider: &P,
    pricing: &PricingTable,
    project: &ProjectRef,
    job_name: &str,
    job_number: u64,
) -> Result<JobCost, EstimateError> {
    let detail = provider.job_detail(project, job_number).await?;
    let rate = pricing.credits_per_minute(detail.executor(), detail.resource_class(), job_name)?;
    let runtime = billable_runtime(&detail.steps);

    Ok(JobCost {
        job_name: job_name.to_string(),
        job_number,
        runtime,
        credits: runtime_minutes(runtime) * rate,
    })
}
