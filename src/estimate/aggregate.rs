use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::currency::to_currency;
use super::job_cost::{JobCost, job_cost};
use super::pricing::PricingTable;
use crate::error::EstimateError;
use crate::params::ProjectRef;
use crate::provider::{CiProvider, WorkflowJob};

/// The priced workflow. `total_credits` is always a whole number.
#[derive(Debug, Clone, PartialEq)]
pub struct CostEstimate {
    pub total_credits: f64,
    pub total_cost: f64,
    pub total_runtime: Duration,
    /// One entry per billed job, ordered by job number.
    pub jobs: Vec<JobCost>,
}

impl CostEstimate {
    fn empty() -> Self {
        Self {
            total_credits: 0.0,
            total_cost: 0.0,
            total_runtime: Duration::ZERO,
            jobs: Vec::new(),
        }
    }
}

/// Price every job of a workflow concurrently and sum the results.
///
/// One task is spawned per job. Each task sends exactly one outcome on the
/// channel; this function is the only reader and waits for every task before
/// deciding. A single failed job fails the whole estimate.
pub async fn tally<P>(
    provider: Arc<P>,
    pricing: Arc<PricingTable>,
    project: &ProjectRef,
    jobs: &[WorkflowJob],
    credit_price: f64,
) -> Result<CostEstimate, EstimateError>
where
    P: CiProvider + 'static,
{
    let billable: Vec<(String, u64)> = jobs
        .iter()
        .filter_map(|job| match job.job_number {
            Some(number) => Some((job.name.clone(), number)),
            None => {
                debug!(job = %job.name, job_type = %job.job_type, "skipping job without a job number");
                None
            }
        })
        .collect();

    let total = billable.len();
    if total == 0 {
        return Ok(CostEstimate::empty());
    }

    let (tx, mut rx) = mpsc::channel(total);
    for (name, number) in billable {
        let tx = tx.clone();
        let provider = Arc::clone(&provider);
        let pricing = Arc::clone(&pricing);
        let project = project.clone();
        tokio::spawn(async move {
            let outcome = job_cost(&*provider, &pricing, &project, &name, number).await;
            // The receiver outlives every sender, so this cannot fail.
            let _ = tx.send((name, number, outcome)).await;
        });
    }
    drop(tx);
    info!(jobs = total, "dispatched job cost lookups");

    let mut costs = Vec::with_capacity(total);
    let mut failures = Vec::new();
    let mut reported = 0;
    while let Some((name, number, outcome)) = rx.recv().await {
        reported += 1;
        match outcome {
            Ok(cost) => costs.push(cost),
            Err(e) => {
                warn!(job = %name, job_number = number, error = %e, "job could not be costed");
                failures.push(format!("{name} (#{number}): {e}"));
            }
        }
    }

    // A task that panicked drops its sender without reporting.
    if reported < total {
        failures.push(format!("{} job(s) did not report a result", total - reported));
    }

    if !failures.is_empty() {
        return Err(EstimateError::JobsFailed {
            failed: total - costs.len(),
            total,
            details: failures,
        });
    }

    costs.sort_by_key(|c| c.job_number);
    let exact: f64 = costs.iter().map(|c| c.credits).sum();
    let total_credits = exact.ceil();
    let estimate = CostEstimate {
        total_credits,
        total_cost: to_currency(total_credits, credit_price),
        total_runtime: costs.iter().map(|c| c.runtime).sum(),
        jobs: costs,
    };
    info!(
        credits = estimate.total_credits,
        cost = estimate.total_cost,
        "workflow estimate complete"
    );
    Ok(estimate)
}
