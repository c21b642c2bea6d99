//! Cost estimation pipeline.
//!
//! [`Estimator::estimate`] runs the whole request lifecycle against a
//! [`CiProvider`]: check that the workflow has finished, list its jobs, then
//! hand them to [`tally`], which prices every job concurrently.

mod aggregate;
mod currency;
mod job_cost;
mod pricing;
mod runtime;

use std::sync::Arc;

use tracing::info;

pub use aggregate::CostEstimate;
pub use currency::{DEFAULT_CREDIT_PRICE, round_cents, to_currency};
pub use job_cost::JobCost;
pub use pricing::PricingTable;
pub use runtime::format_runtime;

use aggregate::tally;
use crate::error::EstimateError;
use crate::params::ProjectRef;
use crate::provider::CiProvider;

/// Estimates workflows using one provider connection and one pricing table.
pub struct Estimator<P> {
    provider: Arc<P>,
    pricing: Arc<PricingTable>,
    credit_price: f64,
}

impl<P: CiProvider + 'static> Estimator<P> {
    pub fn new(provider: P, pricing: Arc<PricingTable>, credit_price: f64) -> Self {
        Self {
            provider: Arc::new(provider),
            pricing,
            credit_price,
        }
    }

    pub async fn estimate(
        &self,
        workflow_id: &str,
        project: &ProjectRef,
    ) -> Result<CostEstimate, EstimateError> {
        let workflow = self.provider.workflow(workflow_id).await?;
        if !workflow.is_terminal() {
            info!(workflow_id, status = %workflow.status, "workflow has not finished");
            return Err(EstimateError::NotTerminal {
                status: workflow.status,
            });
        }
        info!(workflow_id, status = %workflow.status, "estimating workflow");

        let jobs = self.provider.workflow_jobs(workflow_id).await?;
        tally(
            Arc::clone(&self.provider),
            Arc::clone(&self.pricing),
            project,
            &jobs,
            self.credit_price,
        )
        .await
    }
}
