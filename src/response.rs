//! JSON bodies returned to callers, shared by the CLI and the HTTP trigger.

use serde::{Deserialize, Serialize};

use crate::error::EstimateError;
use crate::estimate::{CostEstimate, JobCost, format_runtime, round_cents, to_currency};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateBody {
    pub total_credits: f64,
    pub total_cost: f64,
    pub total_runtime: String,
    pub disclaimer: String,
    pub jobs: Vec<JobBody>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobBody {
    pub job_name: String,
    pub job_number: u64,
    pub total_credits: f64,
    pub total_cost: f64,
    pub total_runtime: String,
}

impl EstimateBody {
    pub fn new(estimate: &CostEstimate, credit_price: f64, disclaimer: &str) -> Self {
        let jobs = estimate
            .jobs
            .iter()
            .map(|job| JobBody::new(job, credit_price))
            .collect();
        Self {
            total_credits: estimate.total_credits,
            total_cost: estimate.total_cost,
            total_runtime: format_runtime(estimate.total_runtime),
            disclaimer: disclaimer.to_string(),
            jobs,
        }
    }
}

impl JobBody {
    /// Per-job figures are informational; only the totals are rounded up to whole credits.
    pub fn new(job: &JobCost, credit_price: f64) -> Self {
        Self {
            job_name: job.job_name.clone(),
            job_number: job.job_number,
            total_credits: round_cents(job.credits),
            total_cost: to_currency(job.credits, credit_price),
            total_runtime: format_runtime(job.runtime),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl From<&EstimateError> for ErrorBody {
    fn from(err: &EstimateError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::estimate::DEFAULT_CREDIT_PRICE;

    #[test]
    fn estimate_body_shape() {
        let estimate = CostEstimate {
            total_credits: 94.0,
            total_cost: 0.06,
            total_runtime: Duration::from_secs(140),
            jobs: vec![JobCost {
                job_name: "build".into(),
                job_number: 7,
                runtime: Duration::from_secs(140),
                credits: 140.0 / 60.0 * 40.0,
            }],
        };
        let body = EstimateBody::new(&estimate, DEFAULT_CREDIT_PRICE, "estimate only");
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["total_credits"], 94.0);
        assert_eq!(json["total_cost"], 0.06);
        assert_eq!(json["total_runtime"], "2m20s");
        assert_eq!(json["disclaimer"], "estimate only");
        assert_eq!(json["jobs"][0]["job_name"], "build");
        assert_eq!(json["jobs"][0]["total_credits"], 93.33);
        assert_eq!(json["jobs"][0]["total_cost"], 0.06);
    }

    #[test]
    fn error_body_carries_message() {
        let err = EstimateError::NotTerminal {
            status: "on_hold".into(),
        };
        let body = ErrorBody::from(&err);
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"message":"Workflow status is on_hold. Status must be 'success' or 'failed' to estimate cost"}"#
        );
    }
}
