//! Payloads returned by the CircleCI REST API.
//!
//! Only the fields the estimator reads are modelled; everything else in the
//! provider's responses is ignored by serde. Fields that CircleCI reports as
//! `null` for jobs that never ran are `Option` or defaulted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET /api/v2/workflow/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// "success", "failed", "running", "on_hold", ...
    pub status: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stopped_at: Option<DateTime<Utc>>,
}

impl Workflow {
    /// Only finished workflows have a stable runtime worth estimating.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "success" | "failed")
    }
}

/// One entry of `GET /api/v2/workflow/{id}/jobs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowJob {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub status: String,
    /// "build" or "approval". Serialized as "type" in the API.
    #[serde(rename = "type", default)]
    pub job_type: String,
    /// Absent for approval jobs, which never run on an executor.
    #[serde(default)]
    pub job_number: Option<u64>,
    #[serde(default, alias = "start_time")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "stop_time")]
    pub stopped_at: Option<DateTime<Utc>>,
}

/// Envelope around the workflow job list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowJobsPage {
    /// Older payloads name this field `jobs`.
    #[serde(alias = "jobs")]
    pub items: Vec<WorkflowJob>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// `GET /api/v1.1/project/{vcs}/{owner}/{name}/{job_number}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDetail {
    #[serde(default)]
    pub steps: Vec<Step>,
    pub picard: Picard,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub build_time_millis: Option<u64>,
    #[serde(default)]
    pub workflows: Option<JobWorkflow>,
}

impl JobDetail {
    pub fn executor(&self) -> &str {
        &self.picard.executor
    }

    pub fn resource_class(&self) -> &str {
        &self.picard.resource_class.class
    }
}

/// Executor metadata for a job. CircleCI calls its scheduler "picard".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Picard {
    pub executor: String,
    pub resource_class: ResourceClass,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceClass {
    pub class: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobWorkflow {
    #[serde(default)]
    pub job_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub background: bool,
    /// `null` for actions that never started.
    #[serde(default)]
    pub run_time_millis: Option<u64>,
}
