use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::CiProvider;
use super::error::ProviderError;
use super::types::{JobDetail, Workflow, WorkflowJob, WorkflowJobsPage};
use crate::params::ProjectRef;

pub const DEFAULT_BASE_URL: &str = "https://circleci.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Basic-auth client for the CircleCI v2 and v1.1 REST APIs.
pub struct CircleClient {
    token: String,
    client: Client,
    v1_url: String,
    v2_url: String,
}

impl CircleClient {
    /// Create a client pointing at a custom host (CircleCI server installs, tests).
    pub fn with_base_url(
        token: String,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let base = base_url.trim_end_matches('/');
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ProviderError::Transport {
                url: base.to_string(),
                source,
            })?;
        Ok(Self {
            token,
            client,
            v1_url: format!("{base}/api/v1.1"),
            v2_url: format!("{base}/api/v2"),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, ProviderError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.token, None::<&str>)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProviderError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| ProviderError::Decode {
            url: url.clone(),
            message: e.to_string(),
        })?;
        serde_json::from_slice(&body).map_err(|e| ProviderError::Decode {
            url,
            message: e.to_string(),
        })
    }
}

impl CiProvider for CircleClient {
    async fn workflow(&self, workflow_id: &str) -> Result<Workflow, ProviderError> {
        self.get_json(format!("{}/workflow/{workflow_id}", self.v2_url))
            .await
    }

    async fn workflow_jobs(&self, workflow_id: &str) -> Result<Vec<WorkflowJob>, ProviderError> {
        let page: WorkflowJobsPage = self
            .get_json(format!("{}/workflow/{workflow_id}/jobs", self.v2_url))
            .await?;
        if page.next_page_token.as_deref().is_some_and(|t| !t.is_empty()) {
            warn!(
                workflow_id,
                "workflow has more than one page of jobs; only the first page is estimated"
            );
        }
        Ok(page.items)
    }

    async fn job_detail(
        &self,
        project: &ProjectRef,
        job_number: u64,
    ) -> Result<JobDetail, ProviderError> {
        self.get_json(format!(
            "{}/project/{}/{}/{}/{job_number}",
            self.v1_url,
            project.vcs.as_str(),
            project.owner,
            project.name
        ))
        .await
    }
}
