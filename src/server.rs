//! HTTP trigger: `GET /estimate?circle_token=...&workflow_id=...`.
//!
//! Every request builds its own provider client (the token and host come from
//! the query) and shares the pricing table loaded at startup.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::EstimatorConfig;
use crate::error::EstimateError;
use crate::estimate::{CostEstimate, Estimator, PricingTable};
use crate::params::EstimateParams;
use crate::provider::CircleClient;
use crate::response::{ErrorBody, EstimateBody};

pub struct AppState {
    pub config: EstimatorConfig,
    pub pricing: Arc<PricingTable>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/estimate", get(estimate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn estimate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    match run_estimate(&state, &query).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => error_response(&err),
    }
}

pub async fn run_estimate(
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<EstimateBody, EstimateError> {
    let params = EstimateParams::from_query(query)?;
    let estimate = estimate_workflow(&state.config, Arc::clone(&state.pricing), &params).await?;
    Ok(EstimateBody::new(
        &estimate,
        state.config.credit_price,
        &state.config.disclaimer,
    ))
}

/// Build a provider client for `params` and run one estimate with it.
pub async fn estimate_workflow(
    config: &EstimatorConfig,
    pricing: Arc<PricingTable>,
    params: &EstimateParams,
) -> Result<CostEstimate, EstimateError> {
    let base_url = params.base_url.as_deref().unwrap_or(&config.base_url);
    let client =
        CircleClient::with_base_url(params.token.clone(), base_url, config.request_timeout())?;
    Estimator::new(client, pricing, config.credit_price)
        .estimate(&params.workflow_id, &params.project)
        .await
}

fn error_response(err: &EstimateError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorBody::from(err))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn state() -> Arc<AppState> {
        let config = EstimatorConfig::default();
        let pricing = Arc::new(config.pricing_table());
        Arc::new(AppState { config, pricing })
    }

    fn query(server: &MockServer, workflow: &str) -> HashMap<String, String> {
        [
            ("circle_token", "tok"),
            ("workflow_id", workflow),
            ("project_name", "widgets"),
            ("project_user", "acme"),
            ("project_vcs", "gh"),
            ("circle_url", server.uri().as_str()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    async fn mount_json(server: &MockServer, route: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
            .mount(server)
            .await;
    }

    async fn into_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn estimates_finished_workflow_end_to_end() {
        let server = MockServer::start().await;
        mount_json(&server, "/api/v2/workflow/wf-1", r#"{"id": "wf-1", "status": "success"}"#)
            .await;
        mount_json(
            &server,
            "/api/v2/workflow/wf-1/jobs",
            r#"{"next_page_token": null, "items": [
                {"name": "build", "type": "build", "job_number": 10},
                {"name": "test", "type": "build", "job_number": 11},
                {"name": "hold", "type": "approval"}
            ]}"#,
        )
        .await;
        mount_json(
            &server,
            "/api/v1.1/project/github/acme/widgets/10",
            r#"{"picard": {"executor": "docker", "resource_class": {"class": "xlarge"}},
                "steps": [{"name": "run", "actions": [
                    {"background": false, "run_time_millis": 140000},
                    {"background": true, "run_time_millis": 999999}
                ]}]}"#,
        )
        .await;
        mount_json(
            &server,
            "/api/v1.1/project/github/acme/widgets/11",
            r#"{"picard": {"executor": "machine", "resource_class": {"class": "medium"}},
                "steps": [{"name": "run", "actions": [
                    {"background": false, "run_time_millis": 30000}
                ]}]}"#,
        )
        .await;

        let response = estimate(State(state()), Query(query(&server, "wf-1"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = into_json(response).await;

        // 93.33 + 5.0 -> 99 credits
        assert_eq!(body["total_credits"], 99.0);
        assert_eq!(body["total_cost"], 0.06);
        assert_eq!(body["total_runtime"], "2m50s");
        assert_eq!(body["jobs"].as_array().unwrap().len(), 2);
        assert!(body["disclaimer"].as_str().unwrap().contains("ESTIMATE"));
    }

    #[tokio::test]
    async fn running_workflow_returns_202() {
        let server = MockServer::start().await;
        mount_json(&server, "/api/v2/workflow/wf-2", r#"{"id": "wf-2", "status": "running"}"#)
            .await;

        let response = estimate(State(state()), Query(query(&server, "wf-2"))).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body = into_json(response).await;
        assert_eq!(
            body["message"],
            "Workflow status is running. Status must be 'success' or 'failed' to estimate cost"
        );
    }

    #[tokio::test]
    async fn missing_params_return_400_without_network() {
        let response = estimate(State(state()), Query(HashMap::new())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = into_json(response).await;
        assert!(body["message"].as_str().unwrap().contains("circle_token"));
    }

    #[tokio::test]
    async fn failing_job_returns_500_with_no_totals() {
        let server = MockServer::start().await;
        mount_json(&server, "/api/v2/workflow/wf-3", r#"{"id": "wf-3", "status": "failed"}"#)
            .await;
        mount_json(
            &server,
            "/api/v2/workflow/wf-3/jobs",
            r#"{"items": [{"name": "build", "job_number": 1}, {"name": "deploy", "job_number": 2}]}"#,
        )
        .await;
        mount_json(
            &server,
            "/api/v1.1/project/github/acme/widgets/1",
            r#"{"picard": {"executor": "docker", "resource_class": {"class": "medium"}}, "steps": []}"#,
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/api/v1.1/project/github/acme/widgets/2"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let response = estimate(State(state()), Query(query(&server, "wf-3"))).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = into_json(response).await;
        assert!(body.get("total_credits").is_none());
        let message = body["message"].as_str().unwrap();
        assert!(message.starts_with("1 of 2 jobs could not be costed"));
        assert!(message.contains("deploy (#2)"));
    }
}
