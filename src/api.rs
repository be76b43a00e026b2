//! REST API Server for the FinChain orchestrator
//!
//! Exposes query processing, registry introspection, and health checks
//! over HTTP

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use uuid::Uuid;

use crate::error::OrchestrationError;
use crate::models::{AgentDescriptor, HealthReport};
use crate::orchestrator::Orchestrator;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub request_id: Uuid,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(request_id: Uuid, data: T) -> Self {
        Self {
            success: true,
            request_id,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(request_id: Uuid, message: String) -> Self {
        Self {
            success: false,
            request_id,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub orchestrator: Arc<Orchestrator>,
}

/// =============================
/// Health Endpoint
/// =============================

async fn health(State(state): State<ApiState>) -> Json<HealthReport> {
    Json(state.orchestrator.health_check().await)
}

/// =============================
/// Agents Endpoint
/// =============================

async fn list_agents(State(state): State<ApiState>) -> Json<Vec<AgentDescriptor>> {
    Json(state.orchestrator.describe_agents().await)
}

/// =============================
/// Query Endpoint
/// =============================

async fn run_query(
    State(state): State<ApiState>,
    Json(req): Json<QueryRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let request_id = Uuid::new_v4();
    info!(request_id = %request_id, query = %req.query, "Received query request");

    if req.query.trim().is_empty() {
        let error = OrchestrationError::InvalidQuery("query must not be empty".to_string());
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(request_id, error.to_string())),
        );
    }

    match state.orchestrator.process_query(&req.query).await {
        Ok(response) => (
            StatusCode::OK,
            Json(ApiResponse::success(request_id, response)),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(
                request_id,
                format!("Query processing failed: {}", e),
            )),
        ),
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(orchestrator: Arc<Orchestrator>) -> Router {
    let state = ApiState { orchestrator };

    Router::new()
        .route("/health", get(health))
        .route("/api/agents", get(list_agents))
        .route("/api/query", post(run_query))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    orchestrator: Arc<Orchestrator>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(orchestrator);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::create_default_agents;

    async fn default_state() -> ApiState {
        let orchestrator = Arc::new(Orchestrator::new());
        for agent in create_default_agents() {
            orchestrator.register_agent(agent).await;
        }
        ApiState { orchestrator }
    }

    #[tokio::test]
    async fn test_health_endpoint_reports_agents() {
        let state = default_state().await;
        let Json(report) = health(State(state)).await;

        assert_eq!(report.orchestrator.status, "healthy");
        assert_eq!(report.orchestrator.agent_count, 5);
        assert_eq!(report.agents.len(), 5);
    }

    #[tokio::test]
    async fn test_query_endpoint_returns_synthesized_response() {
        let state = default_state().await;
        let (status, Json(response)) = run_query(
            State(state),
            Json(QueryRequest {
                query: "Analyze smart contract security".to_string(),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(response.success);
        let data = response.data.unwrap();
        assert_eq!(data["agents_consulted"][0], "blockchain_analyst");
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected() {
        let state = default_state().await;
        let (status, Json(response)) = run_query(
            State(state),
            Json(QueryRequest {
                query: "   ".to_string(),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!response.success);
        assert!(response.error.unwrap().contains("must not be empty"));
    }

    #[tokio::test]
    async fn test_agents_endpoint_lists_registration_order() {
        let state = default_state().await;
        let Json(descriptors) = list_agents(State(state)).await;

        let identifiers: Vec<&str> = descriptors
            .iter()
            .map(|descriptor| descriptor.identifier.as_str())
            .collect();
        assert_eq!(
            identifiers,
            vec![
                "blockchain_analyst",
                "fintech_navigator",
                "ml_investment_strategist",
                "crypto_economics",
                "regulatory_compliance",
            ]
        );
        assert!(descriptors.iter().all(|d| !d.capabilities.is_empty()));
    }
}
