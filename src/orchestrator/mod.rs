//! Orchestrator - owns the agent registry and coordinates routing + synthesis
//!
//! QUERY → ROUTE → DISPATCH (per agent) → SYNTHESIZE

use crate::agents::Agent;
use crate::models::{
    AgentDescriptor, AgentFailure, AgentResponse, HealthReport, OrchestratorHealth,
    SynthesizedResponse,
};
use crate::router::Router;
use crate::synthesizer::Synthesizer;
use crate::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Insertion-ordered registry of agents.
///
/// Re-registering a name overwrites the agent but keeps its original
/// position, so the "consult everyone" fallback order stays stable.
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn Agent>>,
    order: Vec<String>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self {
            agents: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn insert(&mut self, agent: Arc<dyn Agent>) {
        let name = agent.name().to_string();
        if self.agents.insert(name.clone(), agent).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Agent>> {
        self.agents.get(name).cloned()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Coordinates the agent network: registration, routing, dispatch,
/// and synthesis
pub struct Orchestrator {
    registry: RwLock<AgentRegistry>,
    router: Router,
    synthesizer: Synthesizer,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::with_router(Router::new())
    }

    pub fn with_router(router: Router) -> Self {
        info!("Initializing FinChain orchestrator");
        Self {
            registry: RwLock::new(AgentRegistry::new()),
            router,
            synthesizer: Synthesizer::new(),
        }
    }

    /// Register an agent, overwriting any previous agent with the same name.
    pub async fn register_agent(&self, agent: Arc<dyn Agent>) {
        let name = agent.name().to_string();
        let mut registry = self.registry.write().await;
        registry.insert(agent);
        info!(agent = %name, "Registered agent");
    }

    /// Route a query to the relevant agents and synthesize their responses.
    ///
    /// A failing agent is dropped from the response set and noted in
    /// `failures`; the remaining agents are still synthesized.
    pub async fn process_query(&self, query: &str) -> Result<SynthesizedResponse> {
        info!(query = %query, "Processing query");

        // Snapshot selection under the read lock, then dispatch without it.
        // Identifiers selected by the router but absent from the registry
        // are skipped silently.
        let agents: Vec<(String, Arc<dyn Agent>)> = {
            let registry = self.registry.read().await;
            let available = registry.names();
            self.router
                .select(query, &available)
                .into_iter()
                .filter_map(|name| registry.get(&name).map(|agent| (name, agent)))
                .collect()
        };

        let mut responses: Vec<(String, AgentResponse)> = Vec::with_capacity(agents.len());
        let mut failures: Vec<AgentFailure> = Vec::new();

        for (name, agent) in agents {
            match agent.process_query(query).await {
                Ok(response) => responses.push((name, response)),
                Err(e) => {
                    warn!(agent = %name, error = %e, "Agent call failed; continuing without it");
                    failures.push(AgentFailure {
                        agent: name,
                        error: e.to_string(),
                    });
                }
            }
        }

        let mut synthesized = self.synthesizer.merge(query, &responses);
        synthesized.failures = failures;

        Ok(synthesized)
    }

    /// Registered agent names, snapshot at call time.
    pub async fn get_registered_agents(&self) -> Vec<String> {
        self.registry.read().await.names()
    }

    /// Descriptors for every registered agent, in registry order.
    pub async fn describe_agents(&self) -> Vec<AgentDescriptor> {
        let registry = self.registry.read().await;

        registry
            .names()
            .iter()
            .filter_map(|name| registry.get(name))
            .map(|agent| AgentDescriptor {
                identifier: agent.name().to_string(),
                capabilities: agent.capabilities(),
            })
            .collect()
    }

    /// Health of the orchestrator and every registered agent.
    pub async fn health_check(&self) -> HealthReport {
        let registry = self.registry.read().await;

        let agents = registry
            .names()
            .iter()
            .filter_map(|name| registry.get(name))
            .map(|agent| agent.health_check())
            .collect();

        HealthReport {
            orchestrator: OrchestratorHealth {
                status: "healthy".to_string(),
                agent_count: registry.len(),
            },
            agents,
        }
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{BlockchainAnalyst, MlInvestmentStrategist};
    use crate::error::OrchestrationError;

    struct StaticAgent {
        name: &'static str,
        insight: &'static str,
    }

    #[async_trait::async_trait]
    impl Agent for StaticAgent {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "static test agent"
        }

        async fn process_query(&self, _query: &str) -> Result<AgentResponse> {
            let mut response = AgentResponse::new();
            response.insights.push(self.insight.to_string());
            response.confidence = Some(0.5);
            Ok(response)
        }

        fn capabilities(&self) -> Vec<String> {
            vec!["static answers".to_string()]
        }
    }

    struct FailingAgent;

    #[async_trait::async_trait]
    impl Agent for FailingAgent {
        fn name(&self) -> &str {
            "failing_agent"
        }

        fn description(&self) -> &str {
            "always fails"
        }

        async fn process_query(&self, _query: &str) -> Result<AgentResponse> {
            Err(OrchestrationError::AgentError("boom".to_string()))
        }

        fn capabilities(&self) -> Vec<String> {
            vec![]
        }
    }

    async fn two_agent_orchestrator() -> Orchestrator {
        let orchestrator = Orchestrator::new();
        orchestrator
            .register_agent(Arc::new(BlockchainAnalyst::new()))
            .await;
        orchestrator
            .register_agent(Arc::new(MlInvestmentStrategist::new()))
            .await;
        orchestrator
    }

    #[tokio::test]
    async fn test_keyword_query_routes_to_single_agent() {
        let orchestrator = two_agent_orchestrator().await;
        let response = orchestrator
            .process_query("Analyze smart contract security")
            .await
            .unwrap();

        assert_eq!(response.agents_consulted, vec!["blockchain_analyst"]);
        assert!(response.insights.iter().all(|i| i.source == "blockchain_analyst"));
    }

    #[tokio::test]
    async fn test_portfolio_query_consults_strategist() {
        let orchestrator = two_agent_orchestrator().await;
        let response = orchestrator
            .process_query("Optimize my investment portfolio")
            .await
            .unwrap();

        assert!(response
            .agents_consulted
            .contains(&"ml_investment_strategist".to_string()));
    }

    #[tokio::test]
    async fn test_no_match_consults_everyone_in_registration_order() {
        let orchestrator = two_agent_orchestrator().await;
        let response = orchestrator.process_query("hello").await.unwrap();

        assert_eq!(
            response.agents_consulted,
            vec!["blockchain_analyst", "ml_investment_strategist"]
        );
    }

    #[tokio::test]
    async fn test_empty_registry_yields_well_formed_response() {
        let orchestrator = Orchestrator::new();
        let response = orchestrator.process_query("hello").await.unwrap();

        assert_eq!(response.confidence, 0.0);
        assert!(response.agents_consulted.is_empty());
        assert!(response.insights.is_empty());
        assert!(response.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_selected_but_unregistered_agent_is_skipped() {
        let orchestrator = Orchestrator::new();
        orchestrator
            .register_agent(Arc::new(MlInvestmentStrategist::new()))
            .await;

        // Routes to blockchain_analyst, which is not registered.
        let response = orchestrator
            .process_query("Analyze smart contract security")
            .await
            .unwrap();

        assert!(response.agents_consulted.is_empty());
        assert_eq!(response.confidence, 0.0);
    }

    #[tokio::test]
    async fn test_reregistration_overwrites_and_keeps_position() {
        let orchestrator = two_agent_orchestrator().await;
        orchestrator
            .register_agent(Arc::new(StaticAgent {
                name: "blockchain_analyst",
                insight: "replacement answer",
            }))
            .await;

        let names = orchestrator.get_registered_agents().await;
        assert_eq!(names, vec!["blockchain_analyst", "ml_investment_strategist"]);

        let response = orchestrator
            .process_query("Analyze smart contract security")
            .await
            .unwrap();
        assert_eq!(response.insights[0].content, "replacement answer");
    }

    #[tokio::test]
    async fn test_agent_failure_is_isolated() {
        let orchestrator = Orchestrator::new();
        orchestrator.register_agent(Arc::new(FailingAgent)).await;
        orchestrator
            .register_agent(Arc::new(StaticAgent {
                name: "steady_agent",
                insight: "still here",
            }))
            .await;

        // No keyword match: both agents are consulted via fallback.
        let response = orchestrator.process_query("hello").await.unwrap();

        assert_eq!(response.agents_consulted, vec!["steady_agent"]);
        assert_eq!(response.failures.len(), 1);
        assert_eq!(response.failures[0].agent, "failing_agent");
        assert!(response.failures[0].error.contains("boom"));
        assert_eq!(response.insights[0].content, "still here");
        assert!((response.confidence - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_describe_agents_returns_capabilities_in_order() {
        let orchestrator = two_agent_orchestrator().await;
        let descriptors = orchestrator.describe_agents().await;

        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].identifier, "blockchain_analyst");
        assert_eq!(descriptors[1].identifier, "ml_investment_strategist");
        assert!(!descriptors[0].capabilities.is_empty());
    }

    #[tokio::test]
    async fn test_health_check_reports_every_agent() {
        let orchestrator = two_agent_orchestrator().await;
        let health = orchestrator.health_check().await;

        assert_eq!(health.orchestrator.status, "healthy");
        assert_eq!(health.orchestrator.agent_count, 2);
        assert_eq!(health.agents.len(), 2);
        assert_eq!(health.agents[0].name, "blockchain_analyst");
        assert!(health.agents.iter().all(|a| a.status == "healthy"));
    }
}
