//! Core data models for the FinChain Intelligence Network

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

//
// ================= Agent Response =================
//

/// Response produced by a single agent for one query.
///
/// `confidence` is optional: an agent may omit it, in which case it
/// contributes nothing to the synthesized average but still counts toward
/// the denominator. Domain-specific payloads (alerts, trends, models, ...)
/// ride along in `extra` and are ignored by the core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentResponse {
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AgentResponse {
    pub fn new() -> Self {
        Self::default()
    }
}

//
// ================= Synthesized Response =================
//

/// A single insight or recommendation tagged with the agent it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributedItem {
    pub content: String,
    pub source: String,
}

/// Record of an agent whose call failed and was excluded from synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentFailure {
    pub agent: String,
    pub error: String,
}

/// Unified response assembled from every consulted agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizedResponse {
    pub query: String,
    pub agents_consulted: Vec<String>,
    pub insights: Vec<AttributedItem>,
    pub recommendations: Vec<AttributedItem>,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<AgentFailure>,
}

/// Descriptor for a registered agent: identifier plus capability list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub identifier: String,
    pub capabilities: Vec<String>,
}

//
// ================= Health =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentHealth {
    pub status: String,
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorHealth {
    pub status: String,
    pub agent_count: usize,
}

/// Aggregate health for the orchestrator and every registered agent,
/// in registry order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub orchestrator: OrchestratorHealth,
    pub agents: Vec<AgentHealth>,
}

impl fmt::Display for SynthesizedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Query: {}", self.query)?;
        writeln!(f, "Agents consulted: {}", self.agents_consulted.join(", "))?;
        writeln!(f, "Confidence: {:.2}", self.confidence)?;
        writeln!(f, "\nInsights:")?;
        for (idx, insight) in self.insights.iter().enumerate() {
            writeln!(
                f,
                "  {}. {} (Source: {})",
                idx + 1,
                insight.content,
                insight.source
            )?;
        }
        writeln!(f, "\nRecommendations:")?;
        for (idx, rec) in self.recommendations.iter().enumerate() {
            writeln!(
                f,
                "  {}. {} (Source: {})",
                idx + 1,
                rec.content,
                rec.source
            )?;
        }
        for failure in &self.failures {
            writeln!(f, "\n[degraded] {}: {}", failure.agent, failure.error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_numbers_items_with_sources() {
        let response = SynthesizedResponse {
            query: "gas prices".to_string(),
            agents_consulted: vec!["blockchain_analyst".to_string()],
            insights: vec![AttributedItem {
                content: "Gas is cheap".to_string(),
                source: "blockchain_analyst".to_string(),
            }],
            recommendations: vec![AttributedItem {
                content: "Batch transactions".to_string(),
                source: "blockchain_analyst".to_string(),
            }],
            confidence: 0.5,
            failures: vec![],
        };

        let rendered = response.to_string();
        assert!(rendered.contains("Query: gas prices"));
        assert!(rendered.contains("Confidence: 0.50"));
        assert!(rendered.contains("  1. Gas is cheap (Source: blockchain_analyst)"));
        assert!(rendered.contains("  1. Batch transactions (Source: blockchain_analyst)"));
    }

    #[test]
    fn test_agent_response_extra_fields_flatten() {
        let mut response = AgentResponse::new();
        response.insights.push("insight".to_string());
        response.confidence = Some(0.5);
        response.extra.insert(
            "alerts".to_string(),
            serde_json::json!(["missing input validation"]),
        );

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["alerts"][0], "missing input validation");
        assert_eq!(value["confidence"], 0.5);

        let parsed: AgentResponse = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.extra["alerts"][0], "missing input validation");
    }
}
