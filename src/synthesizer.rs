//! Response synthesis
//!
//! Merges per-agent responses into one unified, source-attributed response.

use crate::models::{AgentResponse, AttributedItem, SynthesizedResponse};
use tracing::debug;

/// Merges multiple agents' responses into a single response
#[derive(Default)]
pub struct Synthesizer;

impl Synthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Merge per-agent responses, preserving the given order for both
    /// `agents_consulted` and item attribution.
    ///
    /// Confidence is the sum of each agent's confidence divided by the total
    /// number of responding agents. An agent without a confidence value
    /// contributes nothing to the sum but still counts in the denominator;
    /// this matches the historical aggregation exactly.
    pub fn merge(&self, query: &str, responses: &[(String, AgentResponse)]) -> SynthesizedResponse {
        let agents_consulted: Vec<String> =
            responses.iter().map(|(name, _)| name.clone()).collect();

        let mut insights = Vec::new();
        let mut recommendations = Vec::new();
        let mut confidence = 0.0;

        for (agent_name, response) in responses {
            for insight in &response.insights {
                insights.push(AttributedItem {
                    content: insight.clone(),
                    source: agent_name.clone(),
                });
            }

            for recommendation in &response.recommendations {
                recommendations.push(AttributedItem {
                    content: recommendation.clone(),
                    source: agent_name.clone(),
                });
            }

            if let Some(agent_confidence) = response.confidence {
                confidence += agent_confidence / responses.len() as f64;
            }
        }

        debug!(
            query = %query,
            agents = agents_consulted.len(),
            insights = insights.len(),
            recommendations = recommendations.len(),
            "Synthesized response"
        );

        SynthesizedResponse {
            query: query.to_string(),
            agents_consulted,
            insights,
            recommendations,
            confidence,
            failures: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(insights: &[&str], recommendations: &[&str], confidence: Option<f64>) -> AgentResponse {
        AgentResponse {
            insights: insights.iter().map(|s| s.to_string()).collect(),
            recommendations: recommendations.iter().map(|s| s.to_string()).collect(),
            confidence,
            extra: Default::default(),
        }
    }

    #[test]
    fn test_merge_empty_responses() {
        let synthesizer = Synthesizer::new();
        let merged = synthesizer.merge("anything", &[]);

        assert_eq!(merged.confidence, 0.0);
        assert!(merged.agents_consulted.is_empty());
        assert!(merged.insights.is_empty());
        assert!(merged.recommendations.is_empty());
    }

    #[test]
    fn test_merge_preserves_order_and_sources() {
        let synthesizer = Synthesizer::new();
        let responses = vec![
            (
                "blockchain_analyst".to_string(),
                response(&["a1", "a2"], &["ra"], Some(0.6)),
            ),
            (
                "crypto_economics".to_string(),
                response(&["b1"], &["rb1", "rb2"], Some(0.8)),
            ),
        ];

        let merged = synthesizer.merge("q", &responses);

        assert_eq!(
            merged.agents_consulted,
            vec!["blockchain_analyst", "crypto_economics"]
        );
        let contents: Vec<&str> = merged.insights.iter().map(|i| i.content.as_str()).collect();
        assert_eq!(contents, vec!["a1", "a2", "b1"]);
        assert_eq!(merged.insights[0].source, "blockchain_analyst");
        assert_eq!(merged.insights[2].source, "crypto_economics");
        assert_eq!(merged.recommendations.len(), 3);
        assert!((merged.confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_missing_confidence_still_counts_in_denominator() {
        let synthesizer = Synthesizer::new();
        let responses = vec![
            ("a".to_string(), response(&[], &[], Some(0.8))),
            ("b".to_string(), response(&[], &[], None)),
        ];

        let merged = synthesizer.merge("q", &responses);

        // 0.8 / 2, not 0.8 / 1
        assert!((merged.confidence - 0.4).abs() < 1e-9);
    }
}
