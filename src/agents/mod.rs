//! Agent trait and the specialized FinChain agents
//!
//! Agents are keyword-triggered content generators over static domain data.
//! Real NLP and live data feeds are intentionally out of scope.

use crate::models::{AgentHealth, AgentResponse};
use crate::Result;
use std::sync::Arc;

pub mod blockchain_analyst;
pub mod crypto_economics;
pub mod fintech_navigator;
pub mod ml_investment_strategist;
pub mod regulatory_compliance;

pub use blockchain_analyst::BlockchainAnalyst;
pub use crypto_economics::CryptoEconomics;
pub use fintech_navigator::FintechNavigator;
pub use ml_investment_strategist::MlInvestmentStrategist;
pub use regulatory_compliance::RegulatoryCompliance;

/// Trait for a single specialized agent
#[async_trait::async_trait]
pub trait Agent: Send + Sync {
    /// Stable identifier used for registration and routing
    fn name(&self) -> &str;

    /// One-line description of the agent's specialty
    fn description(&self) -> &str;

    /// Answer a query within the agent's domain
    async fn process_query(&self, query: &str) -> Result<AgentResponse>;

    /// Descriptive capability list; not consumed by routing
    fn capabilities(&self) -> Vec<String>;

    fn health_check(&self) -> AgentHealth {
        AgentHealth {
            status: "healthy".to_string(),
            name: self.name().to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Confidence grows with how much of the query the agent could answer,
/// capped at 0.9.
pub(crate) fn grade_confidence(response: &AgentResponse) -> f64 {
    let score = 0.3
        + 0.2 * response.insights.len() as f64
        + 0.1 * response.recommendations.len() as f64;
    score.min(0.9)
}

pub(crate) fn mentions_any(query_lower: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| query_lower.contains(term))
}

/// Derive a stable pseudo-score in [lo, hi] from a seed string.
/// Simulated analyses must return the same value on every call.
pub(crate) fn stable_score(seed: &str, lo: f64, hi: f64) -> f64 {
    use sha2::{Digest, Sha256};

    let digest = Sha256::digest(seed.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);

    let fraction = u64::from_be_bytes(bytes) as f64 / u64::MAX as f64;
    lo + (hi - lo) * fraction
}

/// All five specialized agents, ready for registration.
pub fn create_default_agents() -> Vec<Arc<dyn Agent>> {
    vec![
        Arc::new(BlockchainAnalyst::new()),
        Arc::new(FintechNavigator::new()),
        Arc::new(MlInvestmentStrategist::new()),
        Arc::new(CryptoEconomics::new()),
        Arc::new(RegulatoryCompliance::new()),
    ]
}
