//! Query routing
//!
//! Maps a query to the agents most relevant to it using keyword matching.
//! Keyword matching stands in for real relevance classification; a future
//! implementation can swap in another `RelevanceClassifier` without
//! touching the routing contract.

use tracing::debug;

/// Maps a query to the identifiers of agents that should handle it.
pub trait RelevanceClassifier: Send + Sync {
    /// Matched agent identifiers, in rule order, without duplicates.
    /// Empty means "no domain matched".
    fn classify(&self, query: &str) -> Vec<String>;
}

struct DomainRule {
    agent: &'static str,
    keywords: &'static [&'static str],
}

/// Fixed per-domain keyword table, evaluated in order
const DOMAIN_RULES: &[DomainRule] = &[
    DomainRule {
        agent: "blockchain_analyst",
        keywords: &["blockchain", "transaction", "smart contract", "crypto"],
    },
    DomainRule {
        agent: "fintech_navigator",
        keywords: &["fintech", "payment", "banking", "financial news"],
    },
    DomainRule {
        agent: "ml_investment_strategist",
        keywords: &["investment", "predict", "portfolio", "strategy"],
    },
    DomainRule {
        agent: "crypto_economics",
        keywords: &["token", "defi", "yield", "tokenomics"],
    },
    DomainRule {
        agent: "regulatory_compliance",
        keywords: &["regulation", "compliance", "legal", "jurisdiction"],
    },
];

/// Substring-based keyword classifier over the fixed domain table
#[derive(Default)]
pub struct KeywordRouter;

impl KeywordRouter {
    pub fn new() -> Self {
        Self
    }
}

impl RelevanceClassifier for KeywordRouter {
    fn classify(&self, query: &str) -> Vec<String> {
        let query_lower = query.to_lowercase();
        let mut matched: Vec<String> = Vec::new();

        for rule in DOMAIN_RULES {
            let hit = rule
                .keywords
                .iter()
                .any(|keyword| query_lower.contains(keyword));

            if hit && !matched.iter().any(|name| name == rule.agent) {
                matched.push(rule.agent.to_string());
            }
        }

        matched
    }
}

/// Selects which agents should handle a query.
///
/// Routing is a membership decision, not a relevance score: when no domain
/// matches, every available agent is consulted.
pub struct Router {
    classifier: Box<dyn RelevanceClassifier>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            classifier: Box::new(KeywordRouter::new()),
        }
    }

    pub fn with_classifier(classifier: Box<dyn RelevanceClassifier>) -> Self {
        Self { classifier }
    }

    /// Agent identifiers selected for `query`.
    ///
    /// `available` is the registry snapshot in registration order; it is
    /// returned verbatim when no domain matches. Selected identifiers that
    /// are not registered are the orchestrator's problem, not an error here.
    pub fn select(&self, query: &str, available: &[String]) -> Vec<String> {
        let matched = self.classifier.classify(query);

        if matched.is_empty() {
            debug!(query = %query, "No domain matched; consulting all agents");
            return available.to_vec();
        }

        debug!(query = %query, agents = ?matched, "Routed query");
        matched
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn available() -> Vec<String> {
        vec![
            "blockchain_analyst".to_string(),
            "ml_investment_strategist".to_string(),
        ]
    }

    #[test]
    fn test_keyword_match_selects_single_domain() {
        let router = Router::new();
        let selected = router.select("Analyze smart contract security", &available());
        assert_eq!(selected, vec!["blockchain_analyst".to_string()]);
    }

    #[test]
    fn test_multi_domain_query_keeps_rule_order() {
        let router = Router::new();
        let selected = router.select(
            "Does regulation affect my portfolio on the blockchain?",
            &available(),
        );
        assert_eq!(
            selected,
            vec![
                "blockchain_analyst".to_string(),
                "ml_investment_strategist".to_string(),
                "regulatory_compliance".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_match_falls_back_to_all_available() {
        let router = Router::new();
        let selected = router.select("hello", &available());
        assert_eq!(selected, available());
    }

    #[test]
    fn test_no_duplicate_for_multiple_keyword_hits() {
        let router = Router::new();
        let selected = router.select("blockchain transaction crypto", &available());
        assert_eq!(selected, vec!["blockchain_analyst".to_string()]);
    }

    #[test]
    fn test_custom_classifier_is_pluggable() {
        struct Fixed;
        impl RelevanceClassifier for Fixed {
            fn classify(&self, _query: &str) -> Vec<String> {
                vec!["crypto_economics".to_string()]
            }
        }

        let router = Router::with_classifier(Box::new(Fixed));
        let selected = router.select("anything at all", &available());
        assert_eq!(selected, vec!["crypto_economics".to_string()]);
    }
}
