//! Fintech trends, regulations, and payment systems agent

use crate::agents::{grade_confidence, mentions_any, Agent};
use crate::error::OrchestrationError;
use crate::models::AgentResponse;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

const TREND_TERMS: &[&str] = &[
    "trend",
    "market",
    "growth",
    "emerging",
    "technology",
    "innovation",
];
const REGULATION_TERMS: &[&str] = &[
    "regulation",
    "compliance",
    "legal",
    "law",
    "framework",
    "policy",
];
const PAYMENT_TERMS: &[&str] = &["payment", "transaction", "transfer", "wallet", "banking"];
const API_TERMS: &[&str] = &[
    "api",
    "integration",
    "data",
    "connect",
    "platform",
    "open banking",
];

struct FintechTrend {
    phrase: &'static str,
    growth_rate: f64,
    market_size: f64,
    key_players: &'static [&'static str],
    maturity: &'static str,
}

const FINTECH_TRENDS: &[FintechTrend] = &[
    FintechTrend {
        phrase: "embedded finance",
        growth_rate: 0.26,
        market_size: 43_000_000_000.0,
        key_players: &["Stripe", "Plaid", "Marqeta"],
        maturity: "growing",
    },
    FintechTrend {
        phrase: "decentralized finance",
        growth_rate: 0.18,
        market_size: 11_000_000_000.0,
        key_players: &["MakerDAO", "Compound", "Aave"],
        maturity: "emerging",
    },
    FintechTrend {
        phrase: "buy now pay later",
        growth_rate: 0.22,
        market_size: 125_000_000_000.0,
        key_players: &["Klarna", "Afterpay", "Affirm"],
        maturity: "maturing",
    },
];

struct RegulatoryUpdate {
    phrase: &'static str,
    region: &'static str,
    status: &'static str,
    impact: &'static str,
    summary: &'static str,
}

const REGULATORY_UPDATES: &[RegulatoryUpdate] = &[
    RegulatoryUpdate {
        phrase: "eu digital finance package",
        region: "Europe",
        status: "implemented",
        impact: "high",
        summary: "Comprehensive framework for crypto-assets (MiCA) and digital operational resilience (DORA)",
    },
    RegulatoryUpdate {
        phrase: "us stablecoin regulation",
        region: "United States",
        status: "proposed",
        impact: "medium",
        summary: "Proposed framework for regulating stablecoin issuers as banks",
    },
    RegulatoryUpdate {
        phrase: "uk open banking",
        region: "United Kingdom",
        status: "implemented",
        impact: "high",
        summary: "Mandatory API access to banking data for authorized third parties",
    },
];

const REGION_KEYWORDS: &[(&str, &str)] = &[
    ("europe", "Europe"),
    ("european", "Europe"),
    ("usa", "United States"),
    ("america", "United States"),
    ("britain", "United Kingdom"),
];

struct PaymentSystem {
    phrase: &'static str,
    adoption_rate: f64,
    regions: &'static [&'static str],
    key_technologies: &'static [&'static str],
    integration_complexity: &'static str,
}

const PAYMENT_SYSTEMS: &[PaymentSystem] = &[
    PaymentSystem {
        phrase: "real time payments",
        adoption_rate: 0.65,
        regions: &["US", "EU", "UK", "Asia"],
        key_technologies: &["ISO 20022", "API connectivity"],
        integration_complexity: "medium",
    },
    PaymentSystem {
        phrase: "crypto payments",
        adoption_rate: 0.12,
        regions: &["Global", "El Salvador"],
        key_technologies: &["Lightning Network", "Stablecoins"],
        integration_complexity: "high",
    },
    PaymentSystem {
        phrase: "mobile wallets",
        adoption_rate: 0.78,
        regions: &["Global", "China", "Africa"],
        key_technologies: &["NFC", "QR codes"],
        integration_complexity: "low",
    },
];

struct FinancialApi {
    phrase: &'static str,
    standards: &'static [&'static str],
    data_access: &'static [&'static str],
    security: &'static str,
    market_penetration: &'static str,
}

const FINANCIAL_APIS: &[FinancialApi] = &[
    FinancialApi {
        phrase: "open banking",
        standards: &["UK Open Banking", "Berlin Group", "FDX"],
        data_access: &["Account information", "Payment initiation"],
        security: "OAuth 2.0 + MTLS",
        market_penetration: "high",
    },
    FinancialApi {
        phrase: "payment processing",
        standards: &["ISO 8583", "ISO 20022"],
        data_access: &["Payment processing", "Authorization"],
        security: "TLS + API keys",
        market_penetration: "high",
    },
    FinancialApi {
        phrase: "financial data",
        standards: &["FIX Protocol", "REST APIs"],
        data_access: &["Market data", "Analytics", "Risk assessment"],
        security: "API keys + IP whitelisting",
        market_penetration: "medium",
    },
];

/// Capitalize each word, mirroring how trend keys are displayed.
fn title_case(phrase: &str) -> String {
    phrase
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Detailed single-trend analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub trend: String,
    pub growth_rate: f64,
    pub market_size: f64,
    pub maturity: String,
    pub key_players: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Tracks fintech trends, regulations, and market movements
#[derive(Default)]
pub struct FintechNavigator;

impl FintechNavigator {
    pub fn new() -> Self {
        Self
    }

    fn maturity_recommendation(trend_name: &str, maturity: &str) -> Option<String> {
        match maturity {
            "emerging" => Some(format!(
                "Consider early strategic investments in {} for long-term positioning",
                trend_name
            )),
            "growing" => Some(format!(
                "Build partnerships with established {} providers to enhance your offerings",
                trend_name
            )),
            "maturing" => Some(format!(
                "Focus on differentiation and value-add features in the competitive {} space",
                trend_name
            )),
            _ => None,
        }
    }

    fn analyze_fintech_trends(
        &self,
        query_lower: &str,
        response: &mut AgentResponse,
        trends: &mut Vec<Value>,
    ) {
        let mentioned: Vec<&FintechTrend> = FINTECH_TRENDS
            .iter()
            .filter(|trend| query_lower.contains(trend.phrase))
            .collect();

        if mentioned.is_empty() {
            response.insights.push(
                "Embedded finance continues to be the fastest-growing fintech sector with a 26% annual growth rate"
                    .to_string(),
            );
            response.insights.push(
                "Regulatory technology (RegTech) is gaining importance as financial regulations become more complex"
                    .to_string(),
            );
            response.insights.push(
                "Traditional banks are increasingly partnering with fintech startups rather than competing directly"
                    .to_string(),
            );

            response.recommendations.push(
                "Focus on open banking and API-first solutions for maximum market connectivity"
                    .to_string(),
            );
            response.recommendations.push(
                "Monitor the impact of BNPL regulations which may constrain growth in that sector"
                    .to_string(),
            );

            trends.push(json!({
                "category": "Market Overview",
                "growth_sectors": ["Embedded Finance", "RegTech", "DeFi"],
                "declining_sectors": ["Traditional Digital Payments", "Pure Lending Platforms"],
                "investment_focus": "Infrastructure and API platforms seeing strongest VC interest",
            }));
            return;
        }

        for trend in mentioned {
            let trend_name = title_case(trend.phrase);
            response.insights.push(format!(
                "{} market is growing at {:.0}% annually with an estimated market size of ${:.1}B",
                trend_name,
                trend.growth_rate * 100.0,
                trend.market_size / 1e9
            ));
            response.insights.push(format!(
                "Key players in {}: {}",
                trend_name,
                trend.key_players.join(", ")
            ));

            if let Some(rec) = Self::maturity_recommendation(&trend_name, trend.maturity) {
                response.recommendations.push(rec);
            }

            trends.push(json!({
                "category": trend_name,
                "growth_rate": trend.growth_rate,
                "market_size": trend.market_size,
                "maturity": trend.maturity,
                "key_players": trend.key_players,
            }));
        }
    }

    fn analyze_regulations(&self, query_lower: &str, response: &mut AgentResponse) {
        let mentioned: Vec<&RegulatoryUpdate> = REGULATORY_UPDATES
            .iter()
            .filter(|update| query_lower.contains(update.phrase))
            .collect();

        let regions: Vec<&str> = REGION_KEYWORDS
            .iter()
            .filter(|(keyword, _)| query_lower.contains(keyword))
            .map(|(_, region)| *region)
            .collect();

        if mentioned.is_empty() && regions.is_empty() {
            response.insights.push(
                "Global financial regulations are becoming increasingly harmonized for digital assets and payments"
                    .to_string(),
            );
            response.insights.push(
                "Regulatory focus on consumer protection and data privacy is intensifying across major markets"
                    .to_string(),
            );
            response.insights.push(
                "Compliance requirements for fintech firms are growing more complex, creating barriers to entry"
                    .to_string(),
            );

            response.recommendations.push(
                "Invest in flexible compliance infrastructure that can adapt to evolving regulations"
                    .to_string(),
            );
            response.recommendations.push(
                "Consider regulatory requirements in product design from the earliest stages"
                    .to_string(),
            );
            return;
        }

        for update in &mentioned {
            let update_name = title_case(update.phrase);
            response.insights.push(format!(
                "{} in {} is currently {} with {} impact",
                update_name, update.region, update.status, update.impact
            ));
            response
                .insights
                .push(format!("Summary: {}", update.summary));

            match update.status {
                "proposed" => response.recommendations.push(format!(
                    "Monitor developments in {} and prepare contingency plans",
                    update_name
                )),
                "implemented" => response.recommendations.push(format!(
                    "Ensure compliance with {} requirements immediately",
                    update_name
                )),
                _ => {}
            }
        }

        for region in regions {
            let region_updates: Vec<&RegulatoryUpdate> = REGULATORY_UPDATES
                .iter()
                .filter(|update| update.region == region)
                .collect();

            if region_updates.is_empty() {
                continue;
            }

            response.insights.push(format!(
                "{} has {} major regulatory frameworks affecting fintech operations",
                region,
                region_updates.len()
            ));

            let high_impact: Vec<String> = region_updates
                .iter()
                .filter(|update| update.impact == "high")
                .map(|update| title_case(update.phrase))
                .collect();
            if !high_impact.is_empty() {
                response.insights.push(format!(
                    "High-impact regulations in {}: {}",
                    region,
                    high_impact.join(", ")
                ));
            }

            response.recommendations.push(format!(
                "Consider regulatory expertise specific to {} for expansion plans",
                region
            ));
        }
    }

    fn analyze_payment_systems(&self, query_lower: &str, response: &mut AgentResponse) {
        let mentioned: Vec<&PaymentSystem> = PAYMENT_SYSTEMS
            .iter()
            .filter(|system| query_lower.contains(system.phrase))
            .collect();

        if mentioned.is_empty() {
            response.insights.push(
                "Real-time payment systems are becoming the global standard with 65% adoption in major economies"
                    .to_string(),
            );
            response.insights.push(
                "Mobile wallets have reached 78% adoption in developed markets, led by contactless payments"
                    .to_string(),
            );
            response.insights.push(
                "Cryptocurrency payment acceptance is growing but remains niche at 12% global adoption"
                    .to_string(),
            );

            response.recommendations.push(
                "Implement real-time payment capabilities to meet growing consumer expectations"
                    .to_string(),
            );
            response.recommendations.push(
                "Ensure mobile wallet compatibility across your payment stack".to_string(),
            );
            return;
        }

        for system in mentioned {
            let system_name = title_case(system.phrase);
            response.insights.push(format!(
                "{} have {:.0}% adoption across {}",
                system_name,
                system.adoption_rate * 100.0,
                system.regions.join(", ")
            ));
            response.insights.push(format!(
                "Key technologies for {}: {}",
                system_name,
                system.key_technologies.join(", ")
            ));

            match system.integration_complexity {
                "low" => response.recommendations.push(format!(
                    "Implement {} as a priority due to high ROI and low integration complexity",
                    system_name
                )),
                "medium" => response.recommendations.push(format!(
                    "Plan a phased approach to {} integration, focusing on high-value use cases first",
                    system_name
                )),
                "high" => response.recommendations.push(format!(
                    "Consider partnership with specialized providers for {} integration to reduce complexity",
                    system_name
                )),
                _ => {}
            }
        }
    }

    fn analyze_financial_apis(&self, query_lower: &str, response: &mut AgentResponse) {
        let mentioned: Vec<&FinancialApi> = FINANCIAL_APIS
            .iter()
            .filter(|api| query_lower.contains(api.phrase))
            .collect();

        if mentioned.is_empty() {
            response.insights.push(
                "API-first infrastructure is becoming the standard for financial services delivery"
                    .to_string(),
            );
            response.insights.push(
                "Open Banking APIs have seen rapid adoption with PSD2 in Europe and similar initiatives globally"
                    .to_string(),
            );
            response.insights.push(
                "Financial data APIs are consolidating through major acquisitions (e.g., Visa-Plaid, Mastercard-Finicity)"
                    .to_string(),
            );

            response.recommendations.push(
                "Design with API-first architecture to maximize flexibility and partnership opportunities"
                    .to_string(),
            );
            response.recommendations.push(
                "Standardize API security using OAuth 2.0 and MTLS for industry best practices"
                    .to_string(),
            );
            return;
        }

        for api in mentioned {
            let api_name = title_case(api.phrase);
            response.insights.push(format!(
                "{} APIs use standards including: {}",
                api_name,
                api.standards.join(", ")
            ));
            response.insights.push(format!(
                "{} APIs provide access to: {}",
                api_name,
                api.data_access.join(", ")
            ));
            response.insights.push(format!(
                "Market penetration: {}, Security: {}",
                api.market_penetration, api.security
            ));

            if api.market_penetration == "high" {
                response.recommendations.push(format!(
                    "Prioritize {} API integration as part of core infrastructure",
                    api_name
                ));
            } else {
                response.recommendations.push(format!(
                    "Evaluate {} API providers based on data quality and reliability metrics",
                    api_name
                ));
            }
        }
    }

    /// Analyze a specific market trend in detail.
    pub fn analyze_market_trend(&self, trend_name: &str) -> Result<TrendAnalysis> {
        let phrase = trend_name.to_lowercase().replace('_', " ");

        let trend = FINTECH_TRENDS
            .iter()
            .find(|trend| trend.phrase == phrase)
            .ok_or_else(|| {
                OrchestrationError::AgentError(format!(
                    "Trend {} not found in database",
                    trend_name
                ))
            })?;

        let display_name = title_case(trend.phrase);
        let recommendations = Self::maturity_recommendation(&display_name, trend.maturity)
            .into_iter()
            .collect();

        Ok(TrendAnalysis {
            trend: display_name,
            growth_rate: trend.growth_rate,
            market_size: trend.market_size,
            maturity: trend.maturity.to_string(),
            key_players: trend.key_players.iter().map(|p| p.to_string()).collect(),
            recommendations,
        })
    }
}

#[async_trait::async_trait]
impl Agent for FintechNavigator {
    fn name(&self) -> &str {
        "fintech_navigator"
    }

    fn description(&self) -> &str {
        "Tracks fintech trends, regulations, and market movements"
    }

    async fn process_query(&self, query: &str) -> Result<AgentResponse> {
        info!(query = %query, "Processing fintech query");

        let query_lower = query.to_lowercase();
        let mut response = AgentResponse::new();
        let mut trends: Vec<Value> = Vec::new();

        if mentions_any(&query_lower, TREND_TERMS) {
            self.analyze_fintech_trends(&query_lower, &mut response, &mut trends);
        }

        if mentions_any(&query_lower, REGULATION_TERMS) {
            self.analyze_regulations(&query_lower, &mut response);
        }

        if mentions_any(&query_lower, PAYMENT_TERMS) {
            self.analyze_payment_systems(&query_lower, &mut response);
        }

        if mentions_any(&query_lower, API_TERMS) {
            self.analyze_financial_apis(&query_lower, &mut response);
        }

        response.extra.insert("trends".to_string(), json!(trends));
        response.confidence = Some(grade_confidence(&response));

        Ok(response)
    }

    fn capabilities(&self) -> Vec<String> {
        vec![
            "Track fintech trends, regulations, and market movements".to_string(),
            "Monitor financial news and interpret impact on investments".to_string(),
            "Assist with payment systems integration and selection".to_string(),
            "Guide financial API orchestration and implementation".to_string(),
            "Analyze regulatory implications of financial products".to_string(),
            "Compare technology stacks across financial service providers".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_general_trend_query() {
        let agent = FintechNavigator::new();
        let response = agent
            .process_query("What are the latest fintech trends?")
            .await
            .unwrap();

        assert!(response
            .insights
            .iter()
            .any(|insight| insight.contains("Embedded finance")));
        let trends = response.extra["trends"].as_array().unwrap();
        assert_eq!(trends[0]["category"], "Market Overview");
    }

    #[tokio::test]
    async fn test_specific_trend_query() {
        let agent = FintechNavigator::new();
        let response = agent
            .process_query("Tell me about the buy now pay later market")
            .await
            .unwrap();

        assert!(response
            .insights
            .iter()
            .any(|insight| insight.contains("Buy Now Pay Later")));
        assert!(response
            .recommendations
            .iter()
            .any(|rec| rec.contains("differentiation")));
    }

    #[tokio::test]
    async fn test_payment_query_low_complexity_recommendation() {
        let agent = FintechNavigator::new();
        let response = agent
            .process_query("Should we support mobile wallets for payment?")
            .await
            .unwrap();

        assert!(response
            .recommendations
            .iter()
            .any(|rec| rec.contains("Mobile Wallets as a priority")));
    }

    #[test]
    fn test_analyze_market_trend_known_and_unknown() {
        let agent = FintechNavigator::new();

        let analysis = agent.analyze_market_trend("embedded_finance").unwrap();
        assert_eq!(analysis.trend, "Embedded Finance");
        assert_eq!(analysis.maturity, "growing");

        assert!(agent.analyze_market_trend("quantum_banking").is_err());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("buy now pay later"), "Buy Now Pay Later");
    }
}
