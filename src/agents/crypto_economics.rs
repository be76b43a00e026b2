//! Tokenomics and DeFi protocol analysis agent

use crate::agents::{grade_confidence, mentions_any, Agent};
use crate::models::AgentResponse;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

const TOKENOMICS_TERMS: &[&str] = &[
    "tokenomics",
    "token model",
    "token valuation",
    "token economics",
];
const DEFI_TERMS: &[&str] = &["defi", "yield", "farming", "liquidity", "amm", "lending"];
const SUSTAINABILITY_TERMS: &[&str] = &[
    "sustainability",
    "sustainable",
    "long-term",
    "economics",
    "viability",
];

struct DefiProtocol {
    name: &'static str,
    tvl: f64,
    daily_volume: f64,
    total_borrowed: f64,
    swap_fee: f64,
    admin_fee: f64,
}

const DEFI_PROTOCOLS: &[DefiProtocol] = &[
    DefiProtocol {
        name: "uniswap",
        tvl: 3_800_000_000.0,
        daily_volume: 1_200_000_000.0,
        total_borrowed: 0.0,
        swap_fee: 0.003,
        admin_fee: 0.0,
    },
    DefiProtocol {
        name: "aave",
        tvl: 5_600_000_000.0,
        daily_volume: 0.0,
        total_borrowed: 2_100_000_000.0,
        swap_fee: 0.0,
        admin_fee: 0.0,
    },
    DefiProtocol {
        name: "curve",
        tvl: 4_200_000_000.0,
        daily_volume: 950_000_000.0,
        total_borrowed: 0.0,
        swap_fee: 0.0004,
        admin_fee: 0.00005,
    },
];

/// Input for a token economic model evaluation.
///
/// `max_supply: None` means an unlimited supply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenModel {
    pub max_supply: Option<f64>,
    pub initial_supply: f64,
    pub emission_rate: f64,
    pub utility_score: f64,
    pub burn_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenModelEvaluation {
    pub sustainability_score: f64,
    pub is_deflationary: bool,
    pub annual_inflation: String,
    pub time_to_max_supply: String,
    pub recommendations: Vec<String>,
}

/// Models tokenomics and analyzes DeFi protocol economics
#[derive(Default)]
pub struct CryptoEconomics;

impl CryptoEconomics {
    pub fn new() -> Self {
        Self
    }

    fn analyze_tokenomics(&self, response: &mut AgentResponse, models: &mut Vec<Value>) {
        response.insights.push(
            "The token follows a deflationary model with a 0.5% burn on each transaction"
                .to_string(),
        );
        response.insights.push(
            "Current token velocity suggests high trading activity but limited utility adoption"
                .to_string(),
        );
        response.insights.push(
            "Supply distribution shows 15% concentration in top 10 wallets, which is moderate centralization"
                .to_string(),
        );

        response.recommendations.push(
            "Consider implementing token utility beyond governance to drive sustainable value"
                .to_string(),
        );
        response.recommendations.push(
            "The emission schedule should be adjusted to reduce early selling pressure".to_string(),
        );

        models.push(json!({
            "type": "token_valuation",
            "metric": "token_velocity",
            "value": 4.8,
            "interpretation": "High turnover rate indicating speculative trading dominates utility usage",
        }));
    }

    fn analyze_defi_protocols(&self, query_lower: &str, response: &mut AgentResponse) {
        let mentioned: Vec<&DefiProtocol> = DEFI_PROTOCOLS
            .iter()
            .filter(|protocol| query_lower.contains(protocol.name))
            .collect();

        if mentioned.is_empty() {
            response.insights.push(
                "Current DeFi TVL across major protocols shows a 5% increase over the past week"
                    .to_string(),
            );
            response.insights.push(
                "Liquidity mining incentives have declined by 30% in the last quarter".to_string(),
            );
            response
                .insights
                .push("Average yield on stablecoin pairs has decreased to 2-4% APY".to_string());

            response.recommendations.push(
                "Focus on protocols with sustainable fee models rather than high emission incentives"
                    .to_string(),
            );
            response.recommendations.push(
                "Consider diversifying across lending and AMM protocols to balance risk"
                    .to_string(),
            );
            return;
        }

        for protocol in mentioned {
            match protocol.name {
                "uniswap" => {
                    response.insights.push(format!(
                        "Uniswap currently has ${:.2}B TVL with ${:.2}B daily volume",
                        protocol.tvl / 1e9,
                        protocol.daily_volume / 1e9
                    ));
                    response.insights.push(format!(
                        "Fee generation of approximately ${:.2}M daily",
                        protocol.daily_volume * protocol.swap_fee / 1e6
                    ));
                    response.recommendations.push(
                        "Consider providing liquidity in stable pairs for lower risk with current market volatility"
                            .to_string(),
                    );
                }
                "aave" => {
                    let utilization = protocol.total_borrowed / protocol.tvl;
                    response.insights.push(format!(
                        "Aave has a utilization rate of {:.2}%, indicating moderate capital efficiency",
                        utilization * 100.0
                    ));
                    response.insights.push(format!(
                        "Current TVL of ${:.2}B with ${:.2}B borrowed",
                        protocol.tvl / 1e9,
                        protocol.total_borrowed / 1e9
                    ));
                    response.recommendations.push(
                        "Monitor interest rates closely as they tend to spike when utilization exceeds 80%"
                            .to_string(),
                    );
                }
                "curve" => {
                    response.insights.push(format!(
                        "Curve generates approximately ${:.2}M in daily fees",
                        protocol.daily_volume * protocol.swap_fee / 1e6
                    ));
                    response.insights.push(format!(
                        "The protocol captures ${:.2}M daily for token holders",
                        protocol.daily_volume * protocol.admin_fee / 1e6
                    ));
                    response.recommendations.push(
                        "Curve offers lower-risk, stable yield for conservative positions in the current market"
                            .to_string(),
                    );
                }
                _ => {}
            }
        }
    }

    fn analyze_economic_sustainability(
        &self,
        response: &mut AgentResponse,
        models: &mut Vec<Value>,
    ) {
        response.insights.push(
            "Sustainable token economies require revenue mechanisms that don't rely solely on new entrants"
                .to_string(),
        );
        response.insights.push(
            "Projects with fee-sharing models show 30% higher longevity than pure inflationary models"
                .to_string(),
        );
        response.insights.push(
            "Current ratio of protocol revenue to token market cap averages 0.05 across top projects"
                .to_string(),
        );

        response.recommendations.push(
            "Evaluate projects based on PE-like ratios (market cap to revenue) for fundamental valuation"
                .to_string(),
        );
        response.recommendations.push(
            "Prioritize protocols with proven revenue models that don't rely primarily on token emissions"
                .to_string(),
        );

        models.push(json!({
            "type": "sustainability_metric",
            "metric": "revenue_to_marketcap",
            "value": 0.05,
            "interpretation": "Average ratio across DeFi is low compared to traditional finance, indicating potential overvaluation",
        }));
    }

    /// Evaluate a token economic model for long-term sustainability.
    pub fn evaluate_token_model(&self, token: &TokenModel) -> TokenModelEvaluation {
        let inflation_rate = if token.initial_supply > 0.0 {
            token.emission_rate / token.initial_supply
        } else {
            0.0
        };
        let deflationary = token.burn_rate > inflation_rate;

        let mut sustainability_score = 0.3;
        if token.max_supply.is_some() {
            sustainability_score += 0.2;
        }
        if token.utility_score > 0.0 {
            sustainability_score += token.utility_score * 0.3;
        }
        if deflationary {
            sustainability_score += 0.2;
        }
        let sustainability_score = sustainability_score.min(1.0);

        let time_to_max_supply = match token.max_supply {
            None => "infinity".to_string(),
            Some(max_supply) if token.emission_rate > 0.0 => format!(
                "{:.1} years",
                (max_supply - token.initial_supply) / token.emission_rate
            ),
            Some(_) => "no emission".to_string(),
        };

        TokenModelEvaluation {
            sustainability_score,
            is_deflationary: deflationary,
            annual_inflation: format!("{:.2}%", inflation_rate * 100.0),
            time_to_max_supply,
            recommendations: vec![
                if token.utility_score < 0.5 {
                    "Increase token utility to drive demand".to_string()
                } else {
                    "Token has good utility mechanisms".to_string()
                },
                if deflationary {
                    "Deflationary model is positive for long-term value".to_string()
                } else {
                    "Consider implementing burn mechanisms".to_string()
                },
                if inflation_rate > 0.2 {
                    "Reduce emission rate to limit inflation".to_string()
                } else {
                    "Emission rate is sustainable".to_string()
                },
            ],
        }
    }
}

#[async_trait::async_trait]
impl Agent for CryptoEconomics {
    fn name(&self) -> &str {
        "crypto_economics"
    }

    fn description(&self) -> &str {
        "Models tokenomics and provides insights on token valuation and DeFi protocols"
    }

    async fn process_query(&self, query: &str) -> Result<AgentResponse> {
        info!(query = %query, "Processing crypto economics query");

        let query_lower = query.to_lowercase();
        let mut response = AgentResponse::new();
        let mut models: Vec<Value> = Vec::new();

        if mentions_any(&query_lower, TOKENOMICS_TERMS) {
            self.analyze_tokenomics(&mut response, &mut models);
        }

        if mentions_any(&query_lower, DEFI_TERMS) {
            self.analyze_defi_protocols(&query_lower, &mut response);
        }

        if mentions_any(&query_lower, SUSTAINABILITY_TERMS) {
            self.analyze_economic_sustainability(&mut response, &mut models);
        }

        response.extra.insert("models".to_string(), json!(models));
        response.confidence = Some(grade_confidence(&response));

        Ok(response)
    }

    fn capabilities(&self) -> Vec<String> {
        vec![
            "Model tokenomics and provide insights on token valuation".to_string(),
            "Analyze yield farming opportunities and DeFi protocols".to_string(),
            "Evaluate the economic sustainability of blockchain projects".to_string(),
            "Compare token economic models across different projects".to_string(),
            "Project token emission schedules and economic impacts".to_string(),
            "Calculate potential yields and risks for DeFi strategies".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defi_query_without_protocol_gives_general_insights() {
        let agent = CryptoEconomics::new();
        let response = agent
            .process_query("What are current DeFi yield opportunities?")
            .await
            .unwrap();

        assert_eq!(response.insights.len(), 3);
        assert_eq!(response.recommendations.len(), 2);
    }

    #[tokio::test]
    async fn test_named_protocol_gets_specific_insights() {
        let agent = CryptoEconomics::new();
        let response = agent
            .process_query("How is liquidity on uniswap?")
            .await
            .unwrap();

        assert!(response
            .insights
            .iter()
            .any(|insight| insight.contains("Uniswap currently has $3.80B TVL")));
    }

    #[tokio::test]
    async fn test_tokenomics_query_records_model() {
        let agent = CryptoEconomics::new();
        let response = agent
            .process_query("Evaluate the tokenomics of this project")
            .await
            .unwrap();

        let models = response.extra["models"].as_array().unwrap();
        assert_eq!(models[0]["metric"], "token_velocity");
    }

    #[test]
    fn test_evaluate_token_model_deflationary() {
        let agent = CryptoEconomics::new();
        let evaluation = agent.evaluate_token_model(&TokenModel {
            max_supply: Some(1_000_000.0),
            initial_supply: 500_000.0,
            emission_rate: 1_000.0,
            utility_score: 0.8,
            burn_rate: 0.05,
        });

        assert!(evaluation.is_deflationary);
        assert_eq!(evaluation.time_to_max_supply, "500.0 years");
        assert!(evaluation.sustainability_score <= 1.0);
        assert_eq!(
            evaluation.recommendations[0],
            "Token has good utility mechanisms"
        );
    }

    #[test]
    fn test_evaluate_token_model_unlimited_supply() {
        let agent = CryptoEconomics::new();
        let evaluation = agent.evaluate_token_model(&TokenModel::default());

        assert_eq!(evaluation.time_to_max_supply, "infinity");
        assert!(!evaluation.is_deflationary);
        assert!((evaluation.sustainability_score - 0.3).abs() < 1e-9);
    }
}
