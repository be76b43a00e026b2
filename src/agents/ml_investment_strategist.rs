//! ML-driven investment strategy and portfolio optimization agent
//!
//! Model outputs are simulated; scores are derived deterministically so
//! repeated analyses of the same asset agree.

use crate::agents::{grade_confidence, mentions_any, stable_score, Agent};
use crate::models::AgentResponse;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use tracing::info;

const PREDICTION_TERMS: &[&str] = &["predict", "forecast", "trend", "future"];
const RECOMMENDATION_TERMS: &[&str] = &["recommend", "suggest", "advice"];
const PORTFOLIO_TERMS: &[&str] = &["portfolio", "optimize", "allocation", "balance"];

const CONSERVATIVE_TERMS: &[&str] = &["conservative", "safe", "low risk", "cautious"];
const AGGRESSIVE_TERMS: &[&str] = &["aggressive", "high risk", "growth", "risky"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskProfile::Conservative => "conservative",
            RiskProfile::Moderate => "moderate",
            RiskProfile::Aggressive => "aggressive",
        };
        write!(f, "{}", s)
    }
}

/// Simulated single-asset analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetAnalysis {
    pub asset: String,
    pub time_horizon: String,
    pub sentiment_score: f64,
    pub price_prediction: String,
    pub technical_signals: Vec<String>,
    pub confidence: f64,
    pub recommendation: String,
}

/// Uses (simulated) machine learning for investment strategy and
/// portfolio optimization
#[derive(Default)]
pub struct MlInvestmentStrategist;

impl MlInvestmentStrategist {
    pub fn new() -> Self {
        Self
    }

    fn determine_risk_profile(&self, query_lower: &str) -> RiskProfile {
        if mentions_any(query_lower, CONSERVATIVE_TERMS) {
            RiskProfile::Conservative
        } else if mentions_any(query_lower, AGGRESSIVE_TERMS) {
            RiskProfile::Aggressive
        } else {
            RiskProfile::Moderate
        }
    }

    fn predict_market_trends(&self, response: &mut AgentResponse) {
        response.insights.push(
            "ML models predict a 65% probability of continued market growth in the technology sector over the next quarter"
                .to_string(),
        );
        response.insights.push(
            "Sentiment analysis of financial news indicates positive outlook for renewable energy investments"
                .to_string(),
        );
        response.insights.push(
            "Pattern recognition models identify potential correction in cryptocurrency markets within the next month"
                .to_string(),
        );
    }

    fn provide_investment_recommendations(
        &self,
        response: &mut AgentResponse,
        risk_profile: RiskProfile,
    ) {
        match risk_profile {
            RiskProfile::Conservative => {
                response.insights.push(
                    "Market volatility is expected to increase, suggesting more conservative positioning"
                        .to_string(),
                );
                response.recommendations.push(
                    "Consider increasing allocation to high-quality bonds and dividend-paying stocks"
                        .to_string(),
                );
                response.recommendations.push(
                    "Reduce exposure to emerging markets until volatility subsides".to_string(),
                );
            }
            RiskProfile::Aggressive => {
                response.insights.push(
                    "Technical indicators suggest strong momentum in technology and AI-related sectors"
                        .to_string(),
                );
                response.recommendations.push(
                    "Consider overweighting technology stocks with exposure to AI and cloud computing"
                        .to_string(),
                );
                response.recommendations.push(
                    "Selected crypto assets show favorable risk-reward profiles for aggressive investors"
                        .to_string(),
                );
            }
            RiskProfile::Moderate => {
                response.insights.push(
                    "Balanced approach recommended with moderate exposure to growth and value investments"
                        .to_string(),
                );
                response.recommendations.push(
                    "Consider a barbell strategy with both defensive and growth-oriented positions"
                        .to_string(),
                );
                response.recommendations.push(
                    "Maintain diversification across asset classes with tactical adjustments based on economic indicators"
                        .to_string(),
                );
            }
        }
    }

    fn optimize_portfolio(&self, response: &mut AgentResponse, risk_profile: RiskProfile) {
        let allocation = match risk_profile {
            RiskProfile::Conservative => json!({
                "stocks": 30,
                "bonds": 40,
                "crypto": 5,
                "commodities": 10,
                "real_estate": 10,
                "cash": 5,
            }),
            RiskProfile::Aggressive => json!({
                "stocks": 60,
                "bonds": 15,
                "crypto": 15,
                "commodities": 5,
                "real_estate": 5,
                "cash": 0,
            }),
            RiskProfile::Moderate => json!({
                "stocks": 45,
                "bonds": 25,
                "crypto": 10,
                "commodities": 10,
                "real_estate": 7,
                "cash": 3,
            }),
        };

        response
            .extra
            .insert("portfolio_allocation".to_string(), allocation);
        response.insights.push(format!(
            "Optimized portfolio allocation for {} risk profile using modern portfolio theory",
            risk_profile
        ));
        response.insights.push(
            "The allocation achieves a projected Sharpe ratio of 1.2 based on historical and predicted asset performance"
                .to_string(),
        );
        response.recommendations.push(
            "Consider rebalancing quarterly to maintain target allocation and risk profile"
                .to_string(),
        );
    }

    /// Analyze a single asset over a time horizon ("short", "medium", "long").
    pub fn analyze_asset(&self, asset: &str, time_horizon: &str) -> AssetAnalysis {
        let horizon = match time_horizon {
            "short" => "1-3 months",
            "long" => "2-5 years",
            _ => "6-12 months",
        };

        let sentiment_score = stable_score(&format!("{}:{}:sentiment", asset, horizon), 0.0, 1.0);
        let price_prediction = stable_score(&format!("{}:{}:price", asset, horizon), -0.2, 0.3);
        let confidence = stable_score(&format!("{}:{}:confidence", asset, horizon), 0.5, 0.9);

        let signal = if price_prediction > 0.0 {
            "bullish"
        } else {
            "bearish"
        };

        let recommendation = if price_prediction > 0.1 {
            "buy"
        } else if price_prediction > -0.1 {
            "hold"
        } else {
            "sell"
        };

        AssetAnalysis {
            asset: asset.to_string(),
            time_horizon: horizon.to_string(),
            sentiment_score,
            price_prediction: format!("{:.2}%", price_prediction * 100.0),
            technical_signals: vec![signal.to_string()],
            confidence,
            recommendation: recommendation.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl Agent for MlInvestmentStrategist {
    fn name(&self) -> &str {
        "ml_investment_strategist"
    }

    fn description(&self) -> &str {
        "Uses machine learning for investment strategy and portfolio optimization"
    }

    async fn process_query(&self, query: &str) -> Result<AgentResponse> {
        info!(query = %query, "Processing investment query");

        let query_lower = query.to_lowercase();
        let mut response = AgentResponse::new();

        if mentions_any(&query_lower, PREDICTION_TERMS) {
            self.predict_market_trends(&mut response);
        }

        if mentions_any(&query_lower, RECOMMENDATION_TERMS) {
            let risk_profile = self.determine_risk_profile(&query_lower);
            self.provide_investment_recommendations(&mut response, risk_profile);
        }

        if mentions_any(&query_lower, PORTFOLIO_TERMS) {
            let risk_profile = self.determine_risk_profile(&query_lower);
            self.optimize_portfolio(&mut response, risk_profile);
        }

        response.confidence = Some(grade_confidence(&response));

        Ok(response)
    }

    fn capabilities(&self) -> Vec<String> {
        vec![
            "Predict market trends and asset performance using machine learning models".to_string(),
            "Provide personalized investment recommendations based on risk profiles".to_string(),
            "Optimize portfolio allocation using reinforcement learning algorithms".to_string(),
            "Analyze sentiment in financial news and social media".to_string(),
            "Generate risk-adjusted return projections for different asset classes".to_string(),
            "Perform technical analysis using pattern recognition algorithms".to_string(),
        ]
    }
}
