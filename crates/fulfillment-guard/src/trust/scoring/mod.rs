mod config;
mod policy;
mod rules;

pub use config::{ScoringConfig, TierCutoffs};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{CustomerOrder, TrustTier};

pub(crate) use policy::change_reason;

/// Stateless scorer over a customer's order history.
#[derive(Debug, Clone, Default)]
pub struct TrustScoringEngine {
    config: ScoringConfig,
}

impl TrustScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score `orders` as of `now`. Pure; identical input gives identical output.
    pub fn evaluate(&self, orders: &[CustomerOrder], now: DateTime<Utc>) -> TrustEvaluation {
        let (factors, score) = rules::score_history(orders, now, &self.config);
        let tier = self.tier_for_score(score);

        TrustEvaluation {
            score,
            tier,
            factors,
        }
    }

    pub fn tier_for_score(&self, score: u8) -> TrustTier {
        policy::tier_for_score(score, &self.config.tier_cutoffs)
    }
}

/// Adjustment families contributing to the trust score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    PaymentBehavior,
    Recency,
    OrderTrend,
    IssueFrequency,
}

impl FactorKind {
    pub const fn label(self) -> &'static str {
        match self {
            FactorKind::PaymentBehavior => "payment behavior",
            FactorKind::Recency => "recency",
            FactorKind::OrderTrend => "order trend",
            FactorKind::IssueFrequency => "issue frequency",
        }
    }
}

/// Discrete contribution to a trust score, kept for transparent audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreFactor {
    pub factor: FactorKind,
    pub adjustment: i16,
    pub rating: String,
    pub notes: String,
}

/// Scoring output: clamped score, derived tier, and the factors behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustEvaluation {
    pub score: u8,
    pub tier: TrustTier,
    pub factors: Vec<ScoreFactor>,
}
