use serde::{Deserialize, Serialize};

use super::super::domain::DEFAULT_TRUST_SCORE;

/// Weights and windows for the trust score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub base_score: i16,
    /// Upper bounds (exclusive, in days) of the active, recent and lapsing recency bands.
    pub recency_bands_days: [i64; 3],
    pub trend_window_days: i64,
    /// Trailing count above this percentage of the previous window counts as growth.
    pub growth_threshold_pct: u32,
    /// Trailing count below this percentage of the previous window counts as decline.
    pub decline_threshold_pct: u32,
    pub tier_cutoffs: TierCutoffs,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_score: DEFAULT_TRUST_SCORE as i16,
            recency_bands_days: [30, 60, 90],
            trend_window_days: 90,
            growth_threshold_pct: 120,
            decline_threshold_pct: 80,
            tier_cutoffs: TierCutoffs::default(),
        }
    }
}

/// Minimum score for each tier; anything below `new` is restricted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCutoffs {
    pub preferred: u8,
    pub trusted: u8,
    pub verified: u8,
    pub new: u8,
}

impl Default for TierCutoffs {
    fn default() -> Self {
        Self {
            preferred: 80,
            trusted: 65,
            verified: 40,
            new: 20,
        }
    }
}
