use super::super::domain::TrustTier;
use super::config::TierCutoffs;
use super::ScoreFactor;

/// Step function from clamped score to tier.
pub(crate) fn tier_for_score(score: u8, cutoffs: &TierCutoffs) -> TrustTier {
    if score >= cutoffs.preferred {
        TrustTier::Preferred
    } else if score >= cutoffs.trusted {
        TrustTier::Trusted
    } else if score >= cutoffs.verified {
        TrustTier::Verified
    } else if score >= cutoffs.new {
        TrustTier::New
    } else {
        TrustTier::Restricted
    }
}

/// System-generated audit text naming the factors that moved the score most.
pub(crate) fn change_reason(factors: &[ScoreFactor], previous_score: u8, new_score: u8) -> String {
    let mut dominant: Vec<&ScoreFactor> = factors
        .iter()
        .filter(|factor| factor.adjustment != 0)
        .collect();
    dominant.sort_by_key(|factor| std::cmp::Reverse(factor.adjustment.abs()));

    let summary = if dominant.is_empty() {
        "no adjustments applied".to_string()
    } else {
        dominant
            .iter()
            .take(2)
            .map(|factor| {
                format!(
                    "{} {} ({:+})",
                    factor.factor.label(),
                    factor.rating,
                    factor.adjustment
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!("Automatic evaluation {previous_score} -> {new_score}: {summary}")
}
