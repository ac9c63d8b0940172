use chrono::{DateTime, Duration, Utc};

use super::super::domain::CustomerOrder;
use super::config::ScoringConfig;
use super::{FactorKind, ScoreFactor};

pub(crate) fn score_history(
    orders: &[CustomerOrder],
    now: DateTime<Utc>,
    config: &ScoringConfig,
) -> (Vec<ScoreFactor>, u8) {
    let components = vec![
        payment_behavior(orders),
        recency(orders, now, config),
        order_trend(orders, now, config),
        issue_frequency(orders),
    ];

    let total = components
        .iter()
        .fold(config.base_score, |sum, factor| sum + factor.adjustment);

    (components, total.clamp(0, 100) as u8)
}

fn payment_behavior(orders: &[CustomerOrder]) -> ScoreFactor {
    let stuck = orders
        .iter()
        .filter(|order| order.had_pending_or_unverified_payment)
        .count();

    let (adjustment, rating) = match stuck {
        0 => (20, "excellent"),
        1 => (10, "good"),
        _ => (-10, "poor"),
    };

    ScoreFactor {
        factor: FactorKind::PaymentBehavior,
        adjustment,
        rating: rating.to_string(),
        notes: format!("{stuck} order(s) with pending or unverified payment"),
    }
}

fn recency(orders: &[CustomerOrder], now: DateTime<Utc>, config: &ScoringConfig) -> ScoreFactor {
    let latest = orders.iter().map(|order| order.created_at).max();
    let [active, recent, lapsing] = config.recency_bands_days;

    let Some(latest) = latest else {
        return ScoreFactor {
            factor: FactorKind::Recency,
            adjustment: -15,
            rating: "dormant".to_string(),
            notes: "no orders on record".to_string(),
        };
    };

    let days = (now - latest).num_days();
    let (adjustment, rating) = if days < active {
        (15, "active")
    } else if days < recent {
        (5, "recent")
    } else if days < lapsing {
        (-5, "lapsing")
    } else {
        (-15, "dormant")
    };

    ScoreFactor {
        factor: FactorKind::Recency,
        adjustment,
        rating: rating.to_string(),
        notes: format!("last order {days} day(s) ago"),
    }
}

fn order_trend(
    orders: &[CustomerOrder],
    now: DateTime<Utc>,
    config: &ScoringConfig,
) -> ScoreFactor {
    let window = Duration::days(config.trend_window_days);
    let trailing_start = now - window;
    let previous_start = trailing_start - window;

    let trailing = orders
        .iter()
        .filter(|order| order.created_at > trailing_start)
        .count() as u64;
    let previous = orders
        .iter()
        .filter(|order| order.created_at > previous_start && order.created_at <= trailing_start)
        .count() as u64;

    // A previous window with no orders gives no trend signal.
    let (adjustment, rating) = if previous == 0 {
        (0, "stable")
    } else if trailing * 100 > previous * u64::from(config.growth_threshold_pct) {
        (10, "growing")
    } else if trailing * 100 < previous * u64::from(config.decline_threshold_pct) {
        (-10, "declining")
    } else {
        (0, "stable")
    };

    ScoreFactor {
        factor: FactorKind::OrderTrend,
        adjustment,
        rating: rating.to_string(),
        notes: format!("{trailing} order(s) in the last window vs {previous} before"),
    }
}

fn issue_frequency(orders: &[CustomerOrder]) -> ScoreFactor {
    let issues = orders.iter().filter(|order| order.had_issue()).count();

    let (adjustment, rating) = match issues {
        0 => (5, "clean"),
        1..=2 => (0, "occasional"),
        _ => (-5, "frequent"),
    };

    ScoreFactor {
        factor: FactorKind::IssueFrequency,
        adjustment,
        rating: rating.to_string(),
        notes: format!("{issues} order(s) with delivery failure or cancellation"),
    }
}
