use std::fmt;

use serde::{Deserialize, Serialize};

use super::notice::UserNotice;

/// Failure surfaced by the persistence layer when a server-side invariant rejects a write.
///
/// Only free text is available; there is no structured error code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendFailure {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl BackendFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            details: None,
        }
    }

    /// The message when present, otherwise the details.
    pub fn text(&self) -> Option<&str> {
        [self.message.as_deref(), self.details.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|text| !text.is_empty())
    }
}

impl fmt::Display for BackendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text().unwrap_or("no message"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureKind {
    PaymentVerification,
    BalanceOutstanding,
    DeliveryAddress,
    StatusTransition,
    TrackingDetails,
}

/// Known invariant phrases, lowercase. Order matters: the first matching row wins.
///
/// New backend invariant messages must be added here.
const PHRASE_TABLE: &[(FailureKind, &[&str])] = &[
    (
        FailureKind::PaymentVerification,
        &[
            "without verified payment",
            "payment must be verified",
            "verified deposit",
        ],
    ),
    (
        FailureKind::BalanceOutstanding,
        &["fully paid", "balance remaining"],
    ),
    (
        FailureKind::DeliveryAddress,
        &["delivery address", "confirmed delivery address"],
    ),
    (FailureKind::StatusTransition, &["status transition"]),
    (FailureKind::TrackingDetails, &["tracking", "carrier"]),
];

const UNKNOWN_BALANCE: &str = "outstanding";

/// Turn an opaque persistence failure into a notice a person can act on.
///
/// Never panics; absent or unrecognized input degrades to `Status Update Failed`.
pub fn translate_failure(failure: Option<&BackendFailure>) -> UserNotice {
    let Some(text) = failure.and_then(BackendFailure::text) else {
        return UserNotice::update_failed(None);
    };

    match classify(text) {
        Some(FailureKind::PaymentVerification) => UserNotice::payment_required(),
        Some(FailureKind::BalanceOutstanding) => {
            let balance = extract_balance(text).unwrap_or(UNKNOWN_BALANCE);
            UserNotice::balance_required(balance)
        }
        Some(FailureKind::DeliveryAddress) => UserNotice::address_required(),
        Some(FailureKind::StatusTransition) => UserNotice::invalid_status_change(),
        Some(FailureKind::TrackingDetails) => UserNotice::tracking_required(),
        None => UserNotice::update_failed(Some(text)),
    }
}

/// Convenience for callers holding only the raw message.
pub fn translate_message(message: &str) -> UserNotice {
    translate_failure(Some(&BackendFailure::new(message)))
}

fn classify(text: &str) -> Option<FailureKind> {
    let lowered = text.to_ascii_lowercase();
    PHRASE_TABLE
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|phrase| lowered.contains(phrase)))
        .map(|(kind, _)| *kind)
}

/// Words that may sit between "balance" and its figure, as in `balance remaining: 500.00`.
const BALANCE_LABEL_WORDS: &[&str] = &["remaining", "outstanding", "due", "of"];

/// Pull the figure labelled by "balance", e.g. `500.00` from
/// `Cannot ship until fully paid. Balance: 500.00`.
///
/// The number must follow the label directly, allowing only a separator and an optional
/// currency code in between, so unrelated figures later in the text are never picked up.
fn extract_balance(text: &str) -> Option<&str> {
    // ASCII lowercasing keeps byte offsets aligned with `text`.
    let lowered = text.to_ascii_lowercase();
    let skip_space = |at: usize| at + (lowered[at..].len() - lowered[at..].trim_start().len());

    let mut at = skip_space(lowered.find("balance")? + "balance".len());
    if let Some(word) = BALANCE_LABEL_WORDS
        .iter()
        .find(|word| lowered[at..].starts_with(*word))
    {
        at = skip_space(at + word.len());
    }
    if lowered[at..].starts_with(':') {
        at = skip_space(at + 1);
    }
    if starts_with_currency_code(&text[at..]) {
        at = skip_space(at + 3);
    }

    let candidate = &text[at..];
    if !candidate.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let end = candidate
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .unwrap_or(candidate.len());

    let number = candidate[..end].trim_end_matches(['.', ',']);
    if number.is_empty() {
        None
    } else {
        Some(number)
    }
}

fn starts_with_currency_code(rest: &str) -> bool {
    let bytes = rest.as_bytes();
    match (bytes.get(..3), bytes.get(3)) {
        (Some(code), Some(next)) => {
            code.iter().all(u8::is_ascii_alphabetic)
                && (next.is_ascii_whitespace() || next.is_ascii_digit())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_balance_after_label() {
        assert_eq!(
            extract_balance("Cannot ship until fully paid. Balance: 500.00"),
            Some("500.00")
        );
        assert_eq!(
            extract_balance("balance remaining 1,250.75 GHS."),
            Some("1,250.75")
        );
        assert_eq!(extract_balance("Balance remaining: 300."), Some("300"));
        assert_eq!(extract_balance("Balance of GHS 320.50 due"), Some("320.50"));
    }

    #[test]
    fn ignores_figures_not_attached_to_the_label() {
        assert_eq!(
            extract_balance("balance remaining for invoice 7: 500.00"),
            None
        );
        assert_eq!(
            translate_message("Order must be fully paid; balance remaining for invoice 7: 500.00")
                .description,
            "Balance outstanding must be paid in full before this order can ship."
        );
    }

    #[test]
    fn extraction_gives_up_without_a_number() {
        assert_eq!(extract_balance("order must be fully paid"), None);
        assert_eq!(extract_balance("balance remaining unknown"), None);
    }

    #[test]
    fn phrase_table_is_case_insensitive() {
        assert_eq!(
            classify("Order Requires A CONFIRMED DELIVERY ADDRESS"),
            Some(FailureKind::DeliveryAddress)
        );
        assert_eq!(classify("nothing we know about"), None);
    }

    #[test]
    fn blank_message_falls_back_to_details() {
        let failure = BackendFailure {
            message: Some("  ".to_string()),
            details: Some("status transition not permitted".to_string()),
        };
        assert_eq!(failure.text(), Some("status transition not permitted"));
    }
}
