use serde::{Deserialize, Serialize};

/// Follow-up a UI can offer next to a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoticeAction {
    VerifyPayment,
    RequestBalance,
    RequestAddress,
    ViewOrder,
}

impl NoticeAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            NoticeAction::VerifyPayment => "verify-payment",
            NoticeAction::RequestBalance => "request-balance",
            NoticeAction::RequestAddress => "request-address",
            NoticeAction::ViewOrder => "view-order",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            NoticeAction::VerifyPayment => "Verify Payment",
            NoticeAction::RequestBalance => "Request Balance",
            NoticeAction::RequestAddress => "Request Address",
            NoticeAction::ViewOrder => "View Order",
        }
    }
}

/// Title and description shown to a person when a status change is blocked or fails.
///
/// Both the transition guard and the failure translator produce this shape so call sites
/// render one component regardless of where the refusal came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserNotice {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<NoticeAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_label: Option<String>,
}

pub(crate) const FALLBACK_FAILURE_DESCRIPTION: &str =
    "An unexpected error occurred while updating the order status. Please try again.";

impl UserNotice {
    fn new(title: &str, description: String, action: Option<NoticeAction>) -> Self {
        Self {
            title: title.to_string(),
            description,
            action,
            action_label: action.map(|action| action.label().to_string()),
        }
    }

    pub fn payment_required() -> Self {
        Self::new(
            "Payment Required",
            "A verified deposit is required before this order can be processed. Verify the customer's payment proof first.".to_string(),
            Some(NoticeAction::VerifyPayment),
        )
    }

    /// `balance` is shown verbatim, e.g. `500.00` or `GHS 500.00`.
    pub fn balance_required(balance: &str) -> Self {
        Self::new(
            "Balance Payment Required",
            format!("Balance {balance} must be paid in full before this order can ship."),
            Some(NoticeAction::RequestBalance),
        )
    }

    pub fn address_required() -> Self {
        Self::new(
            "Address Required",
            "A confirmed delivery address is required before this order can move forward."
                .to_string(),
            Some(NoticeAction::RequestAddress),
        )
    }

    pub fn invalid_status_change() -> Self {
        Self::new(
            "Invalid Status Change",
            "This status change is not allowed from the order's current status.".to_string(),
            Some(NoticeAction::ViewOrder),
        )
    }

    pub fn tracking_required() -> Self {
        Self::new(
            "Tracking Details Required",
            "Add the carrier and tracking number before marking this order as shipped."
                .to_string(),
            None,
        )
    }

    pub fn order_changed() -> Self {
        Self::new(
            "Order Changed",
            "Someone else updated this order while you were working on it. Refresh the order and try again.".to_string(),
            Some(NoticeAction::ViewOrder),
        )
    }

    pub fn update_failed(message: Option<&str>) -> Self {
        let description = message
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| FALLBACK_FAILURE_DESCRIPTION.to_string());
        Self::new("Status Update Failed", description, None)
    }
}
