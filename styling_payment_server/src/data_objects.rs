use std::fmt::Display;

use serde::{Deserialize, Serialize};
use styling_payment_engine::{Disposition, ReconciliationResult};

pub const VERIFIED_MESSAGE: &str = "Payment verified successfully";
pub const UNVERIFIED_MESSAGE: &str = "Payment received but could not be verified. It will be reviewed manually.";
pub const DEFERRED_MESSAGE: &str = "Payment verified. Your booking will be processed shortly.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Failed,
    Error,
}

/// The body of every payment verification response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonResponse {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(verified: bool, message: S) -> Self {
        Self { status: ResponseStatus::Success, verified: Some(verified), message: message.to_string() }
    }

    pub fn failure<S: Display>(status: ResponseStatus, message: S) -> Self {
        Self { status, verified: None, message: message.to_string() }
    }
}

impl From<&ReconciliationResult> for JsonResponse {
    fn from(result: &ReconciliationResult) -> Self {
        match (result.disposition, result.verified) {
            (Disposition::Deferred, verified) => Self::success(verified, DEFERRED_MESSAGE),
            (_, true) => Self::success(true, VERIFIED_MESSAGE),
            (_, false) => Self::success(false, UNVERIFIED_MESSAGE),
        }
    }
}

/// Returned when a new service request has been stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestCreated {
    pub status: ResponseStatus,
    #[serde(rename = "formId")]
    pub form_id: String,
}

impl RequestCreated {
    pub fn new(form_id: String) -> Self {
        Self { status: ResponseStatus::Success, form_id }
    }
}
