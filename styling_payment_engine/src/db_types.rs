use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

/// The value stored in the ledger's `signature` column when the callback carried no signature.
pub const MISSING_SIGNATURE: &str = "missing";

#[derive(Debug, Clone, Error)]
#[error("Invalid value: {0}")]
pub struct ConversionError(String);

//--------------------------------------       FormType        ---------------------------------------------------------
/// The service category a booking request was submitted under. Each category has its own booking collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum FormType {
    CorporateStyling,
    PersonalizedConsultation,
    PhotoshootStyling,
    WeddingStyling,
    MakeupTraining,
    SoftSkills,
}

impl FormType {
    pub const ALL: [FormType; 6] = [
        FormType::CorporateStyling,
        FormType::PersonalizedConsultation,
        FormType::PhotoshootStyling,
        FormType::WeddingStyling,
        FormType::MakeupTraining,
        FormType::SoftSkills,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::CorporateStyling => "corporate_styling",
            FormType::PersonalizedConsultation => "personalized_consultation",
            FormType::PhotoshootStyling => "photoshoot_styling",
            FormType::WeddingStyling => "wedding_styling",
            FormType::MakeupTraining => "makeup_training",
            FormType::SoftSkills => "soft_skills",
        }
    }

    /// The name of the table holding booking records for this service category.
    pub fn collection(&self) -> &'static str {
        match self {
            FormType::CorporateStyling => "corporate_styling_requests",
            FormType::PersonalizedConsultation => "personalized_consultation_requests",
            FormType::PhotoshootStyling => "photoshoot_styling_requests",
            FormType::WeddingStyling => "wedding_styling_requests",
            FormType::MakeupTraining => "makeup_training_requests",
            FormType::SoftSkills => "soft_skills_requests",
        }
    }
}

impl Display for FormType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        FormType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| ConversionError(format!("Unknown form type: {s}")))
    }
}

//--------------------------------------     BookingStatus     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Submitted through the intake form, no payment seen yet.
    Pending,
    /// A payment with a valid gateway signature was recorded against the booking.
    Paid,
    /// A payment was reported, but the signature was missing or invalid. Needs manual review.
    PaymentPendingVerification,
}

impl BookingStatus {
    pub fn for_verification(verified: bool) -> Self {
        if verified {
            BookingStatus::Paid
        } else {
            BookingStatus::PaymentPendingVerification
        }
    }
}

impl Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Paid => write!(f, "paid"),
            BookingStatus::PaymentPendingVerification => write!(f, "payment_pending_verification"),
        }
    }
}

//--------------------------------------     LedgerStatus      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum LedgerStatus {
    Verified,
    RequiresVerification,
}

impl From<bool> for LedgerStatus {
    fn from(verified: bool) -> Self {
        if verified {
            LedgerStatus::Verified
        } else {
            LedgerStatus::RequiresVerification
        }
    }
}

impl Display for LedgerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerStatus::Verified => write!(f, "verified"),
            LedgerStatus::RequiresVerification => write!(f, "requires_verification"),
        }
    }
}

//-------------------------------------- PaymentVerificationRequest ----------------------------------------------------
/// The payload the client posts after the payment gateway redirects back to the site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentVerificationRequest {
    #[serde(rename = "razorpay_order_id", default)]
    pub order_id: Option<String>,
    #[serde(rename = "razorpay_payment_id", default)]
    pub payment_id: Option<String>,
    #[serde(rename = "razorpay_signature", default)]
    pub signature: Option<String>,
    #[serde(rename = "formId", default)]
    pub form_id: Option<String>,
    #[serde(rename = "formType", default)]
    pub form_type: Option<String>,
}

impl PaymentVerificationRequest {
    pub fn new<S: Into<String>>(order_id: S, payment_id: S) -> Self {
        Self { order_id: Some(order_id.into()), payment_id: Some(payment_id.into()), ..Default::default() }
    }

    pub fn with_signature<S: Into<String>>(mut self, signature: S) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn with_form<S: Into<String>>(mut self, form_id: S, form_type: Option<FormType>) -> Self {
        self.form_id = Some(form_id.into());
        self.form_type = form_type.map(|t| t.to_string());
        self
    }

    /// Returns the order and payment ids, if both are present and not blank.
    pub fn correlation_ids(&self) -> Option<(&str, &str)> {
        let order_id = self.order_id.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let payment_id = self.payment_id.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some((order_id, payment_id))
    }

    pub fn form_id(&self) -> Option<&str> {
        self.form_id.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

//--------------------------------------     BookingRecord     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: String,
    pub customer_name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Free-form form details, stored as a JSON document.
    pub details: Option<String>,
    pub status: BookingStatus,
    pub payment_id: Option<String>,
    pub order_id: Option<String>,
    pub payment_verified: bool,
    pub payment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A service request as submitted through one of the intake forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookingRequest {
    pub customer_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl NewBookingRequest {
    pub fn new<S: Into<String>>(customer_name: S, email: S) -> Self {
        Self { customer_name: customer_name.into(), email: email.into(), phone: None, details: None }
    }
}

/// The payment fields written to a booking record once a payment callback has been verified (or not).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingPaymentUpdate {
    pub form_type: FormType,
    pub form_id: String,
    pub order_id: String,
    pub payment_id: String,
    pub verified: bool,
}

impl BookingPaymentUpdate {
    pub fn status(&self) -> BookingStatus {
        BookingStatus::for_verification(self.verified)
    }
}

//--------------------------------------  PaymentLedgerEntry   ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLedgerEntry {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
    pub status: LedgerStatus,
    pub verified: bool,
    pub form_id: Option<String>,
    pub form_type: Option<FormType>,
}

impl NewLedgerEntry {
    pub fn new(order_id: &str, payment_id: &str, signature: Option<&str>, verified: bool) -> Self {
        Self {
            order_id: order_id.to_string(),
            payment_id: payment_id.to_string(),
            signature: signature.unwrap_or(MISSING_SIGNATURE).to_string(),
            status: LedgerStatus::from(verified),
            verified,
            form_id: None,
            form_type: None,
        }
    }

    pub fn with_form(mut self, form_id: Option<&str>, form_type: Option<FormType>) -> Self {
        self.form_id = form_id.map(String::from);
        self.form_type = form_type;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLedgerEntry {
    pub id: i64,
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
    pub status: LedgerStatus,
    pub verified: bool,
    pub form_id: Option<String>,
    pub form_type: Option<FormType>,
    pub created_at: DateTime<Utc>,
}

pub enum InsertLedgerResult {
    Inserted(PaymentLedgerEntry),
    AlreadyExists(PaymentLedgerEntry),
}

//--------------------------------------    FallbackRecord     ---------------------------------------------------------
/// A verification attempt that could not be persisted through the primary path. Written as-is so that it can be
/// reconciled by hand.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackVerificationRecord {
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub signature: Option<String>,
    pub form_id: Option<String>,
    pub form_type: Option<String>,
    pub verified: bool,
    pub error: String,
    pub created_at: DateTime<Utc>,
}

impl FallbackVerificationRecord {
    pub fn new(request: &PaymentVerificationRequest, verified: bool, error: String) -> Self {
        Self {
            order_id: request.order_id.clone(),
            payment_id: request.payment_id.clone(),
            signature: request.signature.clone(),
            form_id: request.form_id.clone(),
            form_type: request.form_type.clone(),
            verified,
            error,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn form_type_parsing() {
        assert_eq!("wedding_styling".parse::<FormType>().unwrap(), FormType::WeddingStyling);
        assert_eq!(" Soft-Skills ".parse::<FormType>().unwrap(), FormType::SoftSkills);
        assert!("bridal".parse::<FormType>().is_err());
        for t in FormType::ALL {
            assert_eq!(t.to_string().parse::<FormType>().unwrap(), t);
        }
    }

    #[test]
    fn verification_request_wire_format() {
        let json = r#"{"razorpay_order_id":"O1","razorpay_payment_id":"P1","formId":"abc123","formType":"wedding_styling"}"#;
        let req: PaymentVerificationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.correlation_ids(), Some(("O1", "P1")));
        assert_eq!(req.signature, None);
        assert_eq!(req.form_id(), Some("abc123"));
        assert_eq!(req.form_type.as_deref(), Some("wedding_styling"));
    }

    #[test]
    fn blank_ids_are_missing() {
        let req = PaymentVerificationRequest::new("O1", "   ");
        assert_eq!(req.correlation_ids(), None);
        let req = PaymentVerificationRequest { order_id: Some("O1".into()), ..Default::default() };
        assert_eq!(req.correlation_ids(), None);
    }

    #[test]
    fn ledger_entry_records_missing_signature() {
        let entry = NewLedgerEntry::new("O1", "P1", None, false);
        assert_eq!(entry.signature, MISSING_SIGNATURE);
        assert_eq!(entry.status, LedgerStatus::RequiresVerification);
        assert_eq!(BookingStatus::for_verification(true).to_string(), "paid");
        assert_eq!(BookingStatus::for_verification(false).to_string(), "payment_pending_verification");
    }
}
