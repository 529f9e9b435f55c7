use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{
        BookingPaymentUpdate,
        BookingRecord,
        FallbackVerificationRecord,
        FormType,
        NewLedgerEntry,
        PaymentLedgerEntry,
        PaymentVerificationRequest,
    },
    events::{EventProducers, PaymentConfirmedEvent},
    helpers::SignatureVerifier,
    routing::CollectionRouter,
    spe_api::{
        errors::ReconciliationError,
        reconciliation_objects::{Disposition, ReconciliationResult},
        retry::RetryPolicy,
    },
    traits::{FallbackSink, PaymentLedger},
};

/// `ReconciliationApi` handles payment confirmations posted back by the client after checkout.
///
/// For every callback it
/// 1. checks the gateway signature,
/// 2. records the attempt in the payment ledger and writes the payment fields to the booking, retrying on storage
///    failure and writing to the fallback sink if every attempt fails,
/// 3. publishes a [`PaymentConfirmedEvent`] for verified payments against an existing booking.
///
/// Notification hooks run in the background. Nothing in this API waits for them.
pub struct ReconciliationApi<B, F> {
    db: B,
    fallback: F,
    verifier: SignatureVerifier,
    router: CollectionRouter,
    retry_policy: RetryPolicy,
    producers: EventProducers,
}

impl<B, F> Debug for ReconciliationApi<B, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReconciliationApi ({:?}, {:?})", self.router, self.retry_policy)
    }
}

impl<B, F> ReconciliationApi<B, F> {
    pub fn new(db: B, fallback: F, verifier: SignatureVerifier, producers: EventProducers) -> Self {
        Self {
            db,
            fallback,
            verifier,
            router: CollectionRouter::default(),
            retry_policy: RetryPolicy::default(),
            producers,
        }
    }

    pub fn with_router(mut self, router: CollectionRouter) -> Self {
        self.router = router;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    fn notify_payment_confirmed(&self, form_type: FormType, booking: &BookingRecord) {
        if self.producers.payment_confirmed_producer.is_empty() {
            debug!("💳️ No payment notification hooks are registered");
            return;
        }
        for producer in &self.producers.payment_confirmed_producer {
            debug!("💳️ Queueing payment notification for booking {}", booking.id);
            let event = PaymentConfirmedEvent::new(form_type, booking.clone());
            producer.try_publish_event(event);
        }
    }
}

impl<B, F> ReconciliationApi<B, F>
where B: PaymentLedger
{
    /// Fetches the ledger entries recorded against a gateway order id.
    pub async fn ledger_entries_for_order(&self, order_id: &str) -> Result<Vec<PaymentLedgerEntry>, ReconciliationError> {
        let entries = self.db.fetch_ledger_entries_for_order(order_id).await?;
        Ok(entries)
    }
}

impl<B, F> ReconciliationApi<B, F>
where
    B: PaymentLedger,
    F: FallbackSink,
{
    /// Verifies and records a payment callback.
    ///
    /// Errors are only returned when the request lacks its order or payment id, or when an unverified payment could
    /// not be recorded at all. A verified payment that could not be recorded is written to the fallback sink and
    /// reported as [`Disposition::Deferred`]: the gateway has already taken the customer's money, so the customer is
    /// told it was accepted.
    pub async fn reconcile(
        &self,
        request: PaymentVerificationRequest,
    ) -> Result<ReconciliationResult, ReconciliationError> {
        let (order_id, payment_id) = request.correlation_ids().ok_or_else(|| {
            debug!("💳️ Payment callback is missing its order or payment id. {request:?}");
            ReconciliationError::MissingParameters
        })?;
        let signature = request.signature.as_deref();
        let verified = self.verifier.verify(order_id, payment_id, signature);
        if verified {
            info!("💳️ Payment {payment_id} for order {order_id} is verified");
        } else {
            warn!("💳️ Payment {payment_id} for order {order_id} could not be verified. It will need manual review.");
        }

        let form_id = request.form_id();
        let requested_form_type = request.form_type.as_deref().and_then(|s| s.parse::<FormType>().ok());
        let form_type = form_id.and_then(|_| self.router.route_raw(request.form_type.as_deref()));
        let update = match (form_id, form_type) {
            (Some(form_id), Some(form_type)) => Some(BookingPaymentUpdate {
                form_type,
                form_id: form_id.to_string(),
                order_id: order_id.to_string(),
                payment_id: payment_id.to_string(),
                verified,
            }),
            (Some(form_id), None) => {
                warn!("💳️ Booking {form_id} has no routable form type. The booking will not be updated.");
                None
            },
            (None, _) => None,
        };
        let entry = NewLedgerEntry::new(order_id, payment_id, signature, verified).with_form(form_id, requested_form_type);

        let db = &self.db;
        let recorded = self
            .retry_policy
            .run("Recording payment verification", || {
                let entry = entry.clone();
                let update = update.clone();
                async move { db.record_verification(entry, update).await }
            })
            .await;

        let recorded = match recorded {
            Ok(recorded) => recorded,
            Err(e) => {
                let record = FallbackVerificationRecord::new(&request, verified, e.to_string());
                self.write_fallback(&record).await;
                return if verified {
                    warn!("💳️ Payment {payment_id} is verified but could not be recorded. Deferring to manual processing.");
                    Ok(ReconciliationResult::deferred(verified, form_type))
                } else {
                    error!("💳️ Unverified payment {payment_id} could not be recorded. {e}");
                    Err(ReconciliationError::StorageFailure(e.to_string()))
                };
            },
        };

        if recorded.replayed {
            info!(
                "💳️ Payment {payment_id} for order {order_id} was already recorded as ledger entry #{}",
                recorded.entry.id
            );
            if let (Some(form_id), None) = (form_id, recorded.entry.form_id.as_deref()) {
                warn!(
                    "💳️ Replayed payment {payment_id} names booking {form_id}, but ledger entry #{} does not. The \
                     booking was not updated and needs manual reconciliation.",
                    recorded.entry.id
                );
            }
            return Ok(ReconciliationResult {
                verified: recorded.entry.verified,
                disposition: Disposition::Replayed,
                form_type,
                booking: recorded.booking,
            });
        }

        match (&update, &recorded.booking) {
            (Some(u), None) => {
                warn!(
                    "💳️ No {} booking with id {} exists. Payment {payment_id} is recorded in the ledger (#{}) but is \
                     unresolved.",
                    u.form_type, u.form_id, recorded.entry.id
                );
            },
            (Some(u), Some(booking)) if verified => {
                self.notify_payment_confirmed(u.form_type, booking);
            },
            _ => {},
        }
        Ok(ReconciliationResult {
            verified,
            disposition: Disposition::Recorded,
            form_type,
            booking: recorded.booking,
        })
    }

    async fn write_fallback(&self, record: &FallbackVerificationRecord) {
        // Nothing to fall back to from here. Log loudly, and carry on.
        if let Err(e) = self.fallback.write_fallback(record).await {
            error!(
                "💳️ Could not write fallback record for order {:?} / payment {:?}. {e}. Record: {}",
                record.order_id,
                record.payment_id,
                serde_json::to_string(record).unwrap_or_else(|_| format!("{record:?}"))
            );
        }
    }
}
