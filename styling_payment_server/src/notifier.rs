//! Payment confirmation emails.
//!
//! The email service is reached over HTTP. Each confirmed payment is posted to it as
//! `{ "formType": ..., "purpose": "payment", "data": <booking> }`. Failures are logged and otherwise ignored: by the
//! time a notification is sent, the payment has been recorded and the customer has had their response.
use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use log::*;
use reqwest::Client;
use styling_payment_engine::events::{EventHooks, PaymentConfirmedEvent};
use thiserror::Error;

use crate::{config::NotificationConfig, errors::ServerError};

#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Could not initialize the notification client: {0}")]
    Initialization(String),
    #[error("Could not reach the notification service: {0}")]
    RequestError(String),
    #[error("The notification service rejected the request. Error {status}. {message}")]
    Rejected { status: u16, message: String },
}

#[derive(Clone)]
pub struct EmailNotifier {
    url: String,
    client: Arc<Client>,
}

impl EmailNotifier {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, NotificationError> {
        let client =
            Client::builder().timeout(timeout).build().map_err(|e| NotificationError::Initialization(e.to_string()))?;
        Ok(Self { url: url.to_string(), client: Arc::new(client) })
    }

    pub async fn notify(&self, event: &PaymentConfirmedEvent) -> Result<(), NotificationError> {
        trace!("📧️ Posting payment confirmation for booking {} to {}", event.booking.id, self.url);
        let response = self
            .client
            .post(&self.url)
            .json(event)
            .send()
            .await
            .map_err(|e| NotificationError::RequestError(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            info!("📧️ Payment confirmation for booking {} sent ({status})", event.booking.id);
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(NotificationError::Rejected { status: status.as_u16(), message })
        }
    }
}

/// Builds the event hooks that send payment confirmation emails.
///
/// With no notification URL configured, confirmed payments are only logged.
pub fn notification_hooks(config: &NotificationConfig) -> Result<EventHooks, ServerError> {
    let mut hooks = EventHooks::default();
    match &config.url {
        Some(url) => {
            let notifier = EmailNotifier::new(url, config.timeout)
                .map_err(|e| ServerError::InitializeError(e.to_string()))?;
            info!("📧️ Payment confirmations will be posted to {url}");
            hooks.on_payment_confirmed(move |ev| {
                let notifier = notifier.clone();
                Box::pin(async move {
                    if let Err(e) = notifier.notify(&ev).await {
                        warn!("📧️ Payment confirmation for booking {} was not sent. {e}", ev.booking.id);
                    }
                }) as Pin<Box<dyn Future<Output = ()> + Send>>
            });
        },
        None => {
            hooks.on_payment_confirmed(|ev| {
                Box::pin(async move {
                    info!(
                        "📧️ Booking {} ({}) is paid. No notification service is configured, so no email was sent.",
                        ev.booking.id, ev.form_type
                    );
                }) as Pin<Box<dyn Future<Output = ()> + Send>>
            });
        },
    }
    Ok(hooks)
}
