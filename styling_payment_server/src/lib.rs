//! # Styling booking payment server
//! This crate hosts the HTTP server for the styling booking site's payment flow. It is responsible for:
//! * Receiving payment confirmations from the checkout page after the customer has paid.
//! * Handing them to the [`styling_payment_engine`] for signature verification and reconciliation against the booking.
//! * Sending payment confirmation emails in the background.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/payment/verify`: Payment gateway callbacks.
//! * `/api/payments/{order_id}`: The payment ledger for a gateway order.
//! * `/api/requests/{form_type}`: New service requests from the intake forms.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod notifier;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
