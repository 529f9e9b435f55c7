use std::{env, path::PathBuf, time::Duration};

use log::*;
use spg_common::Secret;
use styling_payment_engine::{db_types::FormType, RetryPolicy, DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES};

use crate::errors::ServerError;

const DEFAULT_SBP_HOST: &str = "127.0.0.1";
const DEFAULT_SBP_PORT: u16 = 8370;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/styling_bookings.db";
const DEFAULT_MAX_DB_CONNECTIONS: u32 = 25;
const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(5);
/// Capacity of the notification queue. Events published while the queue is full are dropped.
pub const NOTIFICATION_QUEUE_SIZE: usize = 128;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// The SQLite URL for the booking store. The database is the file the URL points to.
    pub database_url: String,
    pub max_db_connections: u32,
    /// The payment gateway key secret. Callback signatures are HMACs under this key.
    pub payment_secret: Secret<String>,
    pub notifications: NotificationConfig,
    pub retry_policy: RetryPolicy,
    /// Where payment updates go when the callback does not name a known form type. `None` leaves the booking alone.
    pub default_form_type: Option<FormType>,
    /// If set, fallback records are appended to this file instead of the database.
    pub fallback_path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct NotificationConfig {
    /// The email service endpoint. If unset, notifications are logged and skipped.
    pub url: Option<String>,
    /// How long a single notification may take before it is abandoned.
    pub timeout: Duration,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { url: None, timeout: DEFAULT_NOTIFICATION_TIMEOUT }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SBP_HOST.to_string(),
            port: DEFAULT_SBP_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_db_connections: DEFAULT_MAX_DB_CONNECTIONS,
            payment_secret: Secret::default(),
            notifications: NotificationConfig::default(),
            retry_policy: RetryPolicy::default(),
            default_form_type: Some(FormType::CorporateStyling),
            fallback_path: None,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from `SBP_*` environment variables.
    ///
    /// Invalid values are logged and replaced with their defaults. The only hard failure is a missing payment secret:
    /// without it, no callback can ever be verified.
    pub fn try_from_env() -> Result<Self, ServerError> {
        Self::try_from_lookup(|name| env::var(name).ok())
    }

    fn try_from_lookup<F>(var: F) -> Result<Self, ServerError>
    where F: Fn(&str) -> Option<String> {
        let payment_secret = Secret::new(var("SBP_PAYMENT_SECRET").unwrap_or_default());
        if payment_secret.is_blank() {
            return Err(ServerError::ConfigurationError(
                "SBP_PAYMENT_SECRET is not set. Set it to the payment gateway's key secret.".into(),
            ));
        }
        let host = var("SBP_HOST").unwrap_or_else(|| DEFAULT_SBP_HOST.into());
        let port = parse_or_default(&var, "SBP_PORT", DEFAULT_SBP_PORT);
        let database_url = var("SBP_DATABASE_URL").unwrap_or_else(|| {
            info!("🪛️ SBP_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.into()
        });
        let max_db_connections = parse_or_default(&var, "SBP_MAX_DB_CONNECTIONS", DEFAULT_MAX_DB_CONNECTIONS);
        let notifications = NotificationConfig {
            url: var("SBP_NOTIFICATION_URL").filter(|s| !s.trim().is_empty()),
            timeout: Duration::from_secs(parse_or_default(
                &var,
                "SBP_NOTIFICATION_TIMEOUT_SECS",
                DEFAULT_NOTIFICATION_TIMEOUT.as_secs(),
            )),
        };
        if notifications.url.is_none() {
            warn!("🪛️ SBP_NOTIFICATION_URL is not set. Payment confirmation emails will not be sent.");
        }
        let retries = parse_or_default(&var, "SBP_STORAGE_RETRIES", DEFAULT_MAX_RETRIES);
        let base_delay = parse_or_default(&var, "SBP_RETRY_BASE_DELAY_MS", DEFAULT_BASE_DELAY.as_millis() as u64);
        let retry_policy = RetryPolicy::new(retries, Duration::from_millis(base_delay));
        let default_form_type = configure_default_form_type(var("SBP_DEFAULT_FORM_TYPE"));
        let fallback_path = var("SBP_FALLBACK_PATH").filter(|s| !s.trim().is_empty()).map(PathBuf::from);
        match &fallback_path {
            Some(p) => info!("🪛️ Fallback records will be written to {}", p.display()),
            None => info!("🪛️ Fallback records will be written to the verification_fallbacks table"),
        }
        Ok(Self {
            host,
            port,
            database_url,
            max_db_connections,
            payment_secret,
            notifications,
            retry_policy,
            default_form_type,
            fallback_path,
        })
    }
}

fn parse_or_default<F, T>(var: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + std::fmt::Display + Copy,
    T::Err: std::fmt::Display,
{
    match var(name) {
        None => default,
        Some(s) => s.trim().parse::<T>().unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
            default
        }),
    }
}

fn configure_default_form_type(value: Option<String>) -> Option<FormType> {
    let Some(s) = value else {
        return Some(FormType::CorporateStyling);
    };
    if ["none", "false", "0", ""].contains(&s.trim().to_lowercase().as_str()) {
        info!(
            "🪛️ Default form type is disabled. Payment callbacks without a recognised form type will not update any \
             booking."
        );
        return None;
    }
    match s.parse::<FormType>() {
        Ok(t) => {
            info!("🪛️ Payment callbacks without a recognised form type will be routed to {t}");
            Some(t)
        },
        Err(e) => {
            warn!("🪛️ {e} in SBP_DEFAULT_FORM_TYPE. Using corporate_styling instead.");
            Some(FormType::CorporateStyling)
        },
    }
}
