use std::time::Duration;

use actix_web::{dev::Server, error::JsonPayloadError, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use styling_payment_engine::{
    events::{EventHandlers, EventProducers},
    helpers::SignatureVerifier,
    routing::CollectionRouter,
    BookingApi,
    FallbackStore,
    JsonLinesFallbackSink,
    ReconciliationApi,
    SqliteDatabase,
};

use crate::{
    config::{ServerConfig, NOTIFICATION_QUEUE_SIZE},
    errors::ServerError,
    notifier::notification_hooks,
    routes::{health, LedgerForOrderRoute, SubmitRequestRoute, VerifyPaymentRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_db_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let verifier = SignatureVerifier::new(config.payment_secret.clone())
        .map_err(|e| ServerError::ConfigurationError(e.to_string()))?;
    let hooks = notification_hooks(&config.notifications)?;
    let handlers = EventHandlers::new(NOTIFICATION_QUEUE_SIZE, config.notifications.timeout, hooks);
    let producers = handlers.producers();
    let workers = handlers.start_handlers().await;
    let fallback = match &config.fallback_path {
        Some(path) => FallbackStore::File(JsonLinesFallbackSink::new(path)),
        None => FallbackStore::Database(db.clone()),
    };
    let drain_timeout = config.notifications.timeout.saturating_mul(2);

    let srv = create_server_instance(config, db.clone(), fallback, verifier, producers)?;
    let result = srv.await;
    info!("🚀️ Server has stopped. Shutting down.");
    db.close().await;
    for worker in workers {
        if tokio::time::timeout(drain_timeout, worker).await.is_err() {
            warn!("📬️ Notifications were still pending at shutdown. They have been dropped.");
        }
    }
    result.map_err(ServerError::from)
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    fallback: FallbackStore,
    verifier: SignatureVerifier,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let router = CollectionRouter::new(config.default_form_type);
    let retry_policy = config.retry_policy;
    let srv = HttpServer::new(move || {
        let reconciliation_api =
            ReconciliationApi::new(db.clone(), fallback.clone(), verifier.clone(), producers.clone())
                .with_router(router)
                .with_retry_policy(retry_policy);
        let booking_api = BookingApi::new(db.clone());
        let api_scope = web::scope("/api")
            .service(VerifyPaymentRoute::<SqliteDatabase, FallbackStore>::new())
            .service(LedgerForOrderRoute::<SqliteDatabase, FallbackStore>::new())
            .service(SubmitRequestRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("sbp::access_log"))
            .app_data(json_config())
            .app_data(web::Data::new(reconciliation_api))
            .app_data(web::Data::new(booking_api))
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Malformed JSON bodies get the same `{status, message}` error body as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req| {
        debug!("💻️ Could not deserialize request body. {err}");
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}
