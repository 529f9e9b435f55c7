//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Each worker thread processes its requests sequentially, so a handler that blocks the thread stalls every request on
//! that worker. Storage retries in particular back off with an async sleep, never `std::thread::sleep`, so that other
//! payment callbacks keep being served while one of them waits.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use styling_payment_engine::{
    db_types::{FormType, NewBookingRequest, PaymentVerificationRequest},
    traits::{BookingManagement, FallbackSink, PaymentLedger},
    BookingApi,
    Disposition,
    ReconciliationApi,
};

use crate::{
    data_objects::{JsonResponse, RequestCreated},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Payments  ----------------------------------------------------
route!(verify_payment => Post "/payment/verify" impl PaymentLedger, FallbackSink);
/// Route handler for payment gateway callbacks.
///
/// The checkout page posts the gateway's order id, payment id and signature here once the customer has paid, along
/// with the booking (`formId`, `formType`) the payment is for.
///
/// * `200` - the payment was recorded. `verified` says whether the signature checked out.
/// * `202` - the signature checked out, but the payment could not be recorded. It has been set aside for manual
///   processing.
/// * `400` - the order id or payment id is missing.
/// * `500` - an unverified payment could not be recorded.
pub async fn verify_payment<B, F>(
    body: web::Json<PaymentVerificationRequest>,
    api: web::Data<ReconciliationApi<B, F>>,
) -> Result<HttpResponse, ServerError>
where
    B: PaymentLedger,
    F: FallbackSink,
{
    let request = body.into_inner();
    debug!("💻️ POST payment verification for order {:?}", request.order_id);
    let result = api.reconcile(request).await?;
    let response = JsonResponse::from(&result);
    match result.disposition {
        Disposition::Deferred => Ok(HttpResponse::Accepted().json(response)),
        Disposition::Recorded | Disposition::Replayed => Ok(HttpResponse::Ok().json(response)),
    }
}

route!(ledger_for_order => Get "/payments/{order_id}" impl PaymentLedger, FallbackSink);
/// Lists every verification attempt recorded against a gateway order id, oldest first.
pub async fn ledger_for_order<B, F>(
    path: web::Path<String>,
    api: web::Data<ReconciliationApi<B, F>>,
) -> Result<HttpResponse, ServerError>
where
    B: PaymentLedger,
    F: FallbackSink,
{
    let order_id = path.into_inner();
    debug!("💻️ GET ledger entries for order {order_id}");
    let entries = api.ledger_entries_for_order(&order_id).await?;
    Ok(HttpResponse::Ok().json(entries))
}

//----------------------------------------------   Requests  ----------------------------------------------------
route!(submit_request => Post "/requests/{form_type}" impl BookingManagement);
pub async fn submit_request<B: BookingManagement>(
    path: web::Path<String>,
    body: web::Json<NewBookingRequest>,
    api: web::Data<BookingApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let form_type = path.into_inner().parse::<FormType>().map_err(|e| {
        debug!("💻️ Service request for an unknown form type. {e}");
        ServerError::InvalidRequestPath(e.to_string())
    })?;
    debug!("💻️ POST new {form_type} request");
    let booking = api.submit_request(form_type, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(RequestCreated::new(booking.id)))
}
