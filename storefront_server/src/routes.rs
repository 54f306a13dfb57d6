//! Request handler definitions
//!
//! Define each route and its handler here. Handlers should only translate between HTTP and the engine APIs. Any
//! business rule belongs in `storefront_engine`.
//!
//! All API routes are mounted under `/api`:
//!
//! | Method | Path                         | Handler              |
//! |--------|------------------------------|----------------------|
//! | POST   | `/orders`                    | [`place_order`]      |
//! | GET    | `/orders/{id}/details`       | [`order_details`]    |
//! | GET    | `/orders/client/{clientId}`  | [`client_orders`]    |
//! | POST   | `/tracking`                  | [`add_tracking`]     |
//! | GET    | `/tracking/{orderId}`        | [`tracking`]         |
//! | GET    | `/cart/{clientId}`           | [`cart`]             |
//! | POST   | `/cart`                      | [`add_to_cart`]      |
//! | DELETE | `/cart/item/{id}`            | [`remove_cart_item`] |
//! | POST   | `/cart/{clientId}/checkout`  | [`checkout_cart`]    |
//! | GET    | `/products/{id}`             | [`product`]          |
//! | GET    | `/order_statuses`            | [`order_statuses`]   |
//! | GET    | `/payment_methods`           | [`payment_methods`]  |
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every handler here awaits the engine, which awaits the database, so
//! none of them block.
use actix_web::{get, http::StatusCode, web, HttpResponse, Responder};
use log::*;
use storefront_engine::{
    db_types::{NewCartLine, NewTrackingEvent},
    order_objects::{OrderRequest, PlacedOrder},
    CartApi,
    CartManagement,
    CatalogApi,
    CatalogManagement,
    CheckoutApi,
    OrderManagement,
    TrackingApi,
    TrackingManagement,
    ValidationError,
};

use crate::{
    data_objects::{AddToCartParams, AddTrackingParams, CheckoutParams, PlaceOrderParams},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:path),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<B>(core::marker::PhantomData<fn() -> B>);}
        paste::paste! { impl<B> [<$name:camel Route>]<B> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> B>)
            }
        }}
        paste::paste! { impl<B> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<B>
        where
            B: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<B>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

fn placed_response(placed: PlacedOrder) -> HttpResponse {
    // A replayed idempotent request did not create anything
    let status = if placed.created { StatusCode::CREATED } else { StatusCode::OK };
    HttpResponse::build(status).json(placed.order)
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(place_order => Post "/orders" impl OrderManagement);
/// Places an order at the prices the customer saw.
///
/// Returns 201 with the new order, or 200 with the original order when an idempotency key is replayed.
pub async fn place_order<B: OrderManagement>(
    api: web::Data<CheckoutApi<B>>,
    body: web::Json<PlaceOrderParams>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received place order request");
    let request = OrderRequest::try_from(body.into_inner())?;
    let placed = api.place_order(request).await?;
    Ok(placed_response(placed))
}

route!(order_details => Get "/orders/{order_id}/details" impl OrderManagement, TrackingManagement);
pub async fn order_details<B: OrderManagement + TrackingManagement>(
    path: web::Path<i64>,
    api: web::Data<TrackingApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    trace!("💻️ Received details request for order #{order_id}");
    let details = api.order_details(order_id).await?;
    Ok(HttpResponse::Ok().json(details))
}

route!(client_orders => Get "/orders/client/{client_id}" impl OrderManagement);
pub async fn client_orders<B: OrderManagement>(
    path: web::Path<i64>,
    api: web::Data<CheckoutApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let client_id = path.into_inner();
    trace!("💻️ Received order listing request for client #{client_id}");
    let orders = api.orders_for_client(client_id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

//----------------------------------------------   Tracking  ----------------------------------------------------
route!(add_tracking => Post "/tracking" impl TrackingManagement);
pub async fn add_tracking<B: TrackingManagement>(
    api: web::Data<TrackingApi<B>>,
    body: web::Json<AddTrackingParams>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received tracking event");
    let event = NewTrackingEvent::try_from(body.into_inner())?;
    let event = api.add_tracking_event(event).await?;
    Ok(HttpResponse::Created().json(event))
}

route!(tracking => Get "/tracking/{order_id}" impl TrackingManagement);
/// The tracking history of an order, oldest first. Unknown orders have an empty history.
pub async fn tracking<B: TrackingManagement>(
    path: web::Path<i64>,
    api: web::Data<TrackingApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    trace!("💻️ Received tracking request for order #{order_id}");
    let entries = api.tracking_for_order(order_id).await?;
    Ok(HttpResponse::Ok().json(entries))
}

//----------------------------------------------   Cart  ----------------------------------------------------
route!(cart => Get "/cart/{client_id}" impl CartManagement);
pub async fn cart<B: CartManagement>(
    path: web::Path<i64>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let client_id = path.into_inner();
    trace!("💻️ Received cart request for client #{client_id}");
    let cart = api.cart_for_client(client_id).await?;
    Ok(HttpResponse::Ok().json(cart))
}

route!(add_to_cart => Post "/cart" impl CartManagement);
pub async fn add_to_cart<B: CartManagement>(
    api: web::Data<CartApi<B>>,
    body: web::Json<AddToCartParams>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received add to cart request");
    let line = NewCartLine::try_from(body.into_inner())?;
    let line = api.add_to_cart(line).await?;
    Ok(HttpResponse::Created().json(line))
}

route!(remove_cart_item => Delete "/cart/item/{line_id}" impl CartManagement);
pub async fn remove_cart_item<B: CartManagement>(
    path: web::Path<i64>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let line_id = path.into_inner();
    trace!("💻️ Received request to remove cart line #{line_id}");
    api.remove_line(line_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

route!(checkout_cart => Post "/cart/{client_id}/checkout" impl OrderManagement, CartManagement);
/// Orders everything in the client's cart at the current catalog prices.
pub async fn checkout_cart<B: OrderManagement + CartManagement>(
    path: web::Path<i64>,
    api: web::Data<CheckoutApi<B>>,
    body: web::Json<CheckoutParams>,
) -> Result<HttpResponse, ServerError> {
    let client_id = path.into_inner();
    trace!("💻️ Received checkout request for client #{client_id}");
    let CheckoutParams { payment_method_id, idempotency_key } = body.into_inner();
    let payment_method_id =
        payment_method_id.ok_or_else(|| ValidationError::new("paymentMethodId", "This field is required"))?;
    let placed = api.checkout_cart(client_id, payment_method_id, idempotency_key).await?;
    Ok(placed_response(placed))
}

//----------------------------------------------   Catalog  ----------------------------------------------------
route!(product => Get "/products/{product_id}" impl CatalogManagement);
pub async fn product<B: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product = api.product(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

route!(order_statuses => Get "/order_statuses" impl CatalogManagement);
pub async fn order_statuses<B: CatalogManagement>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError> {
    let statuses = api.order_statuses().await?;
    Ok(HttpResponse::Ok().json(statuses))
}

route!(payment_methods => Get "/payment_methods" impl CatalogManagement);
pub async fn payment_methods<B: CatalogManagement>(
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let methods = api.payment_methods().await?;
    Ok(HttpResponse::Ok().json(methods))
}
