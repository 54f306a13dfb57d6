use std::{future::Future, pin::Pin, time::Duration};

use actix_web::{
    dev::Server,
    error::{InternalError, JsonPayloadError, PathError},
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    HttpRequest,
    HttpServer,
    ResponseError,
};
use log::*;
use storefront_engine::{
    events::{EventHandlers, EventHooks, EventProducers, OrderPlacedEvent, StatusChangedEvent},
    CartApi,
    CatalogApi,
    CheckoutApi,
    SqliteDatabase,
    TrackingApi,
};

use crate::{
    config::ServerConfig,
    errors::{set_dev_mode, ServerError},
    routes::{
        health,
        AddToCartRoute,
        AddTrackingRoute,
        CartRoute,
        CheckoutCartRoute,
        ClientOrdersRoute,
        OrderDetailsRoute,
        OrderStatusesRoute,
        PaymentMethodsRoute,
        PlaceOrderRoute,
        ProductRoute,
        RemoveCartItemRoute,
        TrackingRoute,
    },
};

const HOOK_BUFFER_SIZE: usize = 25;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_settings(&config.database_url, config.db_settings)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.run_migrations {
        db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
        info!("🚀️ Database migrations are up to date");
    }
    set_dev_mode(config.dev_mode);
    let handlers = EventHandlers::new(HOOK_BUFFER_SIZE, logging_hooks());
    let producers = handlers.producers();
    handlers.start_handlers();
    info!("🚀️ Order status transitions are {}", config.transition_policy);
    let srv = create_server_instance(config, db.clone(), producers)?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));
    db.close().await;
    result
}

/// Hooks that write order lifecycle events to the log.
pub fn logging_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks
        .on_order_placed(|ev: OrderPlacedEvent| {
            Box::pin(async move {
                info!("📬️ Order #{} placed by client #{} for {}", ev.order.id, ev.order.client_id, ev.order.total);
            }) as Pin<Box<dyn Future<Output = ()> + Send>>
        })
        .on_status_changed(|ev: StatusChangedEvent| {
            Box::pin(async move {
                info!("📬️ Order #{} is now in status {}", ev.event.order_id, ev.event.status_id);
            }) as Pin<Box<dyn Future<Output = ()> + Send>>
        });
    hooks
}

/// Malformed JSON bodies are client errors, reported in the same shape as every other error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        let server_error = ServerError::InvalidRequestBody(err.to_string());
        let response = server_error.error_response();
        InternalError::from_response(err, response).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _req: &HttpRequest| {
        let server_error = ServerError::InvalidRequestPath(err.to_string());
        let response = server_error.error_response();
        InternalError::from_response(err, response).into()
    })
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let checkout_api =
            CheckoutApi::new(db.clone(), producers.clone()).with_rules(config.checkout_rules);
        let tracking_api =
            TrackingApi::new(db.clone(), producers.clone()).with_policy(config.transition_policy);
        let cart_api = CartApi::new(db.clone()).with_max_line_quantity(config.checkout_rules.max_line_quantity);
        let catalog_api = CatalogApi::new(db.clone());
        let api_scope = web::scope("/api")
            .service(PlaceOrderRoute::<SqliteDatabase>::new())
            .service(ClientOrdersRoute::<SqliteDatabase>::new())
            .service(OrderDetailsRoute::<SqliteDatabase>::new())
            .service(AddTrackingRoute::<SqliteDatabase>::new())
            .service(TrackingRoute::<SqliteDatabase>::new())
            .service(AddToCartRoute::<SqliteDatabase>::new())
            .service(RemoveCartItemRoute::<SqliteDatabase>::new())
            .service(CheckoutCartRoute::<SqliteDatabase>::new())
            .service(CartRoute::<SqliteDatabase>::new())
            .service(ProductRoute::<SqliteDatabase>::new())
            .service(OrderStatusesRoute::<SqliteDatabase>::new())
            .service(PaymentMethodsRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("sf::access_log"))
            .app_data(json_config())
            .app_data(path_config())
            .app_data(web::Data::new(checkout_api))
            .app_data(web::Data::new(tracking_api))
            .app_data(web::Data::new(cart_api))
            .app_data(web::Data::new(catalog_api))
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
