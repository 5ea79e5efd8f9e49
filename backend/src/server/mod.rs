//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, Storage};

use state_builders::{AppState, build_app_state};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, HttpServer, web};
use mockable::DefaultClock;
use tracing::info;

use twitter_api::Trace;
#[cfg(debug_assertions)]
use twitter_api::doc::ApiDoc;
use twitter_api::domain::Error;
use twitter_api::inbound::http::ApiResult;
use twitter_api::inbound::http::health::{HealthState, live, ready};
use twitter_api::inbound::http::state::HttpState;
use twitter_api::inbound::http::tweets::{
    delete_tweet, get_tweet, list_tweets, post_tweet, update_tweet,
};
use twitter_api::inbound::http::users::{
    delete_user, get_user, list_users, login, signup, update_user,
};
use twitter_api::inbound::http::validation::json_error_handler;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

async fn unknown_route() -> ApiResult<HttpResponse> {
    Err(Error::not_found("no such route"))
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .service(signup)
        .service(login)
        .service(list_users)
        .service(get_user)
        .service(update_user)
        .service(delete_user)
        .service(list_tweets)
        .service(post_tweet)
        .service(get_tweet)
        .service(update_tweet)
        .service(delete_tweet)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.default_service(web::to(unknown_route))
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Every collection is opened and probed before the listener binds. The
/// opened collections are then handed to the health state, which re-probes
/// them on each readiness request.
///
/// # Errors
/// Propagates [`std::io::Error`] when a collection cannot be opened, or when
/// binding the socket fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig { bind_addr, storage } = config;
    let AppState { http, collections } =
        build_app_state(&storage, Arc::new(DefaultClock)).await?;
    let http_state = web::Data::new(http);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready(collections);
    info!(%bind_addr, ?storage, "server listening");
    Ok(server)
}
