use axum::routing::{get, post, put};
use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, security_headers};
use crate::handlers::{
    addresses, admin, cart, exhibitions, health_check, orders, products, ratings, users,
};
use crate::AppState;

pub fn create_routes(state: AppState) -> Router {
    let api = Router::new()
        .nest("/user", user_routes())
        .nest("/admin", admin_routes())
        .nest("/product", product_routes())
        .nest("/cart", cart_routes())
        .nest("/address", address_routes())
        .nest("/order", order_routes())
        .nest("/rating", rating_routes())
        .nest("/exhibition", exhibition_routes());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(middleware::from_fn(security_headers))
        .layer(create_cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/logout", post(users::logout))
        .route("/is-auth", get(users::is_auth))
        .route("/profile", put(users::update_profile))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin::login))
        .route("/logout", post(admin::logout))
        .route("/status", get(admin::status))
        .route("/tickets", get(admin::all_tickets))
        .route("/ticket-status", post(admin::update_ticket_status))
        .route("/exhibition/status", post(admin::update_exhibition_status))
        .route("/exhibition/delete", post(admin::delete_exhibition))
        .route("/stats", get(admin::stats))
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(products::add))
        .route("/update", put(products::update))
        .route("/remove", post(products::remove))
        .route("/list", get(products::list))
        .route("/single", post(products::single))
        .route("/top-rated", get(products::top_rated))
        .route("/search", get(products::search))
}

fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/get", post(cart::get))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(addresses::add))
        .route("/list", get(addresses::list))
        .route("/update", put(addresses::update))
        .route("/delete", post(addresses::delete))
        .route("/default", post(addresses::set_default))
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/place", post(orders::place))
        .route("/userorders", post(orders::user_orders))
        .route("/list", get(orders::all_orders))
        .route("/status", post(orders::update_status))
        .route("/single", post(orders::single))
}

fn rating_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(ratings::add))
        .route("/get", post(ratings::for_product))
        .route("/user", post(ratings::user_rating))
        .route("/can-rate", post(ratings::can_rate))
        .route("/delete", post(ratings::delete))
}

fn exhibition_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(exhibitions::add))
        .route("/update", put(exhibitions::update))
        .route("/current", get(exhibitions::current_month))
        .route("/single", post(exhibitions::single))
        .route("/purchase", post(exhibitions::purchase))
        .route("/tickets", get(exhibitions::my_tickets))
        .route("/list", get(exhibitions::list))
}
