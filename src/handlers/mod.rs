mod auth;
mod carts;
mod menu;
mod payments;
mod stats;
mod users;

pub use auth::*;
pub use carts::*;
pub use menu::*;
pub use payments::*;
pub use stats::*;
pub use users::*;

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::AppState;
use crate::middleware::{require_admin, require_auth};

async fn root() -> &'static str {
    "Bistro server is running..."
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let mut public = Router::new()
        .route("/", get(root))
        .route("/jwt", post(issue_token))
        .route("/users", post(create_user))
        .route("/carts", get(list_cart).post(add_to_cart))
        .route("/carts/{id}", delete(remove_from_cart))
        .route("/menu", get(list_menu))
        .route("/menu/{id}", get(get_menu_item))
        .route("/reviews", get(list_reviews))
        .route("/create-payment-intent", post(create_payment_intent))
        .route("/payments-info", post(record_payment));

    let authenticated = Router::new()
        .route("/users/admin/{email}", get(check_admin))
        .route("/payments", get(list_payments))
        .route("/payments/{id}", delete(delete_payment))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let mut admin = Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", delete(delete_user).patch(make_admin))
        .route("/menu", post(create_menu_item))
        .route(
            "/menu/{id}",
            patch(patch_menu_item)
                .put(put_menu_item)
                .delete(delete_menu_item),
        )
        .route("/admin-stats", get(admin_stats));

    if state.policy.order_stats_admin_only {
        admin = admin.route("/order-stats", get(order_stats));
    } else {
        public = public.route("/order-stats", get(order_stats));
    }

    let admin = admin.route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    public
        .merge(authenticated)
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
