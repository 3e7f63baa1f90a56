//! Route-Definitionen fuer die REST-API

use axum::{
    routing::{get, post, put},
    Router,
};
use pokearena_db::repository::{InventoryRepository, UserRepository};

use crate::rest::{handlers, ApiState};

/// Erstellt den vollstaendigen Router
pub fn router<U, I>() -> Router<ApiState<U, I>>
where
    U: UserRepository + 'static,
    I: InventoryRepository + 'static,
{
    Router::new()
        // Auth
        .route("/auth/test", get(handlers::auth::test))
        .route("/auth/register", post(handlers::auth::register::<U, I>))
        .route("/auth/login", post(handlers::auth::login::<U, I>))
        .route("/auth/profile", get(handlers::auth::profile::<U, I>))
        // Inventar
        .route("/pokemon/add", post(handlers::inventar::add_pokemon::<U, I>))
        .route(
            "/inventory/update",
            put(handlers::inventar::update_inventory::<U, I>),
        )
}
