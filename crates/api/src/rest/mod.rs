//! REST-Interface fuer Pokearena

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

use std::sync::Arc;

use pokearena_auth::AuthService;
use pokearena_db::repository::{InventoryRepository, UserRepository};

/// Axum-State fuer den REST-Server
pub struct ApiState<U: UserRepository, I: InventoryRepository> {
    pub auth: Arc<AuthService<U, I>>,
}

impl<U: UserRepository, I: InventoryRepository> ApiState<U, I> {
    pub fn neu(auth: Arc<AuthService<U, I>>) -> Self {
        Self { auth }
    }
}

// Manuell, damit U und I selbst nicht Clone sein muessen
impl<U: UserRepository, I: InventoryRepository> Clone for ApiState<U, I> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
        }
    }
}

pub use routes::router;
pub use server::{RestServer, RestServerKonfig};
