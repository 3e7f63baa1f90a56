//! pokearena-api – REST-Schnittstelle
//!
//! Duenne HTTP-Schicht ueber dem Auth-Kern: Request-Binding, Bearer-Token
//! Extraktion und die Abbildung der Fehler-Taxonomie auf HTTP-Statuscodes.

pub mod error;
pub mod rest;

pub use error::{ApiFehler, ApiResult};
pub use rest::{ApiState, RestServer, RestServerKonfig};
