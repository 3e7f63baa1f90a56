//! Axum-Extraktoren und Hilfsfunktionen fuer Auth

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use pokearena_auth::{AuthError, AuthIdentitaet};
use pokearena_db::repository::{InventoryRepository, UserRepository};
use serde_json::json;

use crate::error::ApiFehler;
use crate::rest::ApiState;

/// Fehlerantwort fuer REST-API
pub fn fehler_antwort(status: StatusCode, nachricht: &str, code: u32) -> Response {
    (
        status,
        Json(json!({
            "error": {
                "code": code,
                "message": nachricht
            }
        })),
    )
        .into_response()
}

/// Extrahiert Bearer-Token aus Authorization-Header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentifizierte Identitaet des Aufrufers
///
/// Jeder geschuetzte Handler nimmt diesen Extraktor als erstes Argument;
/// fehlt das Token oder ist es ungueltig, antwortet der Server mit 401.
#[derive(Debug, Clone)]
pub struct Authentifiziert(pub AuthIdentitaet);

#[async_trait]
impl<U, I> FromRequestParts<ApiState<U, I>> for Authentifiziert
where
    U: UserRepository + 'static,
    I: InventoryRepository + 'static,
{
    type Rejection = ApiFehler;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ApiState<U, I>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AuthError::NichtAuthentifiziert)?;
        let identitaet = state.auth.identitaet_aufloesen(token)?;
        Ok(Self(identitaet))
    }
}
