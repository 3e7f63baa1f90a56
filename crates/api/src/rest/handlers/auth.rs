//! REST-Handler fuer Registrierung, Login und Profil

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use pokearena_auth::AuthErgebnis;
use pokearena_core::UserId;
use pokearena_db::{
    models::InventarEintrag,
    repository::{InventoryRepository, UserRepository},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ApiFehler, ApiResult};
use crate::rest::{middleware::Authentifiziert, ApiState};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrierenBody {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnmeldenBody {
    pub username: String,
    pub password: String,
    /// Wird akzeptiert aber nicht ausgewertet
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthAntwort {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub token: String,
}

impl From<AuthErgebnis> for AuthAntwort {
    fn from(ergebnis: AuthErgebnis) -> Self {
        Self {
            user_id: ergebnis.benutzer.id,
            username: ergebnis.benutzer.username,
            email: ergebnis.benutzer.email,
            token: ergebnis.token,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilAntwort {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub inventory: Vec<InventarEintrag>,
    pub is_admin: bool,
}

/// Uebersetzt Binding-Fehler in eine 400-Antwort
pub(crate) fn body<T>(ergebnis: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    ergebnis
        .map(|Json(b)| b)
        .map_err(|e| ApiFehler::UngueltigeAnfrage(e.body_text()))
}

/// GET /auth/test
pub async fn test() -> Json<Value> {
    Json(json!({ "result": "ok" }))
}

/// POST /auth/register
pub async fn register<U, I>(
    State(state): State<ApiState<U, I>>,
    anfrage: Result<Json<RegistrierenBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AuthAntwort>)>
where
    U: UserRepository + 'static,
    I: InventoryRepository + 'static,
{
    let b = body(anfrage)?;
    let ergebnis = state
        .auth
        .registrieren(&b.username, &b.email, &b.password)
        .await?;
    Ok((StatusCode::CREATED, Json(ergebnis.into())))
}

/// POST /auth/login
pub async fn login<U, I>(
    State(state): State<ApiState<U, I>>,
    anfrage: Result<Json<AnmeldenBody>, JsonRejection>,
) -> ApiResult<Json<AuthAntwort>>
where
    U: UserRepository + 'static,
    I: InventoryRepository + 'static,
{
    let b = body(anfrage)?;
    let ergebnis = state.auth.anmelden(&b.username, &b.password).await?;
    Ok(Json(ergebnis.into()))
}

/// GET /auth/profile
pub async fn profile<U, I>(
    State(state): State<ApiState<U, I>>,
    Authentifiziert(identitaet): Authentifiziert,
) -> ApiResult<Json<ProfilAntwort>>
where
    U: UserRepository + 'static,
    I: InventoryRepository + 'static,
{
    let profil = state.auth.profil(&identitaet).await?;
    Ok(Json(ProfilAntwort {
        user_id: profil.benutzer.id,
        username: profil.benutzer.username,
        email: profil.benutzer.email,
        inventory: profil.inventar,
        is_admin: profil.ist_admin,
    }))
}
