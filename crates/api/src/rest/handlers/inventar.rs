//! REST-Handler fuer Inventar-Aenderungen
//!
//! Beide Endpunkte koennen ein fremdes Ziel angeben; ohne Angabe gilt der
//! Aufrufer selbst als Ziel. Die Policy entscheidet im AuthService.

use axum::{body::Bytes, extract::rejection::JsonRejection, extract::State, response::Json};
use pokearena_core::UserId;
use pokearena_db::repository::{InventoryRepository, UserRepository};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ApiFehler, ApiResult};
use crate::rest::{handlers::auth::body, middleware::Authentifiziert, ApiState};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PokemonBody {
    #[serde(default)]
    pub target_user_id: Option<UserId>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct InventarBody {
    #[serde(alias = "itemKind")]
    pub item: String,
    pub quantity: i64,
    #[serde(default, alias = "userId")]
    pub target_user_id: Option<UserId>,
}

#[derive(Debug, Serialize)]
pub struct PokemonAntwort {
    pub item: String,
    pub quantity: i64,
}

/// POST /pokemon/add
///
/// Der Body ist optional; ein leerer Body bedeutet "fuer mich selbst".
pub async fn add_pokemon<U, I>(
    State(state): State<ApiState<U, I>>,
    Authentifiziert(identitaet): Authentifiziert,
    roh: Bytes,
) -> ApiResult<Json<PokemonAntwort>>
where
    U: UserRepository + 'static,
    I: InventoryRepository + 'static,
{
    let anfrage = if roh.iter().all(u8::is_ascii_whitespace) {
        PokemonBody::default()
    } else {
        serde_json::from_slice::<PokemonBody>(&roh)
            .map_err(|e| ApiFehler::UngueltigeAnfrage(e.to_string()))?
    };

    let eintrag = state
        .auth
        .pokemon_hinzufuegen(&identitaet, anfrage.target_user_id)
        .await?;

    Ok(Json(PokemonAntwort {
        item: eintrag.item,
        quantity: eintrag.quantity,
    }))
}

/// PUT /inventory/update
pub async fn update_inventory<U, I>(
    State(state): State<ApiState<U, I>>,
    Authentifiziert(identitaet): Authentifiziert,
    anfrage: Result<Json<InventarBody>, JsonRejection>,
) -> ApiResult<Json<Value>>
where
    U: UserRepository + 'static,
    I: InventoryRepository + 'static,
{
    let b = body(anfrage)?;
    state
        .auth
        .inventar_setzen(&identitaet, b.target_user_id, &b.item, b.quantity)
        .await?;
    Ok(Json(json!({ "message": "Inventory updated" })))
}
