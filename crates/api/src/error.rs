//! Fehlertypen der REST-Schnittstelle

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pokearena_auth::AuthError;
use thiserror::Error;

use crate::rest::middleware::fehler_antwort;

/// Alle Fehler die ein Handler zurueckgeben kann
#[derive(Debug, Error)]
pub enum ApiFehler {
    #[error("Ungueltige Anfrage: {0}")]
    UngueltigeAnfrage(String),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

pub type ApiResult<T> = Result<T, ApiFehler>;

impl ApiFehler {
    /// HTTP-Statuscode fuer REST-Fehler
    pub fn http_status(&self) -> StatusCode {
        let code = match self {
            Self::UngueltigeAnfrage(_) => 400,
            Self::Auth(e) => e.http_status(),
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Generische Meldung fuer den Client
    pub fn oeffentliche_meldung(&self) -> String {
        match self {
            Self::UngueltigeAnfrage(_) => "Invalid request".into(),
            Self::Auth(e) => e.oeffentliche_meldung(),
        }
    }
}

impl IntoResponse for ApiFehler {
    fn into_response(self) -> Response {
        let status = self.http_status();

        if status.is_server_error() {
            tracing::error!(fehler = %self, "Anfrage mit internem Fehler beendet");
        } else {
            tracing::debug!(status = status.as_u16(), fehler = %self, "Anfrage abgelehnt");
        }

        fehler_antwort(status, &self.oeffentliche_meldung(), u32::from(status.as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokearena_db::DbError;

    #[test]
    fn status_aus_auth_fehler() {
        let e = ApiFehler::from(AuthError::NichtAuthentifiziert);
        assert_eq!(e.http_status(), StatusCode::UNAUTHORIZED);

        let e = ApiFehler::from(AuthError::ZugriffVerweigert("x".into()));
        assert_eq!(e.http_status(), StatusCode::FORBIDDEN);

        let e = ApiFehler::from(AuthError::BenutzernameVergeben("alice".into()));
        assert_eq!(e.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn ungueltige_anfrage_ist_400_ohne_details() {
        let e = ApiFehler::UngueltigeAnfrage("missing field `password` at line 1".into());
        assert_eq!(e.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(e.oeffentliche_meldung(), "Invalid request");
    }

    #[test]
    fn db_fehler_wird_500_ohne_details() {
        let e = ApiFehler::from(AuthError::Datenbank(DbError::intern("database is locked")));
        assert_eq!(e.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!e.oeffentliche_meldung().contains("locked"));
    }
}
