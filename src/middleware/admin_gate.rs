use axum::extract::FromRequestParts;

use crate::{error::AppError, state::AppState};

pub const ADMIN_PIN_HEADER: &str = "x-admin-pin";

/// Extractor guarding admin routes with the static PIN from the config.
#[derive(Debug, Clone, Copy)]
pub struct AdminGate;

/// An unset PIN lets everyone through; otherwise the header must match.
pub fn check_pin(expected: Option<&str>, provided: Option<&str>) -> Result<(), AppError> {
    let Some(expected) = expected else {
        return Ok(());
    };
    match provided.map(str::trim) {
        Some(pin) if pin == expected => Ok(()),
        Some(_) => Err(AppError::Forbidden),
        None => Err(AppError::BadRequest(format!(
            "Missing {ADMIN_PIN_HEADER} header"
        ))),
    }
}

impl FromRequestParts<AppState> for AdminGate {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let provided = match parts.headers.get(ADMIN_PIN_HEADER) {
            Some(value) => Some(
                value
                    .to_str()
                    .map_err(|_| AppError::BadRequest("Invalid admin PIN header".into()))?,
            ),
            None => None,
        };
        if let Err(err) = check_pin(state.config.admin_pin.as_deref(), provided) {
            tracing::warn!(error = %err, path = %parts.uri.path(), "admin gate rejected request");
            return Err(err);
        }
        Ok(AdminGate)
    }
}
