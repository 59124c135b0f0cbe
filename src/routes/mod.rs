//! API route handlers.

pub mod auth;

use crate::auth::middleware::AppState;
use crate::error::AppError;
use axum::{routing::get, routing::post, Router};

/// Normalize a wallet address to its canonical lowercase form and check its
/// shape (`0x` + 40 hex characters).
///
/// Every store lookup and comparison uses the value returned here; keys
/// never hold mixed-case addresses.
pub fn normalize_wallet_address(address: &str) -> Result<String, AppError> {
    let normalized = address.to_lowercase();

    let hex_part = normalized
        .strip_prefix("0x")
        .ok_or_else(|| AppError::BadRequest("Invalid wallet address format".to_string()))?;

    if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::BadRequest(
            "Invalid wallet address format".to_string(),
        ));
    }

    Ok(normalized)
}

/// Build the API router with all endpoints.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/nonce", post(auth::request_nonce))
        .route("/validate_signature", post(auth::validate_signature))
        .route("/isAuthenticated", get(auth::is_authenticated))
        .route("/logout", get(auth::logout))
        .route("/user", get(auth::current_user))
}
