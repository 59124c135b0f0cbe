//! Axum extractor gating protected routes on the session cookie.

use crate::auth::session::{Sessions, TokenError};
use crate::config::Config;
use crate::eligibility::EligibilityRefresher;
use crate::error::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Name of the session cookie.
pub const TOKEN_COOKIE: &str = "token";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub redis: redis::Client,
    pub config: Arc<Config>,
    pub sessions: Sessions,
    pub refresher: Arc<dyn EligibilityRefresher>,
}

/// Authenticated wallet extractor.
///
/// Extracts and verifies the `token` session cookie. Returns 401
/// Unauthorized if the cookie is missing, invalid, or expired. Handlers
/// taking this extractor never run for unauthenticated requests.
///
/// Authorization is based solely on the signed claims; no live user
/// record lookup happens here.
pub struct AuthWallet {
    /// Canonical lowercase wallet address from the verified claims.
    pub wallet_address: String,
}

impl FromRequestParts<AppState> for AuthWallet {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = jar
            .get(TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or_else(|| AppError::Unauthorized("Missing token cookie".to_string()))?;

        let claims = state.sessions.verify(&token).map_err(|e| match e {
            TokenError::Expired => AppError::Unauthorized("Token expired".to_string()),
            TokenError::Invalid => AppError::Unauthorized("Invalid token".to_string()),
        })?;

        Ok(AuthWallet {
            wallet_address: claims.wallet_address,
        })
    }
}
