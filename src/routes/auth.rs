//! Auth API endpoints.

use crate::auth::middleware::{AppState, AuthWallet, TOKEN_COOKIE};
use crate::auth::session::generate_nonce;
use crate::auth::verify::recover_signer;
use crate::error::AppError;
use crate::models::{
    IsAuthenticatedResponse, NonceRequest, UserProfileResponse, ValidateSignatureRequest,
};
use crate::routes::normalize_wallet_address;
use crate::storage;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};

async fn redis_connection(
    state: &AppState,
) -> Result<redis::aio::MultiplexedConnection, AppError> {
    state
        .redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))
}

/// Build the session cookie carrying a freshly issued token.
///
/// `HttpOnly` always; `Secure` everywhere except development deployments.
fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(!state.config.dev_mode)
        .max_age(time::Duration::seconds(state.config.session_ttl_secs as i64))
        .build()
}

/// POST /nonce — Issue a signing challenge for a wallet
///
/// Creates the user record on first contact, otherwise overwrites the
/// stored nonce. The previous nonce stops validating from this point on.
pub async fn request_nonce(
    State(state): State<AppState>,
    Json(req): Json<NonceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let wallet_address = normalize_wallet_address(&req.wallet_address)?;

    let mut con = redis_connection(&state).await?;

    let nonce = generate_nonce();

    match storage::user::get_user(&mut con, &wallet_address).await? {
        Some(_) => {
            storage::user::update_nonce(&mut con, &wallet_address, &nonce).await?;
        }
        None => {
            storage::user::create_user(&mut con, &wallet_address, &nonce).await?;
            tracing::info!(action = "user_created", wallet = %wallet_address, "First nonce request for wallet");
        }
    }

    Ok(nonce)
}

/// POST /validate_signature — Verify a signed nonce and start a session
///
/// Recovers the signer from the submitted signature, checks it against the
/// claimed wallet, and requires an exact match against the stored
/// `(wallet, nonce)` pair. On success the session token is set as a cookie.
pub async fn validate_signature(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<ValidateSignatureRequest>,
) -> Result<impl IntoResponse, AppError> {
    let wallet_address = normalize_wallet_address(&req.wallet_address)?;

    let signer_address = recover_signer(&req.nonce, &req.signature)?;

    if signer_address != wallet_address {
        tracing::warn!(action = "auth_failed", wallet = %wallet_address, "Recovered signer does not match claimed wallet");
        return Err(AppError::BadRequest(
            "Signature validation failed".to_string(),
        ));
    }

    let mut con = redis_connection(&state).await?;

    // Exact (wallet, nonce) binding: a nonce superseded by a later issuance
    // no longer matches the stored record
    let user = storage::user::get_user(&mut con, &wallet_address)
        .await?
        .filter(|user| user.nonce == req.nonce)
        .ok_or_else(|| AppError::BadRequest("User not found".to_string()))?;

    let token = state.sessions.issue(&user)?;

    tracing::info!(action = "auth_success", wallet = %wallet_address, "Wallet authenticated");

    Ok((jar.add(session_cookie(&state, token)), "success"))
}

/// GET /isAuthenticated — Report the authenticated wallet
pub async fn is_authenticated(wallet: AuthWallet) -> Json<IsAuthenticatedResponse> {
    Json(IsAuthenticatedResponse {
        wallet_address: wallet.wallet_address,
    })
}

/// GET /logout — Clear the session cookie
///
/// Responds 401 so clients treat the session as gone immediately.
pub async fn logout(wallet: AuthWallet, jar: CookieJar) -> impl IntoResponse {
    tracing::info!(action = "logout", wallet = %wallet.wallet_address, "Wallet logged out");

    let jar = jar.remove(Cookie::build((TOKEN_COOKIE, "")).path("/"));
    (StatusCode::UNAUTHORIZED, jar, "Logged out")
}

/// GET /user — Current user profile, refreshed before serving
///
/// Read, refresh roles, refresh socials, re-read. The two refresh calls run
/// strictly in order and a failure in either aborts the read; there are no
/// retries. The returned snapshot reflects the post-refresh record.
pub async fn current_user(
    wallet: AuthWallet,
    State(state): State<AppState>,
) -> Result<Json<UserProfileResponse>, AppError> {
    let mut con = redis_connection(&state).await?;

    let user = storage::user::get_user(&mut con, &wallet.wallet_address)
        .await?
        .ok_or_else(|| {
            AppError::Internal(format!(
                "No user record for authenticated wallet {}",
                wallet.wallet_address
            ))
        })?;

    state.refresher.refresh_role_eligibility(&user).await?;
    state.refresher.refresh_social_follows(&user).await?;

    let user = storage::user::get_user(&mut con, &wallet.wallet_address)
        .await?
        .ok_or_else(|| {
            AppError::Internal(format!(
                "User record vanished during refresh for {}",
                wallet.wallet_address
            ))
        })?;

    Ok(Json(UserProfileResponse {
        discord_name: user.discord_name,
        twitter_name: user.twitter_name,
        is_following_from_twitter: user.is_following_from_twitter,
        is_discord_member: user.is_discord_member,
        owned_nft_count: user.owned_nft_count,
    }))
}
