//! Nonce generation and JWT session credentials.

use crate::error::AppError;
use crate::models::StoredUser;
use base64::{engine::general_purpose, Engine as _};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Generate a cryptographically random challenge nonce.
///
/// Returns a base64-encoded string (44 characters) from 32 random bytes.
pub fn generate_nonce() -> String {
    let mut rng = rand::rng();
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes);
    general_purpose::STANDARD.encode(bytes)
}

/// Claims embedded in a session credential.
///
/// A point-in-time snapshot of the user record at issuance; eligibility
/// fields do not refresh for the lifetime of the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub wallet_address: String,
    #[serde(default)]
    pub discord_name: Option<String>,
    #[serde(default)]
    pub twitter_name: Option<String>,
    #[serde(default)]
    pub is_following_from_twitter: Option<bool>,
    #[serde(default)]
    pub is_discord_member: Option<bool>,
    #[serde(default)]
    pub owned_nft_count: Option<u64>,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Session credential verification failures.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,
}

/// JWT session issuer and verifier.
///
/// Signs with HS256 using the process-wide secret; the token is opaque to
/// the client and carried as the `token` cookie.
#[derive(Clone)]
pub struct Sessions {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl Sessions {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Sessions {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Mint a signed credential from a user snapshot.
    pub fn issue(&self, user: &StoredUser) -> Result<String, AppError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AppError::Internal(format!("System time error: {}", e)))?
            .as_secs();

        let claims = Claims {
            wallet_address: user.wallet_address.clone(),
            discord_name: user.discord_name.clone(),
            twitter_name: user.twitter_name.clone(),
            is_following_from_twitter: user.is_following_from_twitter,
            is_discord_member: user.is_discord_member,
            owned_nft_count: user.owned_nft_count,
            iat: now,
            exp: now + self.ttl_secs,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify a credential and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        match decode::<Claims>(token, &self.decoding, &Validation::default()) {
            Ok(data) => Ok(data.claims),
            Err(err) => {
                use jsonwebtoken::errors::ErrorKind;
                match err.kind() {
                    ErrorKind::ExpiredSignature => Err(TokenError::Expired),
                    _ => Err(TokenError::Invalid),
                }
            }
        }
    }

    #[cfg(test)]
    fn issue_with_timestamps(&self, user: &StoredUser, iat: u64, exp: u64) -> String {
        let claims = Claims {
            wallet_address: user.wallet_address.clone(),
            discord_name: user.discord_name.clone(),
            twitter_name: user.twitter_name.clone(),
            is_following_from_twitter: user.is_following_from_twitter,
            is_discord_member: user.is_discord_member,
            owned_nft_count: user.owned_nft_count,
            iat,
            exp,
        };
        encode(&Header::default(), &claims, &self.encoding).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-that-is-at-least-32-characters-long";

    fn test_sessions() -> Sessions {
        Sessions::new(TEST_SECRET, 2_592_000)
    }

    fn test_user() -> StoredUser {
        let mut user = StoredUser::new(
            "0x742d35cc6634c0532925a3b844bc454e4438f44e".to_string(),
            "nonce-1".to_string(),
        );
        user.discord_name = Some("tester#1234".to_string());
        user.owned_nft_count = Some(3);
        user
    }

    #[test]
    fn test_generate_nonce() {
        let nonce = generate_nonce();

        // Base64 of 32 bytes is 44 characters (with padding)
        assert_eq!(nonce.len(), 44);
        let decoded = general_purpose::STANDARD.decode(&nonce).unwrap();
        assert_eq!(decoded.len(), 32);
    }

    #[test]
    fn test_nonces_are_unique() {
        assert_ne!(generate_nonce(), generate_nonce());
    }

    #[test]
    fn test_issue_and_verify() {
        let sessions = test_sessions();
        let token = sessions.issue(&test_user()).unwrap();

        let claims = sessions.verify(&token).unwrap();
        assert_eq!(
            claims.wallet_address,
            "0x742d35cc6634c0532925a3b844bc454e4438f44e"
        );
        assert_eq!(claims.discord_name.as_deref(), Some("tester#1234"));
        assert_eq!(claims.owned_nft_count, Some(3));
        assert_eq!(claims.exp - claims.iat, 2_592_000);
    }

    #[test]
    fn test_garbage_token_invalid() {
        let sessions = test_sessions();
        assert_eq!(
            sessions.verify("not-a-token").unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn test_tampered_token_invalid() {
        let sessions = test_sessions();
        let token = sessions.issue(&test_user()).unwrap();

        // Flip a character in the payload segment
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let mut payload: Vec<u8> = parts[1].clone().into_bytes();
        payload[0] = if payload[0] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).unwrap();
        let tampered = parts.join(".");

        assert_eq!(sessions.verify(&tampered).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn test_wrong_secret_invalid() {
        let sessions = test_sessions();
        let other = Sessions::new("different-secret-that-is-at-least-32-chars", 2_592_000);

        let token = other.issue(&test_user()).unwrap();
        assert_eq!(sessions.verify(&token).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn test_expired_token() {
        let sessions = test_sessions();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        // Well past the default validation leeway
        let token = sessions.issue_with_timestamps(&test_user(), now - 7200, now - 3600);
        assert_eq!(sessions.verify(&token).unwrap_err(), TokenError::Expired);
    }
}
