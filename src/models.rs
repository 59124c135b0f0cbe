//! Request and response models for the API.
//!
//! All models use serde for serialization/deserialization.
//! Wire formats use camelCase field names; storage models represent
//! the Redis user record.

use serde::{Deserialize, Serialize};

// ============================================================================
// Auth Models
// ============================================================================

/// Request for a signing nonce.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonceRequest {
    pub wallet_address: String,
}

/// Request to validate a signed nonce.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateSignatureRequest {
    pub wallet_address: String,
    /// Hex-encoded 65-byte recoverable secp256k1 signature.
    pub signature: String,
    pub nonce: String,
}

/// Response for the authenticated-wallet check.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IsAuthenticatedResponse {
    pub wallet_address: String,
}

/// Profile snapshot returned by the current-user endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub discord_name: Option<String>,
    pub twitter_name: Option<String>,
    pub is_following_from_twitter: Option<bool>,
    pub is_discord_member: Option<bool>,
    // camelCase would yield ownedNftCount; the wire name capitalizes NFT
    #[serde(rename = "ownedNFTCount")]
    pub owned_nft_count: Option<u64>,
}

// ============================================================================
// Storage Models
// ============================================================================

/// User record as stored in Redis, keyed by lowercase wallet address.
///
/// The eligibility fields are written only by the refresh collaborators;
/// the auth core treats them as read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub wallet_address: String,
    /// Current single-use challenge. Overwritten on every nonce request.
    pub nonce: String,
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
    pub created_at: u64,
}

impl StoredUser {
    pub fn new(wallet_address: String, nonce: String) -> Self {
        StoredUser {
            wallet_address,
            nonce,
            discord_name: None,
            twitter_name: None,
            is_following_from_twitter: None,
            is_discord_member: None,
            owned_nft_count: None,
            created_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_secs(),
        }
    }
}
