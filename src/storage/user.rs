//! User directory Redis operations.
//!
//! Redis key pattern:
//! - `user:{wallet_address}` — user record (JSON), keyed by the canonical
//!   lowercase address
//!
//! Records are durable (no TTL). Callers are responsible for normalizing
//! addresses before lookup; keys never hold mixed-case addresses.
//!
//! Two concurrent nonce writes for the same wallet race and the last write
//! wins. That is accepted behavior: only the surviving nonce validates.

use crate::models::StoredUser;
use redis::AsyncCommands;
use zeroize::Zeroizing;

fn user_key(wallet_address: &str) -> String {
    format!("user:{}", wallet_address)
}

fn serialize_err(e: serde_json::Error) -> redis::RedisError {
    redis::RedisError::from((
        redis::ErrorKind::TypeError,
        "JSON serialize",
        e.to_string(),
    ))
}

/// Get a user by wallet address.
///
/// The record JSON is zeroized after deserialization.
pub async fn get_user<C>(
    con: &mut C,
    wallet_address: &str,
) -> Result<Option<StoredUser>, redis::RedisError>
where
    C: AsyncCommands,
{
    let json: Option<String> = con.get(user_key(wallet_address)).await?;

    match json {
        Some(data) => {
            let zeroizing_data = Zeroizing::new(data);
            let user = serde_json::from_str(&zeroizing_data).map_err(|e| {
                redis::RedisError::from((
                    redis::ErrorKind::TypeError,
                    "JSON deserialize",
                    e.to_string(),
                ))
            })?;
            Ok(Some(user))
        }
        None => Ok(None),
    }
}

/// Store a user record, overwriting any existing one.
pub async fn store_user<C>(con: &mut C, user: &StoredUser) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let json = serde_json::to_string(user).map_err(serialize_err)?;
    con.set::<_, _, ()>(user_key(&user.wallet_address), json)
        .await?;
    Ok(())
}

/// Create a user record for a first-seen wallet with its initial nonce.
pub async fn create_user<C>(
    con: &mut C,
    wallet_address: &str,
    nonce: &str,
) -> Result<StoredUser, redis::RedisError>
where
    C: AsyncCommands,
{
    let user = StoredUser::new(wallet_address.to_string(), nonce.to_string());
    store_user(con, &user).await?;
    Ok(user)
}

/// Overwrite the nonce on an existing user record.
///
/// The previous nonce stops validating as soon as this write lands.
pub async fn update_nonce<C>(
    con: &mut C,
    wallet_address: &str,
    nonce: &str,
) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    if let Some(mut user) = get_user(con, wallet_address).await? {
        user.nonce = nonce.to_string();
        store_user(con, &user).await?;
    }
    Ok(())
}
