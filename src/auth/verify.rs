//! Ethereum personal-message signature recovery.

use crate::error::AppError;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use sha3::{Digest, Keccak256};

/// Keccak-256 digest of a message under the EIP-191 personal-sign prefix.
///
/// This is the digest wallets produce for `personal_sign`:
/// `keccak256("\x19Ethereum Signed Message:\n" + len(message) + message)`.
pub fn personal_message_digest(message: &str) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(format!("\x19Ethereum Signed Message:\n{}", message.len()));
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}

/// Lowercase hex address (`0x` + 40 chars) for a recovered public key.
///
/// Last 20 bytes of the Keccak-256 of the uncompressed SEC1 point,
/// excluding the 0x04 tag byte.
fn address_from_key(key: &VerifyingKey) -> String {
    let point = key.to_encoded_point(false);
    let digest = Keccak256::digest(&point.as_bytes()[1..]);
    format!("0x{}", hex::encode(&digest[12..]))
}

/// Recover the signer address from a message and its signature.
///
/// # Arguments
/// * `message` - The plain message string the client signed (the nonce)
/// * `signature_hex` - Hex-encoded 65-byte signature `r || s || v`,
///   with or without a `0x` prefix; `v` may be 0/1 or 27/28
///
/// # Returns
/// * `Ok(address)` - lowercase `0x`-prefixed signer address
/// * `Err(AppError::BadRequest)` - malformed signature or failed recovery
///
/// Pure function of its inputs. The caller must compare the recovered
/// address against the claimed one; a mismatch is not an error here.
pub fn recover_signer(message: &str, signature_hex: &str) -> Result<String, AppError> {
    let hex_str = signature_hex
        .strip_prefix("0x")
        .unwrap_or(signature_hex);

    let sig_bytes = hex::decode(hex_str)
        .map_err(|e| AppError::BadRequest(format!("Invalid signature hex: {}", e)))?;

    if sig_bytes.len() != 65 {
        return Err(AppError::BadRequest(format!(
            "Invalid signature length: expected 65 bytes, got {}",
            sig_bytes.len()
        )));
    }

    // Normalize the recovery byte: wallets emit 27/28, raw ECDSA uses 0/1
    let v = match sig_bytes[64] {
        v @ (0 | 1) => v,
        v @ (27 | 28) => v - 27,
        v => {
            return Err(AppError::BadRequest(format!(
                "Invalid recovery id: {}",
                v
            )))
        }
    };
    let recovery_id = RecoveryId::try_from(v)
        .map_err(|e| AppError::BadRequest(format!("Invalid recovery id: {}", e)))?;

    let signature = Signature::from_slice(&sig_bytes[..64])
        .map_err(|e| AppError::BadRequest(format!("Invalid signature: {}", e)))?;

    let digest = personal_message_digest(message);

    let key = VerifyingKey::recover_from_prehash(&digest, &signature, recovery_id)
        .map_err(|_| AppError::BadRequest("Signature recovery failed".to_string()))?;

    Ok(address_from_key(&key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;

    /// Deterministic test key; any nonzero 32-byte seed below the curve
    /// order is a valid secret scalar.
    fn test_signing_key(seed_byte: u8) -> SigningKey {
        SigningKey::from_slice(&[seed_byte; 32]).unwrap()
    }

    fn address_of(key: &SigningKey) -> String {
        address_from_key(key.verifying_key())
    }

    /// Sign a message the way a wallet's personal_sign does.
    fn personal_sign(key: &SigningKey, message: &str) -> String {
        let digest = personal_message_digest(message);
        let (sig, recid) = key.sign_prehash_recoverable(&digest).unwrap();
        let mut bytes = sig.to_bytes().to_vec();
        bytes.push(recid.to_byte() + 27);
        format!("0x{}", hex::encode(bytes))
    }

    #[test]
    fn test_recover_matches_signer() {
        let key = test_signing_key(0x42);
        let signature = personal_sign(&key, "some-nonce-value");

        let recovered = recover_signer("some-nonce-value", &signature).unwrap();
        assert_eq!(recovered, address_of(&key));
        // Canonical form: 0x prefix plus 40 lowercase hex characters
        assert_eq!(recovered.len(), 42);
        assert_eq!(recovered, recovered.to_lowercase());
    }

    #[test]
    fn test_recover_accepts_raw_recovery_byte() {
        let key = test_signing_key(0x42);
        let digest = personal_message_digest("some-nonce-value");
        let (sig, recid) = key.sign_prehash_recoverable(&digest).unwrap();
        let mut bytes = sig.to_bytes().to_vec();
        bytes.push(recid.to_byte()); // 0/1 form, no 27 offset

        let recovered = recover_signer("some-nonce-value", &hex::encode(bytes)).unwrap();
        assert_eq!(recovered, address_of(&key));
    }

    #[test]
    fn test_different_key_recovers_different_address() {
        let key = test_signing_key(0x42);
        let other = test_signing_key(0x43);
        let signature = personal_sign(&other, "some-nonce-value");

        let recovered = recover_signer("some-nonce-value", &signature).unwrap();
        assert_ne!(recovered, address_of(&key));
        assert_eq!(recovered, address_of(&other));
    }

    #[test]
    fn test_different_message_recovers_different_address() {
        let key = test_signing_key(0x42);
        let signature = personal_sign(&key, "nonce-one");

        // Recovery itself succeeds, but the address does not match the signer
        let recovered = recover_signer("nonce-two", &signature).unwrap();
        assert_ne!(recovered, address_of(&key));
    }

    #[test]
    fn test_invalid_hex() {
        let result = recover_signer("msg", "not-hex-at-all");
        assert!(matches!(result.unwrap_err(), AppError::BadRequest(_)));
    }

    #[test]
    fn test_invalid_length() {
        let result = recover_signer("msg", &hex::encode([0u8; 64]));
        assert!(matches!(result.unwrap_err(), AppError::BadRequest(_)));
    }

    #[test]
    fn test_invalid_recovery_byte() {
        let key = test_signing_key(0x42);
        let digest = personal_message_digest("msg");
        let (sig, _) = key.sign_prehash_recoverable(&digest).unwrap();
        let mut bytes = sig.to_bytes().to_vec();
        bytes.push(9);

        let result = recover_signer("msg", &hex::encode(bytes));
        assert!(matches!(result.unwrap_err(), AppError::BadRequest(_)));
    }

    #[test]
    fn test_zero_signature_fails_recovery() {
        let mut bytes = vec![0u8; 65];
        bytes[64] = 27;
        let result = recover_signer("msg", &hex::encode(bytes));
        assert!(matches!(result.unwrap_err(), AppError::BadRequest(_)));
    }

    #[test]
    fn test_digest_includes_message_length() {
        // EIP-191 prefixes the message with its byte length, so equal-prefix
        // messages of different length must hash differently
        assert_ne!(
            personal_message_digest("abc"),
            personal_message_digest("abcd")
        );
    }
}
