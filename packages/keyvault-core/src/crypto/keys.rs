//! # Key Management
//!
//! Ed25519 key-pair generation for wallet accounts.
//!
//! ## Key Sources
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          KEY SOURCES                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  KeyPair::generate()                                            │   │
//! │  │  ───────────────────                                             │   │
//! │  │  32 bytes from the OS CSPRNG                                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  KeyPair::from_seed_hex("<64 hex chars>")                       │   │
//! │  │  ────────────────────────────────────────                        │   │
//! │  │  seed ──► HKDF("keyvault-signing-key-v1") ──► Ed25519 secret    │   │
//! │  │  Deterministic: same seed, same pair                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  KeyPair::from_private_hex("<64 hex chars>")                    │   │
//! │  │  ───────────────────────────────────────────                     │   │
//! │  │  Rebuilds a stored pair; the public half is always recomputed   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Format:                                                               │
//! │  • Private key: 32 bytes (kept secret, zeroized on drop)              │
//! │  • Public key: 32 bytes (shared freely)                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::{ZeroizeOnDrop, Zeroizing};

use crate::crypto::kdf::derive_signing_seed;
use crate::error::{Error, Result};

/// Size of an Ed25519 private key in bytes
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Size of an Ed25519 public key in bytes
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of a caller-supplied seed in bytes
pub const SEED_SIZE: usize = 32;

/// Ed25519 key pair
///
/// The public half is always computed from the private half, so the two can
/// never disagree.
#[derive(ZeroizeOnDrop)]
pub struct KeyPair {
    #[zeroize(skip)] // ed25519_dalek::SigningKey handles its own zeroization
    secret: SigningKey,
}

impl KeyPair {
    /// Generate a new random key pair from the OS CSPRNG
    pub fn generate() -> Self {
        let secret = SigningKey::generate(&mut OsRng);
        Self { secret }
    }

    /// Create a key pair from a 32-byte seed
    ///
    /// Deterministic: the same seed always produces the same keys.
    pub fn from_seed(seed: &[u8; SEED_SIZE]) -> Result<Self> {
        let signing_key = derive_signing_seed(seed)?;
        Ok(Self::from_private_bytes(&signing_key))
    }

    /// Create a key pair from a hex-encoded 32-byte seed
    ///
    /// ## Errors
    ///
    /// `InvalidSeedEncoding` unless the input is exactly 64 hex characters.
    pub fn from_seed_hex(hex_seed: &str) -> Result<Self> {
        let seed = decode_hex_32(hex_seed).map_err(|reason| {
            Error::InvalidSeedEncoding(format!(
                "seed must be {} hex-encoded bytes: {}",
                SEED_SIZE, reason
            ))
        })?;
        Self::from_seed(&seed)
    }

    /// Rebuild a key pair from raw private key bytes
    pub fn from_private_bytes(bytes: &[u8; PRIVATE_KEY_SIZE]) -> Self {
        Self {
            secret: SigningKey::from_bytes(bytes),
        }
    }

    /// Rebuild a key pair from a hex-encoded private key
    ///
    /// ## Errors
    ///
    /// `InvalidKeyEncoding` unless the input is exactly 64 hex characters.
    pub fn from_private_hex(private_hex: &str) -> Result<Self> {
        let bytes = decode_hex_32(private_hex).map_err(|reason| {
            Error::InvalidKeyEncoding(format!(
                "private key must be {} hex-encoded bytes: {}",
                PRIVATE_KEY_SIZE, reason
            ))
        })?;
        Ok(Self::from_private_bytes(&bytes))
    }

    /// Get the private key bytes (for sealing)
    ///
    /// ## Security Warning
    ///
    /// Only use this for sealing. Never log or transmit these bytes.
    pub fn private_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_SIZE]> {
        Zeroizing::new(self.secret.to_bytes())
    }

    /// Hex encoding of the private key
    pub fn private_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.private_bytes().as_slice()))
    }

    /// Get the public key
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.public_bytes())
    }

    /// Get the public key bytes
    pub fn public_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.secret.verifying_key().to_bytes()
    }

    /// Hex encoding of the public key
    pub fn public_hex(&self) -> String {
        hex::encode(self.public_bytes())
    }

    /// Get the verifying key for signature verification
    pub fn verifying_key(&self) -> VerifyingKey {
        self.secret.verifying_key()
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.secret
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public_hex())
            .finish_non_exhaustive()
    }
}

/// Ed25519 public key
///
/// Contains only public information and can be serialized, logged and
/// stored freely.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicKey(#[serde(with = "hex_bytes")] pub [u8; PUBLIC_KEY_SIZE]);

impl PublicKey {
    /// Create a PublicKey from raw bytes
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the verifying key for signature verification
    ///
    /// Fails with `Malformed` when the bytes are not a valid curve point.
    pub fn verifying_key(&self) -> Result<VerifyingKey> {
        VerifyingKey::from_bytes(&self.0)
            .map_err(|_| Error::Malformed("public key is not a valid Ed25519 point".into()))
    }

    /// Encode as hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode from hex string
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = decode_hex_32(hex_str).map_err(|reason| {
            Error::Malformed(format!(
                "public key must be {} hex-encoded bytes: {}",
                PUBLIC_KEY_SIZE, reason
            ))
        })?;
        Ok(Self(*bytes))
    }
}

/// Decode exactly 32 hex-encoded bytes into a zeroizing buffer
///
/// The error string names the problem but never echoes the input.
pub(crate) fn decode_hex_32(input: &str) -> std::result::Result<Zeroizing<[u8; 32]>, String> {
    if input.len() != 64 {
        return Err(format!("expected 64 hex characters, got {}", input.len()));
    }
    let mut bytes = Zeroizing::new([0u8; 32]);
    hex::decode_to_slice(input, &mut bytes[..]).map_err(|_| "not valid hex".to_string())?;
    Ok(bytes)
}

/// Serde helper for serializing byte arrays as hex
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes.try_into().map_err(|_| serde::de::Error::custom("Invalid length"))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SEED_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn test_keypair_generation() {
        let kp1 = KeyPair::generate();
        let kp2 = KeyPair::generate();

        assert_ne!(kp1.public_bytes(), kp2.public_bytes());
        assert_ne!(*kp1.private_bytes(), *kp2.private_bytes());
    }

    #[test]
    fn test_keypair_from_seed_hex_deterministic() {
        let kp1 = KeyPair::from_seed_hex(SEED_HEX).unwrap();
        let kp2 = KeyPair::from_seed_hex(SEED_HEX).unwrap();

        assert_eq!(kp1.public_bytes(), kp2.public_bytes());
        assert_eq!(*kp1.private_hex(), *kp2.private_hex());
    }

    #[test]
    fn test_different_seeds_different_keys() {
        let kp1 = KeyPair::from_seed(&[1u8; 32]).unwrap();
        let kp2 = KeyPair::from_seed(&[2u8; 32]).unwrap();

        assert_ne!(kp1.public_bytes(), kp2.public_bytes());
    }

    #[test]
    fn test_seed_is_not_used_as_key_directly() {
        let seed = [9u8; 32];
        let kp = KeyPair::from_seed(&seed).unwrap();

        assert_ne!(*kp.private_bytes(), seed);
    }

    #[test]
    fn test_invalid_seed_encoding() {
        // Not hex
        let result = KeyPair::from_seed_hex(&"zz".repeat(32));
        assert!(matches!(result, Err(Error::InvalidSeedEncoding(_))));

        // Too short
        let result = KeyPair::from_seed_hex("deadbeef");
        assert!(matches!(result, Err(Error::InvalidSeedEncoding(_))));

        // Too long
        let result = KeyPair::from_seed_hex(&format!("{}00", SEED_HEX));
        assert!(matches!(result, Err(Error::InvalidSeedEncoding(_))));

        let result = KeyPair::from_seed_hex("");
        assert!(matches!(result, Err(Error::InvalidSeedEncoding(_))));
    }

    #[test]
    fn test_private_hex_roundtrip() {
        let kp = KeyPair::generate();

        let restored = KeyPair::from_private_hex(&kp.private_hex()).unwrap();

        assert_eq!(kp.public_bytes(), restored.public_bytes());
    }

    #[test]
    fn test_invalid_private_key_encoding() {
        let result = KeyPair::from_private_hex("not-a-key");
        assert!(matches!(result, Err(Error::InvalidKeyEncoding(_))));

        // Error text must not echo the input
        let secretish = "g".repeat(64);
        let err = KeyPair::from_private_hex(&secretish).unwrap_err();
        assert!(!err.to_string().contains(&secretish));
    }

    #[test]
    fn test_debug_shows_public_only() {
        let kp = KeyPair::generate();
        let debug = format!("{:?}", kp);

        assert!(debug.contains(&kp.public_hex()));
        assert!(!debug.contains(kp.private_hex().as_str()));
    }

    #[test]
    fn test_public_key_hex() {
        let kp = KeyPair::generate();
        let public = kp.public_key();

        let restored = PublicKey::from_hex(&public.to_hex()).unwrap();
        assert_eq!(public, restored);

        assert!(matches!(PublicKey::from_hex("abcd"), Err(Error::Malformed(_))));
    }

    #[test]
    fn test_public_key_serialization() {
        let public = KeyPair::generate().public_key();

        let json = serde_json::to_string(&public).unwrap();
        assert_eq!(json, format!("\"{}\"", public.to_hex()));

        let restored: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(public, restored);
    }
}
