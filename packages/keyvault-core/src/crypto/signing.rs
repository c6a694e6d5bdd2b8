//! # Digital Signatures Module
//!
//! Ed25519 signing and verification for wallet messages.
//!
//! ## Verification Outcomes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       VERIFICATION FLOW                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Input: public key hex, message, signature hex                         │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐                  │
//! │  │  Public Key  │  │   Message    │  │  Signature   │                  │
//! │  │  32 bytes    │  │  any bytes   │  │  R ‖ S       │                  │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘                  │
//! │         │                 │                 │                           │
//! │         ▼                 │                 ▼                           │
//! │  decodes to a point? ─── no ──────────► Malformed                      │
//! │         │ yes             │          64 bytes of hex? ── no ─► Malformed│
//! │         └─────────────────┼─────────────────┘                           │
//! │                           ▼                                             │
//! │              Ed25519 verify_strict                                      │
//! │                  │                 │                                    │
//! │                  ▼                 ▼                                    │
//! │               Valid             Invalid                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Malformed` means the check could not run. It is never reported as valid.

use ed25519_dalek::{Signature as Ed25519Signature, Signer};
use serde::{Deserialize, Serialize};

use crate::crypto::keys::{KeyPair, PublicKey};
use crate::error::{Error, Result};

/// Size of an Ed25519 signature in bytes
pub const SIGNATURE_SIZE: usize = 64;

/// Size of each signature component (R and S) in bytes
pub const COMPONENT_SIZE: usize = 32;

/// An Ed25519 digital signature, laid out as `R ‖ S`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(#[serde(with = "signature_bytes")] pub [u8; SIGNATURE_SIZE]);

impl Signature {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; SIGNATURE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create from a slice
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let bytes: [u8; SIGNATURE_SIZE] = slice.try_into().map_err(|_| {
            Error::Malformed(format!(
                "signature must be {} bytes, got {}",
                SIGNATURE_SIZE,
                slice.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.0
    }

    /// The R component (commitment point)
    pub fn r(&self) -> &[u8] {
        &self.0[..COMPONENT_SIZE]
    }

    /// The S component (scalar)
    pub fn s(&self) -> &[u8] {
        &self.0[COMPONENT_SIZE..]
    }

    /// Hex encoding of R
    pub fn r_hex(&self) -> String {
        hex::encode(self.r())
    }

    /// Hex encoding of S
    pub fn s_hex(&self) -> String {
        hex::encode(self.s())
    }

    /// Hex encoding of the full signature
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode from hex string
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes =
            hex::decode(hex_str).map_err(|_| Error::Malformed("signature is not valid hex".into()))?;
        Self::from_slice(&bytes)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Result of checking a signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// The signature was made by the public key's owner over this message
    Valid,
    /// The signature does not match the key and message
    Invalid,
    /// The inputs could not be decoded, so nothing was checked
    Malformed(String),
}

impl Verification {
    /// True only for [`Verification::Valid`]
    pub fn is_valid(&self) -> bool {
        matches!(self, Verification::Valid)
    }

    /// Collapse into the command-boundary shape
    ///
    /// `Valid`/`Invalid` become `Ok(true)`/`Ok(false)`; `Malformed` becomes
    /// an error.
    pub fn into_result(self) -> Result<bool> {
        match self {
            Verification::Valid => Ok(true),
            Verification::Invalid => Ok(false),
            Verification::Malformed(reason) => Err(Error::Malformed(reason)),
        }
    }
}

/// Sign a message using Ed25519
///
/// Deterministic: signing the same message with the same key always
/// produces the same signature.
///
/// ## Example
///
/// ```ignore
/// let keypair = KeyPair::generate();
/// let signature = sign(&keypair, b"transfer 10 to alice");
/// ```
pub fn sign(keypair: &KeyPair, message: &[u8]) -> Signature {
    let sig = keypair.signing_key().sign(message);
    Signature(sig.to_bytes())
}

/// Verify an Ed25519 signature
///
/// Uses strict verification, so non-canonical signatures and small-order
/// keys are reported as `Invalid`.
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> Verification {
    let verifying_key = match public_key.verifying_key() {
        Ok(key) => key,
        Err(e) => return Verification::Malformed(e.to_string()),
    };

    let sig = Ed25519Signature::from_bytes(&signature.0);

    match verifying_key.verify_strict(message, &sig) {
        Ok(()) => Verification::Valid,
        Err(_) => Verification::Invalid,
    }
}

/// Verify a signature from hex-encoded inputs
pub fn verify_hex(public_key_hex: &str, message: &[u8], signature_hex: &str) -> Verification {
    let public_key = match PublicKey::from_hex(public_key_hex) {
        Ok(key) => key,
        Err(e) => return Verification::Malformed(e.to_string()),
    };
    let signature = match Signature::from_hex(signature_hex) {
        Ok(sig) => sig,
        Err(e) => return Verification::Malformed(e.to_string()),
    };

    verify(&public_key, message, &signature)
}

/// Serde helper for signature bytes
mod signature_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8; 64], serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<[u8; 64], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("Invalid signature length"))
    }
}

// ============================================================================
// TESTS
// ============================================================================
