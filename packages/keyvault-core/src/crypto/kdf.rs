//! # Key Derivation Functions
//!
//! Password-based derivation of key-encryption keys, and seed expansion
//! for deterministic key pairs.
//!
//! ## Key Derivation Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    KEY DERIVATION HIERARCHY                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    PASSWORD (user secret)                       │   │
//! │  │                                                                 │   │
//! │  │  • Never persisted                                             │   │
//! │  │  • Zeroized as soon as the derivation returns                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │                                ▼                                        │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    PBKDF2-HMAC-SHA256                           │   │
//! │  │                                                                 │   │
//! │  │  PBKDF2(                                                       │   │
//! │  │    password   = password bytes,                                │   │
//! │  │    salt       = 16 random bytes (stored in the container),     │   │
//! │  │    iterations = >= 100_000 (stored in the container),          │   │
//! │  │    output     = 32 bytes                                       │   │
//! │  │  )                                                             │   │
//! │  │                                                                 │   │
//! │  │  → DerivedKey (AES-256-GCM key-encryption key)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    CALLER SEED (32 bytes)                       │   │
//! │  │                                                                 │   │
//! │  │  HKDF-SHA256(                                                  │   │
//! │  │    ikm  = seed,                                                │   │
//! │  │    salt = empty,                                               │   │
//! │  │    info = "keyvault-signing-key-v1"                            │   │
//! │  │  )                                                             │   │
//! │  │                                                                 │   │
//! │  │  → 32-byte Ed25519 secret                                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Considerations
//!
//! | Aspect | Design Choice | Rationale |
//! |--------|---------------|-----------|
//! | Password KDF | PBKDF2-HMAC-SHA256 | Portable, parameters travel with the file |
//! | Iteration floor | 100_000 | Anything lower is rejected outright |
//! | Iteration ceiling | 10_000_000 | A crafted file cannot demand unbounded work |
//! | Seed expansion | HKDF with versioned `info` | Seed bytes are never used as a key directly |

use hkdf::Hkdf;
use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use zeroize::{ZeroizeOnDrop, Zeroizing};

use crate::error::{Error, Result};

/// Lowest iteration count accepted for password derivation
pub const MIN_ITERATIONS: u32 = 100_000;

/// Iteration count used when the caller does not choose one
pub const DEFAULT_ITERATIONS: u32 = 600_000;

/// Highest iteration count accepted for password derivation
pub const MAX_ITERATIONS: u32 = 10_000_000;

/// Size of freshly generated salts
pub const SALT_SIZE: usize = 16;

/// Shortest salt accepted when deriving
pub const MIN_SALT_SIZE: usize = 8;

/// Longest salt accepted when deriving
pub const MAX_SALT_SIZE: usize = 64;

/// Size of a derived key in bytes (256 bits)
pub const DERIVED_KEY_SIZE: usize = 32;

/// Domain separation strings for HKDF
pub mod domain {
    /// Domain for seeded Ed25519 key derivation
    pub const SIGNING_KEY: &[u8] = b"keyvault-signing-key-v1";
}

/// Stored inputs of a password derivation
///
/// Persisted next to the ciphertext so the same key can be derived again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KdfParams {
    /// Random salt
    pub salt: Vec<u8>,
    /// PBKDF2 iteration count
    pub iterations: u32,
}

impl KdfParams {
    /// Fresh parameters with a random salt
    pub fn generate(iterations: u32) -> Result<Self> {
        let params = Self {
            salt: generate_salt().to_vec(),
            iterations,
        };
        params.validate()?;
        Ok(params)
    }

    /// Reject parameters outside the accepted range
    pub fn validate(&self) -> Result<()> {
        if self.iterations < MIN_ITERATIONS {
            return Err(Error::WeakParameters(format!(
                "{} iterations is below the minimum of {}",
                self.iterations, MIN_ITERATIONS
            )));
        }
        if self.iterations > MAX_ITERATIONS {
            return Err(Error::WeakParameters(format!(
                "{} iterations exceeds the maximum of {}",
                self.iterations, MAX_ITERATIONS
            )));
        }
        if self.salt.len() < MIN_SALT_SIZE || self.salt.len() > MAX_SALT_SIZE {
            return Err(Error::WeakParameters(format!(
                "salt must be {}..={} bytes, got {}",
                MIN_SALT_SIZE,
                MAX_SALT_SIZE,
                self.salt.len()
            )));
        }
        Ok(())
    }
}

/// Generate a random salt from the OS CSPRNG
pub fn generate_salt() -> [u8; SALT_SIZE] {
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// A key derived from a password
///
/// Zeroized when dropped. Only the [`KdfParams`] that produced it are ever
/// written to disk.
#[derive(ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; DERIVED_KEY_SIZE],
    #[zeroize(skip)]
    params: KdfParams,
}

impl DerivedKey {
    /// The parameters this key was derived with
    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    pub(crate) fn as_bytes(&self) -> &[u8; DERIVED_KEY_SIZE] {
        &self.bytes
    }

    /// Build a key without running PBKDF2 (tests only)
    #[cfg(test)]
    pub(crate) fn from_raw(bytes: [u8; DERIVED_KEY_SIZE], params: KdfParams) -> Self {
        Self { bytes, params }
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("bytes", &"<redacted>")
            .field("params", &self.params)
            .finish()
    }
}

/// Derive a key-encryption key from a password
///
/// Deterministic: the same password, salt and iteration count always give
/// the same key.
///
/// ## Errors
///
/// `WeakParameters` if `iterations` is outside
/// `MIN_ITERATIONS..=MAX_ITERATIONS` or the salt length is out of range.
pub fn derive(password: &[u8], salt: &[u8], iterations: u32) -> Result<DerivedKey> {
    let params = KdfParams {
        salt: salt.to_vec(),
        iterations,
    };
    derive_from_params(password, &params)
}

/// Derive a key-encryption key from stored parameters
pub fn derive_from_params(password: &[u8], params: &KdfParams) -> Result<DerivedKey> {
    params.validate()?;

    let mut bytes = [0u8; DERIVED_KEY_SIZE];
    pbkdf2_hmac::<Sha256>(password, &params.salt, params.iterations, &mut bytes);

    tracing::debug!(iterations = params.iterations, "Derived key-encryption key");

    Ok(DerivedKey {
        bytes,
        params: params.clone(),
    })
}

/// Expand a caller seed into an Ed25519 secret
///
/// ```text
/// Seed (32 bytes)
///       │
///       └──► HKDF(info="keyvault-signing-key-v1") → Signing Key
/// ```
pub fn derive_signing_seed(seed: &[u8; 32]) -> Result<Zeroizing<[u8; 32]>> {
    let hkdf = Hkdf::<Sha256>::new(None, seed);

    let mut signing_key = Zeroizing::new([0u8; 32]);
    hkdf.expand(domain::SIGNING_KEY, &mut signing_key[..])
        .map_err(|_| Error::Internal("HKDF expansion failed".into()))?;

    Ok(signing_key)
}

// ============================================================================
// TESTS
// ============================================================================
