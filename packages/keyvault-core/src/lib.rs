//! # Keyvault Core
//!
//! Local key custody and signing for the desktop wallet: password-based key
//! derivation, authenticated encryption of key material at rest, Ed25519
//! key generation and signing.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KEYVAULT CORE MODULES                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌───────────────────────────────────────────────────────────────────┐ │
//! │  │  commands  (async boundary, blocking pool for key derivation)     │ │
//! │  └─────────────────────────────────┬─────────────────────────────────┘ │
//! │                                    ▼                                    │
//! │  ┌───────────────────────────────────────────────────────────────────┐ │
//! │  │  KeyVault  (generate / decrypt / sign / verify / re-key)          │ │
//! │  └───────────┬──────────────────────────────────────┬────────────────┘ │
//! │              ▼                                      ▼                   │
//! │  ┌─────────────────────────────┐    ┌─────────────────────────────────┐│
//! │  │   Crypto                    │    │   Storage                       ││
//! │  │                             │    │                                 ││
//! │  │ - PBKDF2 key derivation     │    │ - Container / key-pair layouts  ││
//! │  │ - AES-256-GCM sealing       │    │ - Atomic, locked writes         ││
//! │  │ - Ed25519 keys & signatures │    │                                 ││
//! │  └─────────────────────────────┘    └─────────────────────────────────┘│
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error types for the entire library
//! - [`crypto`] - Cryptographic primitives (derivation, sealing, signing)
//! - [`storage`] - Key file formats and atomic file writes
//! - [`commands`] - Async operations for a host to expose
//!
//! ## Key Custody Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          KEY CUSTODY LAYERS                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Layer 1: Password → key-encryption key (PBKDF2-HMAC-SHA256)           │
//! │  ─────────────────────────────────────────────────────────              │
//! │  Salt and iteration count live in the AES-key file; the password       │
//! │  never touches disk.                                                   │
//! │                                                                         │
//! │  Layer 2: AES-key file (AES-256-GCM)                                   │
//! │  ──────────────────────────────────                                     │
//! │  A random data key, sealed under the key-encryption key.               │
//! │                                                                         │
//! │  Layer 3: Key-pair file (AES-256-GCM)                                  │
//! │  ───────────────────────────────────                                    │
//! │  The Ed25519 private key, sealed under the data key.                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod commands;
pub mod crypto;
pub mod error;
pub mod storage;
mod vault;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use crypto::{KeyPair, PublicKey, Signature, Verification};
pub use error::{Error, FfiError, Result};
pub use vault::{KeyPairHex, KeyVault, SignatureHex};

use serde::{Deserialize, Serialize};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Configuration for a [`KeyVault`]
///
/// Loadable from JSON; missing fields take their defaults.
///
/// ```ignore
/// let config = VaultConfig::from_json(r#"{ "minIterations": 200000 }"#)?;
/// let vault = KeyVault::new(config)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VaultConfig {
    /// Lowest iteration count accepted when creating a container
    pub min_iterations: u32,
    /// Iteration count used when the caller does not pass one
    pub default_iterations: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            min_iterations: crypto::MIN_ITERATIONS,
            default_iterations: crypto::DEFAULT_ITERATIONS,
        }
    }
}

impl VaultConfig {
    /// Set the creation floor
    pub fn with_min_iterations(mut self, iterations: u32) -> Self {
        self.min_iterations = iterations;
        self
    }

    /// Set the default iteration count
    pub fn with_default_iterations(mut self, iterations: u32) -> Self {
        self.default_iterations = iterations;
        self
    }

    /// Parse a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the crypto layer would refuse
    pub fn validate(&self) -> Result<()> {
        if self.min_iterations < crypto::MIN_ITERATIONS {
            return Err(Error::InvalidConfig(format!(
                "min_iterations {} is below the hard floor of {}",
                self.min_iterations,
                crypto::MIN_ITERATIONS
            )));
        }
        if self.default_iterations < self.min_iterations
            || self.default_iterations > crypto::MAX_ITERATIONS
        {
            return Err(Error::InvalidConfig(format!(
                "default_iterations {} must be within {}..={}",
                self.default_iterations,
                self.min_iterations,
                crypto::MAX_ITERATIONS
            )));
        }
        Ok(())
    }
}

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of Keyvault Core
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = VaultConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.min_iterations, 100_000);
        assert_eq!(config.default_iterations, 600_000);
    }

    #[test]
    fn test_config_rejects_weak_floor() {
        let config = VaultConfig::default().with_min_iterations(1_000);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = VaultConfig::default()
            .with_min_iterations(200_000)
            .with_default_iterations(150_000);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_config_from_json() {
        let config = VaultConfig::from_json(r#"{ "minIterations": 200000 }"#).unwrap();
        assert_eq!(config.min_iterations, 200_000);
        assert_eq!(config.default_iterations, 600_000);

        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(VaultConfig::from_json(&json).unwrap(), config);

        assert!(matches!(
            VaultConfig::from_json(r#"{ "minIterations": 10 }"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            VaultConfig::from_json("not json"),
            Err(Error::InvalidConfig(_))
        ));
    }
}
