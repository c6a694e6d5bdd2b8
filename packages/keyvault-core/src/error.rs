//! # Error Handling
//!
//! Error types for the key-custody engine.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Parameter Errors                                                  │
//! │  │   └── WeakParameters        - KDF parameters out of range           │
//! │  │                                                                      │
//! │  ├── Crypto Errors                                                     │
//! │  │   ├── AuthenticationFailed  - Wrong password or tampered data       │
//! │  │   ├── Malformed             - Signature inputs cannot be checked    │
//! │  │   └── EncryptionFailed      - AEAD refused to encrypt               │
//! │  │                                                                      │
//! │  ├── Storage Errors                                                    │
//! │  │   ├── CorruptFormat         - Bytes on disk are not a key file      │
//! │  │   └── Io                    - Filesystem failure                    │
//! │  │                                                                      │
//! │  ├── Encoding Errors                                                   │
//! │  │   ├── InvalidSeedEncoding   - Bad hex seed / AES key                │
//! │  │   └── InvalidKeyEncoding    - Bad hex private key                   │
//! │  │                                                                      │
//! │  ├── Configuration Errors                                              │
//! │  │   └── InvalidConfig         - Rejected VaultConfig                  │
//! │  │                                                                      │
//! │  └── Internal Errors                                                   │
//! │      └── Internal              - Worker task failure                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Handling Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ERROR HANDLING FLOW                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Internal (Rust)              Command Boundary           Host (UI)     │
//! │  ──────────────────────────────────────────────────────────────────     │
//! │                                                                         │
//! │  Result<T, Error>  ──────►  FfiError { code, msg }  ──────►  reject()  │
//! │                                                                         │
//! │  Example:                                                              │
//! │  Err(Error::AuthenticationFailed)  →  { code: 200, message: "..." }   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No message produced here ever contains a password, key bytes or
//! plaintext. A wrong password and tampered ciphertext produce the same
//! error.

use serde::Serialize;
use thiserror::Error;

/// Result type alias for key-custody operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the key-custody engine
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Parameter Errors (100-199)
    // ========================================================================

    /// Key-derivation parameters are outside the accepted range
    #[error("Weak key derivation parameters: {0}")]
    WeakParameters(String),

    // ========================================================================
    // Crypto Errors (200-299)
    // ========================================================================

    /// Decryption failed; wrong password or the data was modified
    #[error("Authentication failed: wrong password or tampered data")]
    AuthenticationFailed,

    /// Verification inputs could not be decoded
    #[error("Malformed input: {0}")]
    Malformed(String),

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    // ========================================================================
    // Storage Errors (300-399)
    // ========================================================================

    /// The file does not hold a well-formed key container
    #[error("Corrupt key file: {0}")]
    CorruptFormat(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(String),

    // ========================================================================
    // Encoding Errors (400-499)
    // ========================================================================

    /// Seed or AES key is not valid hex of the expected length
    #[error("Invalid seed encoding: {0}")]
    InvalidSeedEncoding(String),

    /// Private key is not valid hex of the expected length
    #[error("Invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    // ========================================================================
    // Configuration Errors (500-599)
    // ========================================================================

    /// Configuration was rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Internal Errors (900-999)
    // ========================================================================

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the error code for the command boundary
    ///
    /// Error codes are organized by category:
    /// - 100-199: Parameters
    /// - 200-299: Crypto
    /// - 300-399: Storage
    /// - 400-499: Encoding
    /// - 500-599: Configuration
    /// - 900-999: Internal
    pub fn code(&self) -> i32 {
        match self {
            Error::WeakParameters(_) => 100,

            Error::AuthenticationFailed => 200,
            Error::Malformed(_) => 201,
            Error::EncryptionFailed(_) => 202,

            Error::CorruptFormat(_) => 300,
            Error::Io(_) => 301,

            Error::InvalidSeedEncoding(_) => 400,
            Error::InvalidKeyEncoding(_) => 401,

            Error::InvalidConfig(_) => 500,

            Error::Internal(_) => 900,
        }
    }

    /// Check if this error is recoverable
    ///
    /// Only filesystem errors are worth retrying; everything else will fail
    /// the same way again.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Io(_))
    }

    /// Check if this error requires user action
    pub fn requires_user_action(&self) -> bool {
        matches!(
            self,
            Error::AuthenticationFailed
                | Error::WeakParameters(_)
                | Error::InvalidSeedEncoding(_)
                | Error::InvalidKeyEncoding(_)
        )
    }
}

// ============================================================================
// ERROR CONVERSIONS
// ============================================================================

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            Error::Internal("blocking task panicked".into())
        } else {
            Error::Internal("blocking task was cancelled".into())
        }
    }
}

// ============================================================================
// FFI ERROR REPRESENTATION
// ============================================================================

/// Host-friendly error representation
///
/// Serializes to `{ "code": 200, "message": "...", "recoverable": false }`
/// for hosts that reject invoked commands with a JSON payload.
#[derive(Debug, Clone, Serialize)]
#[repr(C)]
pub struct FfiError {
    /// Numeric error code
    pub code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the error is recoverable
    pub recoverable: bool,
}

impl From<Error> for FfiError {
    fn from(err: Error) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
