//! # Cryptography Module
//!
//! All cryptographic primitives used by the key-custody engine.
//!
//! ## Security Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CRYPTOGRAPHIC ARCHITECTURE                           │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    KEY HIERARCHY                                │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │  Password + Salt + Iterations                                  │   │
//! │  │                          │                                      │   │
//! │  │                          ▼  PBKDF2-HMAC-SHA256                  │   │
//! │  │  ┌─────────────────────────────────────────────────────────┐   │   │
//! │  │  │           DerivedKey (key-encryption key)                │   │   │
//! │  │  └─────────────────────────────────────────────────────────┘   │   │
//! │  │                          │ AES-256-GCM                          │   │
//! │  │                          ▼                                      │   │
//! │  │  ┌─────────────────────────────────────────────────────────┐   │   │
//! │  │  │           Data Key ("AES key" file)                      │   │   │
//! │  │  └─────────────────────────────────────────────────────────┘   │   │
//! │  │                          │ AES-256-GCM                          │   │
//! │  │                          ▼                                      │   │
//! │  │  ┌─────────────────────────────────────────────────────────┐   │   │
//! │  │  │           Ed25519 Private Key (key-pair file)            │   │   │
//! │  │  └─────────────────────────────────────────────────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 SIGNATURE SCHEME                                │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │  • Curve: Curve25519 (Ed25519 form)                            │   │
//! │  │  • Signature: R ‖ S, 64 bytes                                  │   │
//! │  │  • Public key size: 32 bytes                                   │   │
//! │  │  • Deterministic (same message = same signature)              │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm Choices
//!
//! | Algorithm | Purpose |
//! |-----------|---------|
//! | PBKDF2-HMAC-SHA256 | Password → key-encryption key |
//! | AES-256-GCM | Sealing key material at rest |
//! | Ed25519 | Signing |
//! | HKDF-SHA256 | Seed → signing key |
//! | Double SHA-256 | Digests and merkle roots |
//!
//! ## Security Considerations
//!
//! 1. **Key Zeroization**: All secret keys are zeroized when dropped
//! 2. **Constant-Time Operations**: Using dalek for constant-time crypto
//! 3. **Secure Random**: Using `rand::rngs::OsRng` for salts, nonces and keys
//! 4. **No Nonce Reuse**: A fresh random nonce for every seal

mod encryption;
mod hash;
mod kdf;
mod keys;
mod signing;

pub use encryption::{
    open, open_key_pair, seal, seal_key_pair, ContainerKind, EncryptedKeyContainer, EncryptionKey,
    Nonce, SealedKeyPair, CONTAINER_VERSION, KEY_SIZE, NONCE_SIZE, TAG_SIZE,
};
pub use hash::{double_sha256, merkle_root, HASH_SIZE};
pub use kdf::{
    derive, derive_from_params, derive_signing_seed, generate_salt, DerivedKey, KdfParams,
    DEFAULT_ITERATIONS, MAX_ITERATIONS, MAX_SALT_SIZE, MIN_ITERATIONS, MIN_SALT_SIZE, SALT_SIZE,
};
pub use keys::{KeyPair, PublicKey, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE, SEED_SIZE};
pub use signing::{sign, verify, verify_hex, Signature, Verification, SIGNATURE_SIZE};
