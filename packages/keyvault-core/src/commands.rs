//! # Commands
//!
//! Async entry points for a host application (desktop shell, CLI, RPC).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        COMMAND DISPATCH                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  host ──► commands::decrypt_file(...)      (async, owned inputs)        │
//! │                │                                                        │
//! │                │  passwords / private keys wrapped in Zeroizing         │
//! │                ▼                                                        │
//! │          tokio::task::spawn_blocking                                    │
//! │                │                                                        │
//! │                ▼                                                        │
//! │          KeyVault::decrypt_file(...)       (sync, PBKDF2 + AES-GCM)     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Key derivation takes hundreds of milliseconds at the default iteration
//! count. Every command runs on the blocking pool so the async runtime keeps
//! serving other work, and independent commands proceed in parallel.

use std::path::PathBuf;

use zeroize::Zeroizing;

use crate::error::Result;
use crate::vault::{KeyPairHex, KeyVault, SignatureHex};

async fn run_blocking<T, F>(vault: &KeyVault, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&KeyVault) -> Result<T> + Send + 'static,
{
    let vault = vault.clone();
    tokio::task::spawn_blocking(move || f(&vault)).await?
}

// ============================================================================
// KEY PAIRS
// ============================================================================

/// Generate an Ed25519 key pair, optionally from a hex seed
pub async fn generate_key_pair(vault: &KeyVault, hex_seed: Option<String>) -> Result<KeyPairHex> {
    let hex_seed = hex_seed.map(Zeroizing::new);
    run_blocking(vault, move |v| v.generate_key_pair(hex_seed.as_deref().map(String::as_str))).await
}

/// Generate a key pair and write it sealed under a hex data key
pub async fn generate_key_pair_to_file(
    vault: &KeyVault,
    path: PathBuf,
    hex_key: String,
) -> Result<KeyPairHex> {
    let hex_key = Zeroizing::new(hex_key);
    run_blocking(vault, move |v| v.generate_key_pair_to_file(&path, &hex_key)).await
}

/// Public key for a hex private key
pub async fn public_key(vault: &KeyVault, private_key_hex: String) -> Result<String> {
    let private_key_hex = Zeroizing::new(private_key_hex);
    run_blocking(vault, move |v| v.public_key(&private_key_hex)).await
}

// ============================================================================
// AES KEY FILES
// ============================================================================

/// Generate a random data key and seal it under `password`
pub async fn generate_aes_key(
    vault: &KeyVault,
    path: PathBuf,
    password: String,
    iterations: Option<u32>,
) -> Result<()> {
    let password = Zeroizing::new(password);
    run_blocking(vault, move |v| v.generate_aes_key(&path, &password, iterations)).await
}

/// Unlock an AES-key file and return the data key as hex
pub async fn load_aes_key(
    vault: &KeyVault,
    path: PathBuf,
    password: String,
) -> Result<Zeroizing<String>> {
    let password = Zeroizing::new(password);
    run_blocking(vault, move |v| v.load_aes_key(&path, &password)).await
}

/// Decrypt a key-pair file with the data key held in an AES-key file
pub async fn decrypt_file(
    vault: &KeyVault,
    aes_key_path: PathBuf,
    key_pair_path: PathBuf,
    password: String,
) -> Result<KeyPairHex> {
    let password = Zeroizing::new(password);
    run_blocking(vault, move |v| {
        v.decrypt_file(&aes_key_path, &key_pair_path, &password)
    })
    .await
}

// ============================================================================
// PASSWORD-SEALED PRIVATE KEYS
// ============================================================================

/// Seal a hex private key under `password`; returns its public key
pub async fn seal_private_key(
    vault: &KeyVault,
    path: PathBuf,
    private_key_hex: String,
    password: String,
    iterations: Option<u32>,
) -> Result<String> {
    let private_key_hex = Zeroizing::new(private_key_hex);
    let password = Zeroizing::new(password);
    run_blocking(vault, move |v| {
        v.seal_private_key(&path, &private_key_hex, &password, iterations)
    })
    .await
}

/// Open a password-sealed private key
pub async fn open_private_key(
    vault: &KeyVault,
    path: PathBuf,
    password: String,
) -> Result<KeyPairHex> {
    let password = Zeroizing::new(password);
    run_blocking(vault, move |v| v.open_private_key(&path, &password)).await
}

/// Re-encrypt a container under a new password
pub async fn change_password(
    vault: &KeyVault,
    path: PathBuf,
    old_password: String,
    new_password: String,
    iterations: Option<u32>,
) -> Result<()> {
    let old_password = Zeroizing::new(old_password);
    let new_password = Zeroizing::new(new_password);
    run_blocking(vault, move |v| {
        v.change_password(&path, &old_password, &new_password, iterations)
    })
    .await
}

// ============================================================================
// SIGNING
// ============================================================================

/// Sign `message` with a hex private key
pub async fn sign(
    vault: &KeyVault,
    private_key_hex: String,
    message: Vec<u8>,
) -> Result<SignatureHex> {
    let private_key_hex = Zeroizing::new(private_key_hex);
    run_blocking(vault, move |v| v.sign(&private_key_hex, &message)).await
}

/// Verify a hex signature
///
/// Returns `Ok(false)` for a well-formed signature that does not match.
pub async fn verify(
    vault: &KeyVault,
    public_key_hex: String,
    message: Vec<u8>,
    signature_hex: String,
) -> Result<bool> {
    run_blocking(vault, move |v| v.verify(&public_key_hex, &message, &signature_hex)).await
}

// ============================================================================
// TESTS
// ============================================================================
