//! # Key Custody Demo
//!
//! Walks through the full custody chain: a password-protected AES-key file,
//! a key-pair file sealed under that AES key, decryption, and signing.
//!
//! ## Run
//!
//! ```bash
//! RUST_LOG=info,keyvault_core=debug cargo run --example key_custody_demo
//! ```

use keyvault_core::commands;
use keyvault_core::{Error, KeyVault, VaultConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,keyvault_core=debug".into()),
        )
        .init();

    println!("=== Keyvault Core: Key Custody Demo ===\n");

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let aes_path = dir.path().join("wallet.aes");
    let key_path = dir.path().join("wallet.keys");

    // Lowest accepted cost so the demo runs quickly
    let config = VaultConfig::default().with_default_iterations(100_000);
    let vault = KeyVault::new(config).expect("Invalid config");

    // Step 1: AES-key file
    println!("Step 1: Generating password-protected AES key...");

    commands::generate_aes_key(&vault, aes_path.clone(), "correct-horse".into(), None)
        .await
        .expect("Failed to generate AES key");

    println!("  Written to: {}", aes_path.display());
    println!();

    // Step 2: Key-pair file
    println!("Step 2: Generating key pair sealed under the AES key...");

    let data_key = commands::load_aes_key(&vault, aes_path.clone(), "correct-horse".into())
        .await
        .expect("Failed to unlock AES key");
    let generated = commands::generate_key_pair_to_file(&vault, key_path.clone(), data_key.to_string())
        .await
        .expect("Failed to generate key pair");

    println!("  Public key: {}", generated.public_key);
    println!("  Written to: {}", key_path.display());
    println!();

    // Step 3: Decrypt
    println!("Step 3: Decrypting the key-pair file...");

    let decrypted = commands::decrypt_file(
        &vault,
        aes_path.clone(),
        key_path.clone(),
        "correct-horse".into(),
    )
    .await
    .expect("Failed to decrypt key pair");

    let matches = decrypted.public_key == generated.public_key;
    println!("  Public key matches: {}", if matches { "[OK]" } else { "[FAILED]" });
    println!();

    // Step 4: Wrong password
    println!("Step 4: Trying a wrong password...");

    match commands::decrypt_file(&vault, aes_path.clone(), key_path, "wrong-password".into()).await {
        Err(Error::AuthenticationFailed) => println!("  [OK] Wrong password rejected"),
        Err(e) => println!("  [FAILED] Unexpected error: {}", e),
        Ok(_) => println!("  [FAILED] Wrong password was accepted!"),
    }
    println!();

    // Step 5: Sign and verify
    println!("Step 5: Signing with the decrypted key...");

    let message = b"transfer 10 to alice".to_vec();
    let signed = commands::sign(&vault, decrypted.private_key.clone(), message.clone())
        .await
        .expect("Failed to sign");
    let valid = commands::verify(&vault, signed.public_key.clone(), message, signed.signature.clone())
        .await
        .expect("Failed to verify");

    println!("  Signature: {}...", &signed.signature[..32]);
    println!("  Valid: {}", if valid { "[OK]" } else { "[FAILED]" });
    println!();

    // Step 6: Rotate the password
    println!("Step 6: Changing the AES-key file password...");

    commands::change_password(
        &vault,
        aes_path.clone(),
        "correct-horse".into(),
        "battery-staple".into(),
        None,
    )
    .await
    .expect("Failed to change password");

    let rotated = commands::load_aes_key(&vault, aes_path, "battery-staple".into())
        .await
        .expect("Failed to unlock with new password");
    let same = *rotated == *data_key;
    println!("  Same data key under new password: {}", if same { "[OK]" } else { "[FAILED]" });
    println!();

    println!("=== Example Complete ===");
}
