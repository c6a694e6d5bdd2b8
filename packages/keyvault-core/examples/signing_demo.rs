//! # Digital Signature Demo
//!
//! Demonstrates Ed25519 signing and verification with hex-encoded keys.
//!
//! ## Run
//!
//! ```bash
//! cargo run --example signing_demo
//! ```

use keyvault_core::crypto::{sign, verify, verify_hex, KeyPair, Verification};
use keyvault_core::KeyVault;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,keyvault_core=debug".into()),
        )
        .init();

    println!("=== Keyvault Core: Digital Signature Demo ===\n");

    // Step 1: Deterministic key pair from a seed
    println!("Step 1: Creating Ed25519 key pair from a seed...");

    let seed_hex = "2a".repeat(32); // In production, use secure random
    let keypair = KeyPair::from_seed_hex(&seed_hex).expect("Failed to create key pair");

    println!("  Public key (hex): {}", keypair.public_hex());
    println!();

    // Step 2: Sign a message
    println!("Step 2: Signing a message...");

    let message = b"transfer 10 to alice";
    println!("  Message: \"{}\"", String::from_utf8_lossy(message));

    let signature = sign(&keypair, message);

    println!("  R (hex): {}", signature.r_hex());
    println!("  S (hex): {}", signature.s_hex());
    println!("  Signature length: {} bytes", signature.as_bytes().len());
    println!();

    // Step 3: Verify
    println!("Step 3: Verifying the signature...");

    match verify(&keypair.public_key(), message, &signature) {
        Verification::Valid => println!("  [OK] Signature is valid!"),
        other => println!("  [FAILED] Unexpected result: {:?}", other),
    }
    println!();

    // Step 4: Forgery detection
    println!("Step 4: Forgery detection...");

    let tampered = b"transfer 99 to alice";
    match verify(&keypair.public_key(), tampered, &signature) {
        Verification::Invalid => println!("  [OK] Tampered message detected - signature invalid!"),
        other => println!("  [FAILED] Tampered message gave {:?}", other),
    }

    let stranger = KeyPair::generate();
    match verify(&stranger.public_key(), message, &signature) {
        Verification::Invalid => println!("  [OK] Wrong public key detected - signature invalid!"),
        other => println!("  [FAILED] Wrong public key gave {:?}", other),
    }

    match verify_hex("not-hex", message, &signature.to_hex()) {
        Verification::Malformed(reason) => println!("  [OK] Malformed input rejected: {}", reason),
        other => println!("  [FAILED] Malformed input gave {:?}", other),
    }
    println!();

    // Step 5: The same flow through the vault's hex interface
    println!("Step 5: Signing through KeyVault...");

    let vault = KeyVault::default();
    let private_hex = keypair.private_hex();
    let signed = vault.sign(&private_hex, message).expect("Failed to sign");
    let valid = vault
        .verify(&signed.public_key, message, &signed.signature)
        .expect("Failed to verify");

    println!("  Signature: {}...", &signed.signature[..32]);
    println!("  Valid: {}", if valid { "[OK]" } else { "[FAILED]" });
    println!();

    println!("=== Example Complete ===");
}
