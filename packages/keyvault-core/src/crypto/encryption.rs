//! # Encryption Module
//!
//! AES-256-GCM sealing of key material at rest.
//!
//! ## Sealing Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      KEY CONTAINER SEALING                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Step 1: Derive key-encryption key (see kdf.rs)                        │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  PBKDF2(password, salt, iterations) → DerivedKey            │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! │                                                                         │
//! │  Step 2: Generate Nonce (unique per seal)                              │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  Random 12 bytes from CSPRNG                                 │       │
//! │  │  (Never a counter, never reused)                             │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! │                                                                         │
//! │  Step 3: Encrypt                                                       │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  AES-256-GCM(                                                │       │
//! │  │    key = derived_key,                                       │       │
//! │  │    nonce = random_nonce,                                    │       │
//! │  │    plaintext = key material,                                │       │
//! │  │    aad = (version || kind || iterations || salt)            │       │
//! │  │  )                                                          │       │
//! │  │           ↓                                                  │       │
//! │  │  Ciphertext + 16-byte Auth Tag                              │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! │                                                                         │
//! │  Output: EncryptedKeyContainer                                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      KEY-PAIR FILE SEALING                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  AES-256-GCM(                                                          │
//! │    key = data key (unlocked from the AES-key container),              │
//! │    nonce = random_nonce,                                              │
//! │    plaintext = Ed25519 private key,                                   │
//! │    aad = (version || public key)                                      │
//! │  )                                                                    │
//! │                                                                         │
//! │  On open the recovered private key must reproduce the stored public   │
//! │  key.                                                                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Properties
//!
//! | Property | Guarantee |
//! |----------|-----------|
//! | Confidentiality | Key material is unreadable without the password |
//! | Integrity | Any modified byte of ciphertext, tag or header is detected |
//! | Fail closed | No partial plaintext is ever returned |
//! | Uniform failure | Wrong password and tampering give the same error |

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce as AesNonce,
};
use rand::RngCore;
use zeroize::{ZeroizeOnDrop, Zeroizing};

use crate::crypto::kdf::{DerivedKey, KdfParams};
use crate::crypto::keys::{decode_hex_32, KeyPair, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE};
use crate::error::{Error, Result};

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes (128 bits)
pub const TAG_SIZE: usize = 16;

/// Size of the encryption key in bytes (256 bits)
pub const KEY_SIZE: usize = 32;

/// Current version of sealed containers
pub const CONTAINER_VERSION: u8 = 1;

const CONTAINER_AAD_LABEL: &[u8] = b"keyvault-container";
const KEY_PAIR_AAD_LABEL: &[u8] = b"keyvault-keypair";

/// A nonce (number used once) for AES-GCM encryption
///
/// **NEVER reuse a nonce with the same key!** Every seal draws a fresh one
/// from the OS CSPRNG.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nonce(pub [u8; NONCE_SIZE]);

impl Nonce {
    /// Generate a cryptographically random nonce
    pub fn random() -> Self {
        let mut bytes = [0u8; NONCE_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from existing bytes
    pub fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }
}

/// An AES-256-GCM data key (the wallet's "AES key")
///
/// Zeroized when dropped.
#[derive(ZeroizeOnDrop)]
pub struct EncryptionKey([u8; KEY_SIZE]);

impl EncryptionKey {
    /// Generate a random data key
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Copy a key out of a decrypted buffer
    ///
    /// The bytes are written straight into the key, so no unzeroized copy
    /// is left behind. `None` unless `bytes` is exactly [`KEY_SIZE`] long.
    pub(crate) fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != KEY_SIZE {
            return None;
        }
        let mut key = Self([0u8; KEY_SIZE]);
        key.0.copy_from_slice(bytes);
        Some(key)
    }

    /// Decode a hex-encoded data key
    ///
    /// ## Errors
    ///
    /// `InvalidSeedEncoding` unless the input is exactly 64 hex characters.
    pub fn from_hex(hex_key: &str) -> Result<Self> {
        let bytes = decode_hex_32(hex_key).map_err(|reason| {
            Error::InvalidSeedEncoding(format!(
                "AES key must be {} hex-encoded bytes: {}",
                KEY_SIZE, reason
            ))
        })?;
        let mut key = Self([0u8; KEY_SIZE]);
        key.0.copy_from_slice(bytes.as_slice());
        Ok(key)
    }

    /// Hex encoding of the key
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.0.as_slice()))
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EncryptionKey(<redacted>)")
    }
}

/// What a container holds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ContainerKind {
    /// A random AES data key
    DataKey = 1,
    /// An Ed25519 private key
    PrivateKey = 2,
}

impl ContainerKind {
    /// Wire value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse a wire value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(ContainerKind::DataKey),
            2 => Some(ContainerKind::PrivateKey),
            _ => None,
        }
    }
}

/// Password-sealed key material
///
/// Everything needed to re-derive the key except the password itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedKeyContainer {
    /// Format version
    pub version: u8,
    /// What the plaintext is
    pub kind: ContainerKind,
    /// Salt and iteration count for the password derivation
    pub params: KdfParams,
    /// AES-GCM nonce
    pub nonce: Nonce,
    /// Encrypted key material (without tag)
    pub ciphertext: Vec<u8>,
    /// AES-GCM authentication tag
    pub tag: [u8; TAG_SIZE],
}

impl EncryptedKeyContainer {
    /// Associated data bound into the tag
    fn associated_data(&self) -> Vec<u8> {
        container_aad(self.version, self.kind, &self.params)
    }
}

fn container_aad(version: u8, kind: ContainerKind, params: &KdfParams) -> Vec<u8> {
    let mut aad = Vec::with_capacity(CONTAINER_AAD_LABEL.len() + 7 + params.salt.len());
    aad.extend_from_slice(CONTAINER_AAD_LABEL);
    aad.push(version);
    aad.push(kind.as_u8());
    aad.extend_from_slice(&params.iterations.to_be_bytes());
    aad.push(params.salt.len() as u8);
    aad.extend_from_slice(&params.salt);
    aad
}

/// Data-key-sealed Ed25519 key pair
///
/// The public key is stored in the clear and authenticated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedKeyPair {
    /// Format version
    pub version: u8,
    /// Ed25519 public key
    pub public_key: [u8; PUBLIC_KEY_SIZE],
    /// AES-GCM nonce
    pub nonce: Nonce,
    /// Encrypted private key (without tag)
    pub ciphertext: Vec<u8>,
    /// AES-GCM authentication tag
    pub tag: [u8; TAG_SIZE],
}

impl SealedKeyPair {
    fn associated_data(&self) -> Vec<u8> {
        key_pair_aad(self.version, &self.public_key)
    }
}

fn key_pair_aad(version: u8, public_key: &[u8; PUBLIC_KEY_SIZE]) -> Vec<u8> {
    let mut aad = Vec::with_capacity(KEY_PAIR_AAD_LABEL.len() + 1 + PUBLIC_KEY_SIZE);
    aad.extend_from_slice(KEY_PAIR_AAD_LABEL);
    aad.push(version);
    aad.extend_from_slice(public_key);
    aad
}

/// Encrypt with a fresh nonce, returning ciphertext and tag separately
fn encrypt_detached(
    key: &[u8; KEY_SIZE],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<(Nonce, Vec<u8>, [u8; TAG_SIZE])> {
    let nonce = Nonce::random();
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| Error::EncryptionFailed(format!("Invalid key: {}", e)))?;

    let payload = Payload {
        msg: plaintext,
        aad,
    };

    let mut sealed = cipher
        .encrypt(AesNonce::from_slice(&nonce.0), payload)
        .map_err(|e| Error::EncryptionFailed(format!("Encryption failed: {}", e)))?;

    let tag_start = sealed
        .len()
        .checked_sub(TAG_SIZE)
        .ok_or_else(|| Error::Internal("AEAD output shorter than its tag".into()))?;
    let mut tag = [0u8; TAG_SIZE];
    tag.copy_from_slice(&sealed[tag_start..]);
    sealed.truncate(tag_start);

    Ok((nonce, sealed, tag))
}

/// Decrypt detached ciphertext and tag, failing closed
fn decrypt_detached(
    key: &[u8; KEY_SIZE],
    nonce: &Nonce,
    ciphertext: &[u8],
    tag: &[u8; TAG_SIZE],
    aad: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| Error::AuthenticationFailed)?;

    let mut combined = Vec::with_capacity(ciphertext.len() + TAG_SIZE);
    combined.extend_from_slice(ciphertext);
    combined.extend_from_slice(tag);

    let payload = Payload {
        msg: &combined,
        aad,
    };

    cipher
        .decrypt(AesNonce::from_slice(&nonce.0), payload)
        .map(Zeroizing::new)
        .map_err(|_| Error::AuthenticationFailed)
}

/// Seal key material under a password-derived key
///
/// Every call uses a fresh random nonce, so sealing the same plaintext twice
/// gives different ciphertexts.
pub fn seal(
    plaintext: &[u8],
    key: &DerivedKey,
    kind: ContainerKind,
) -> Result<EncryptedKeyContainer> {
    let params = key.params().clone();
    let aad = container_aad(CONTAINER_VERSION, kind, &params);
    let (nonce, ciphertext, tag) = encrypt_detached(key.as_bytes(), plaintext, &aad)?;

    tracing::debug!(?kind, iterations = params.iterations, "Sealed key container");

    Ok(EncryptedKeyContainer {
        version: CONTAINER_VERSION,
        kind,
        params,
        nonce,
        ciphertext,
        tag,
    })
}

/// Open a sealed container
///
/// ## Errors
///
/// `AuthenticationFailed` if the key is wrong or any byte of the ciphertext,
/// tag or header was modified. No plaintext is returned in that case.
pub fn open(container: &EncryptedKeyContainer, key: &DerivedKey) -> Result<Zeroizing<Vec<u8>>> {
    if container.version != CONTAINER_VERSION {
        return Err(Error::CorruptFormat(format!(
            "unsupported container version {}",
            container.version
        )));
    }

    let plaintext = decrypt_detached(
        key.as_bytes(),
        &container.nonce,
        &container.ciphertext,
        &container.tag,
        &container.associated_data(),
    );

    if plaintext.is_err() {
        tracing::warn!(kind = ?container.kind, "Key container failed authentication");
    }

    plaintext
}

/// Seal an Ed25519 key pair under a data key
pub fn seal_key_pair(key_pair: &KeyPair, data_key: &EncryptionKey) -> Result<SealedKeyPair> {
    let public_key = key_pair.public_bytes();
    let private_key = key_pair.private_bytes();
    let aad = key_pair_aad(CONTAINER_VERSION, &public_key);

    let (nonce, ciphertext, tag) =
        encrypt_detached(data_key.as_bytes(), private_key.as_slice(), &aad)?;

    tracing::debug!(public_key = %hex::encode(public_key), "Sealed key pair");

    Ok(SealedKeyPair {
        version: CONTAINER_VERSION,
        public_key,
        nonce,
        ciphertext,
        tag,
    })
}

/// Open a sealed key pair with its data key
///
/// ## Errors
///
/// `AuthenticationFailed` if the data key is wrong, the file was modified,
/// or the recovered private key does not match the stored public key.
pub fn open_key_pair(sealed: &SealedKeyPair, data_key: &EncryptionKey) -> Result<KeyPair> {
    if sealed.version != CONTAINER_VERSION {
        return Err(Error::CorruptFormat(format!(
            "unsupported key pair version {}",
            sealed.version
        )));
    }

    let plaintext = decrypt_detached(
        data_key.as_bytes(),
        &sealed.nonce,
        &sealed.ciphertext,
        &sealed.tag,
        &sealed.associated_data(),
    )
    .inspect_err(|_| tracing::warn!("Key pair file failed authentication"))?;

    let private_key: Zeroizing<[u8; PRIVATE_KEY_SIZE]> = Zeroizing::new(
        plaintext
            .as_slice()
            .try_into()
            .map_err(|_| Error::CorruptFormat("sealed private key has the wrong length".into()))?,
    );

    let key_pair = KeyPair::from_private_bytes(&private_key);
    if key_pair.public_bytes() != sealed.public_key {
        tracing::warn!("Recovered private key does not match stored public key");
        return Err(Error::AuthenticationFailed);
    }

    Ok(key_pair)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::MIN_ITERATIONS;

    fn test_key(byte: u8) -> DerivedKey {
        let params = KdfParams {
            salt: vec![9u8; 16],
            iterations: MIN_ITERATIONS,
        };
        DerivedKey::from_raw([byte; 32], params)
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let key = test_key(1);
        let plaintext = b"deadbeef";

        let container = seal(plaintext, &key, ContainerKind::PrivateKey).unwrap();
        let opened = open(&container, &key).unwrap();

        assert_eq!(opened.as_slice(), plaintext);
        assert_eq!(container.kind, ContainerKind::PrivateKey);
        assert_eq!(container.params, *key.params());
        assert_eq!(container.ciphertext.len(), plaintext.len());
    }

    #[test]
    fn test_wrong_key_fails() {
        let container = seal(b"deadbeef", &test_key(1), ContainerKind::DataKey).unwrap();

        let result = open(&container, &test_key(2));
        assert!(matches!(result, Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = test_key(1);
        let container = seal(&[0x42; 32], &key, ContainerKind::DataKey).unwrap();

        for i in 0..container.ciphertext.len() {
            let mut tampered = container.clone();
            tampered.ciphertext[i] ^= 0x01;
            assert!(matches!(open(&tampered, &key), Err(Error::AuthenticationFailed)));
        }
    }

    #[test]
    fn test_tampered_tag_fails() {
        let key = test_key(1);
        let container = seal(&[0x42; 32], &key, ContainerKind::DataKey).unwrap();

        for i in 0..TAG_SIZE {
            let mut tampered = container.clone();
            tampered.tag[i] ^= 0x01;
            assert!(matches!(open(&tampered, &key), Err(Error::AuthenticationFailed)));
        }
    }

    #[test]
    fn test_tampered_header_fails() {
        let key = test_key(1);
        let container = seal(&[0x42; 32], &key, ContainerKind::DataKey).unwrap();

        let mut tampered = container.clone();
        tampered.kind = ContainerKind::PrivateKey;
        assert!(matches!(open(&tampered, &key), Err(Error::AuthenticationFailed)));

        let mut tampered = container.clone();
        tampered.params.iterations += 1;
        assert!(matches!(open(&tampered, &key), Err(Error::AuthenticationFailed)));

        let mut tampered = container.clone();
        tampered.params.salt[0] ^= 0x01;
        assert!(matches!(open(&tampered, &key), Err(Error::AuthenticationFailed)));

        let mut tampered = container;
        tampered.nonce.0[0] ^= 0x01;
        assert!(matches!(open(&tampered, &key), Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let key = test_key(1);
        let mut container = seal(b"x", &key, ContainerKind::DataKey).unwrap();
        container.version = 9;

        assert!(matches!(open(&container, &key), Err(Error::CorruptFormat(_))));
    }

    #[test]
    fn test_different_nonces_produce_different_ciphertext() {
        let key = test_key(1);

        let c1 = seal(b"deadbeef", &key, ContainerKind::DataKey).unwrap();
        let c2 = seal(b"deadbeef", &key, ContainerKind::DataKey).unwrap();

        assert_ne!(c1.nonce, c2.nonce);
        assert_ne!(c1.ciphertext, c2.ciphertext);
    }

    #[test]
    fn test_data_key_hex() {
        let key = EncryptionKey::generate();
        let restored = EncryptionKey::from_hex(&key.to_hex()).unwrap();
        assert_eq!(key.as_bytes(), restored.as_bytes());

        assert!(matches!(
            EncryptionKey::from_hex("deadbeef"),
            Err(Error::InvalidSeedEncoding(_))
        ));
        assert_eq!(format!("{:?}", key), "EncryptionKey(<redacted>)");
    }

    #[test]
    fn test_key_pair_roundtrip() {
        let data_key = EncryptionKey::generate();
        let key_pair = KeyPair::generate();

        let sealed = seal_key_pair(&key_pair, &data_key).unwrap();
        let opened = open_key_pair(&sealed, &data_key).unwrap();

        assert_eq!(sealed.public_key, key_pair.public_bytes());
        assert_eq!(*opened.private_bytes(), *key_pair.private_bytes());
    }

    #[test]
    fn test_key_pair_wrong_data_key_fails() {
        let sealed = seal_key_pair(&KeyPair::generate(), &EncryptionKey::generate()).unwrap();

        let result = open_key_pair(&sealed, &EncryptionKey::generate());
        assert!(matches!(result, Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn test_key_pair_swapped_public_key_fails() {
        let data_key = EncryptionKey::generate();
        let mut sealed = seal_key_pair(&KeyPair::generate(), &data_key).unwrap();
        sealed.public_key = KeyPair::generate().public_bytes();

        let result = open_key_pair(&sealed, &data_key);
        assert!(matches!(result, Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn test_data_key_from_slice() {
        let key = EncryptionKey::generate();

        let copied = EncryptionKey::from_slice(key.as_bytes()).unwrap();
        assert_eq!(copied.as_bytes(), key.as_bytes());

        assert!(EncryptionKey::from_slice(&[0u8; 31]).is_none());
        assert!(EncryptionKey::from_slice(&[0u8; 33]).is_none());
    }

    #[test]
    fn test_key_pair_tampered_ciphertext_fails() {
        let data_key = EncryptionKey::generate();
        let sealed = seal_key_pair(&KeyPair::generate(), &data_key).unwrap();

        for i in 0..sealed.ciphertext.len() {
            let mut tampered = sealed.clone();
            tampered.ciphertext[i] ^= 0x01;

            let result = open_key_pair(&tampered, &data_key);
            assert!(
                matches!(result, Err(Error::AuthenticationFailed)),
                "flipping ciphertext byte {} was not detected",
                i
            );
        }
    }

    #[test]
    fn test_key_pair_tampered_tag_fails() {
        let data_key = EncryptionKey::generate();
        let sealed = seal_key_pair(&KeyPair::generate(), &data_key).unwrap();

        for i in 0..TAG_SIZE {
            let mut tampered = sealed.clone();
            tampered.tag[i] ^= 0x80;

            let result = open_key_pair(&tampered, &data_key);
            assert!(
                matches!(result, Err(Error::AuthenticationFailed)),
                "flipping tag byte {} was not detected",
                i
            );
        }
    }

    #[test]
    fn test_key_pair_tampered_nonce_fails() {
        let data_key = EncryptionKey::generate();
        let mut sealed = seal_key_pair(&KeyPair::generate(), &data_key).unwrap();
        sealed.nonce.0[0] ^= 0x01;

        let result = open_key_pair(&sealed, &data_key);
        assert!(matches!(result, Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn test_container_kind_wire_values() {
        assert_eq!(ContainerKind::from_u8(1), Some(ContainerKind::DataKey));
        assert_eq!(ContainerKind::from_u8(2), Some(ContainerKind::PrivateKey));
        assert_eq!(ContainerKind::from_u8(0), None);
        assert_eq!(ContainerKind::PrivateKey.as_u8(), 2);
    }
}
