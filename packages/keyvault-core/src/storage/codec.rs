//! # Key File Codec
//!
//! Binary layouts of the two on-disk formats.
//!
//! ## AES-Key Container (`KVEC`)
//!
//! ```text
//! ┌───────┬─────────┬──────┬────────────┬──────────┬──────┬───────┬────────┬────────────┬─────┐
//! │ magic │ version │ kind │ iterations │ salt_len │ salt │ nonce │ ct_len │ ciphertext │ tag │
//! │  4 B  │   1 B   │ 1 B  │  u32 (BE)  │   1 B    │  n B │ 12 B  │u32 (BE)│    m B     │16 B │
//! └───────┴─────────┴──────┴────────────┴──────────┴──────┴───────┴────────┴────────────┴─────┘
//! ```
//!
//! ## Key-Pair File (`KVKP`)
//!
//! ```text
//! ┌───────┬─────────┬────────────┬───────┬────────┬────────────┬─────┐
//! │ magic │ version │ public key │ nonce │ ct_len │ ciphertext │ tag │
//! │  4 B  │   1 B   │    32 B    │ 12 B  │u32 (BE)│    m B     │16 B │
//! └───────┴─────────┴────────────┴───────┴────────┴────────────┴─────┘
//! ```
//!
//! Decoding is strict: short input, unknown magic/version/kind, lengths out
//! of range and trailing bytes are all `CorruptFormat`.

use bytes::{Buf, BufMut};

use crate::crypto::{
    ContainerKind, EncryptedKeyContainer, KdfParams, Nonce, SealedKeyPair, CONTAINER_VERSION,
    MAX_ITERATIONS, MAX_SALT_SIZE, MIN_ITERATIONS, MIN_SALT_SIZE, NONCE_SIZE, PUBLIC_KEY_SIZE,
    TAG_SIZE,
};
use crate::error::{Error, Result};

/// Magic bytes of an AES-key container file
pub const CONTAINER_MAGIC: [u8; 4] = *b"KVEC";

/// Magic bytes of a key-pair file
pub const KEY_PAIR_MAGIC: [u8; 4] = *b"KVKP";

/// Maximum ciphertext size (64 KiB)
pub const MAX_CIPHERTEXT_SIZE: usize = 64 * 1024;

// ============================================================================
// ENCODING
// ============================================================================

/// Encode an AES-key container
pub fn encode_container(container: &EncryptedKeyContainer) -> Result<Vec<u8>> {
    let salt = &container.params.salt;
    if salt.len() < MIN_SALT_SIZE || salt.len() > MAX_SALT_SIZE {
        return Err(Error::Internal(format!("salt length {} out of range", salt.len())));
    }
    check_ciphertext_len(container.ciphertext.len())?;

    let header_len = CONTAINER_MAGIC.len() + 7 + salt.len() + NONCE_SIZE + 4;
    let mut buf = Vec::with_capacity(header_len + container.ciphertext.len() + TAG_SIZE);
    buf.put_slice(&CONTAINER_MAGIC);
    buf.put_u8(container.version);
    buf.put_u8(container.kind.as_u8());
    buf.put_u32(container.params.iterations);
    buf.put_u8(salt.len() as u8);
    buf.put_slice(salt);
    buf.put_slice(container.nonce.as_bytes());
    buf.put_u32(container.ciphertext.len() as u32);
    buf.put_slice(&container.ciphertext);
    buf.put_slice(&container.tag);

    Ok(buf)
}

/// Encode a sealed key pair
pub fn encode_key_pair(sealed: &SealedKeyPair) -> Result<Vec<u8>> {
    check_ciphertext_len(sealed.ciphertext.len())?;

    let header_len = KEY_PAIR_MAGIC.len() + 1 + PUBLIC_KEY_SIZE + NONCE_SIZE + 4;
    let mut buf = Vec::with_capacity(header_len + sealed.ciphertext.len() + TAG_SIZE);
    buf.put_slice(&KEY_PAIR_MAGIC);
    buf.put_u8(sealed.version);
    buf.put_slice(&sealed.public_key);
    buf.put_slice(sealed.nonce.as_bytes());
    buf.put_u32(sealed.ciphertext.len() as u32);
    buf.put_slice(&sealed.ciphertext);
    buf.put_slice(&sealed.tag);

    Ok(buf)
}

fn check_ciphertext_len(len: usize) -> Result<()> {
    if len > MAX_CIPHERTEXT_SIZE {
        return Err(Error::Internal(format!(
            "ciphertext too large: {} bytes (max {})",
            len, MAX_CIPHERTEXT_SIZE
        )));
    }
    Ok(())
}

// ============================================================================
// DECODING
// ============================================================================

/// Decode an AES-key container
pub fn decode_container(data: &[u8]) -> Result<EncryptedKeyContainer> {
    let mut buf = data;

    expect_magic(&mut buf, &CONTAINER_MAGIC)?;
    let version = expect_version(&mut buf)?;

    let kind_byte = take_u8(&mut buf, "kind")?;
    let kind = ContainerKind::from_u8(kind_byte)
        .ok_or_else(|| Error::CorruptFormat(format!("unknown container kind {}", kind_byte)))?;

    let iterations = take_u32(&mut buf, "iteration count")?;
    if !(MIN_ITERATIONS..=MAX_ITERATIONS).contains(&iterations) {
        return Err(Error::CorruptFormat(format!(
            "iteration count {} out of range",
            iterations
        )));
    }

    let salt_len = take_u8(&mut buf, "salt length")? as usize;
    if !(MIN_SALT_SIZE..=MAX_SALT_SIZE).contains(&salt_len) {
        return Err(Error::CorruptFormat(format!("salt length {} out of range", salt_len)));
    }
    let salt = take_vec(&mut buf, salt_len, "salt")?;

    let nonce = Nonce::from_bytes(take_array(&mut buf, "nonce")?);
    let ciphertext = take_ciphertext(&mut buf)?;
    let tag = take_array(&mut buf, "tag")?;
    expect_end(&buf)?;

    Ok(EncryptedKeyContainer {
        version,
        kind,
        params: KdfParams { salt, iterations },
        nonce,
        ciphertext,
        tag,
    })
}

/// Decode a sealed key pair
pub fn decode_key_pair(data: &[u8]) -> Result<SealedKeyPair> {
    let mut buf = data;

    expect_magic(&mut buf, &KEY_PAIR_MAGIC)?;
    let version = expect_version(&mut buf)?;
    let public_key = take_array(&mut buf, "public key")?;
    let nonce = Nonce::from_bytes(take_array(&mut buf, "nonce")?);
    let ciphertext = take_ciphertext(&mut buf)?;
    let tag = take_array(&mut buf, "tag")?;
    expect_end(&buf)?;

    Ok(SealedKeyPair {
        version,
        public_key,
        nonce,
        ciphertext,
        tag,
    })
}

// ============================================================================
// READ HELPERS
// ============================================================================

fn ensure(buf: &[u8], needed: usize, what: &str) -> Result<()> {
    if buf.remaining() < needed {
        return Err(Error::CorruptFormat(format!(
            "truncated {}: need {} bytes, {} left",
            what,
            needed,
            buf.remaining()
        )));
    }
    Ok(())
}

fn expect_magic(buf: &mut &[u8], magic: &[u8; 4]) -> Result<()> {
    let found: [u8; 4] = take_array(buf, "magic")?;
    if &found != magic {
        return Err(Error::CorruptFormat("bad magic bytes".into()));
    }
    Ok(())
}

fn expect_version(buf: &mut &[u8]) -> Result<u8> {
    let version = take_u8(buf, "version")?;
    if version != CONTAINER_VERSION {
        return Err(Error::CorruptFormat(format!("unsupported version {}", version)));
    }
    Ok(version)
}

fn expect_end(buf: &[u8]) -> Result<()> {
    if buf.has_remaining() {
        return Err(Error::CorruptFormat(format!(
            "{} trailing bytes",
            buf.remaining()
        )));
    }
    Ok(())
}

fn take_u8(buf: &mut &[u8], what: &str) -> Result<u8> {
    ensure(buf, 1, what)?;
    Ok(buf.get_u8())
}

fn take_u32(buf: &mut &[u8], what: &str) -> Result<u32> {
    ensure(buf, 4, what)?;
    Ok(buf.get_u32())
}

fn take_array<const N: usize>(buf: &mut &[u8], what: &str) -> Result<[u8; N]> {
    ensure(buf, N, what)?;
    let mut out = [0u8; N];
    buf.copy_to_slice(&mut out);
    Ok(out)
}

fn take_vec(buf: &mut &[u8], len: usize, what: &str) -> Result<Vec<u8>> {
    ensure(buf, len, what)?;
    let mut out = vec![0u8; len];
    buf.copy_to_slice(&mut out);
    Ok(out)
}

fn take_ciphertext(buf: &mut &[u8]) -> Result<Vec<u8>> {
    let len = take_u32(buf, "ciphertext length")? as usize;
    if len > MAX_CIPHERTEXT_SIZE {
        return Err(Error::CorruptFormat(format!(
            "ciphertext length {} exceeds maximum {}",
            len, MAX_CIPHERTEXT_SIZE
        )));
    }
    take_vec(buf, len, "ciphertext")
}

// ============================================================================
// TESTS
// ============================================================================
