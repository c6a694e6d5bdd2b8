//! # Hashing
//!
//! Double SHA-256 and the merkle root built from it.
//!
//! ```text
//! level 0:   a        b        c
//!            │        │        │
//!            ▼        ▼        ▼
//! level 1:  H(a) ‖ H(b)      H(c) ‖ H(c)      H = SHA-256(SHA-256(x))
//!                 │                │
//!                 ▼                ▼
//! level 2:  H(H(a)‖H(b)) ‖ H(H(c)‖H(c))
//!                        │
//!                        ▼
//! root:                  H(level 2)
//! ```
//!
//! Each level hashes every entry and concatenates neighbours in pairs; an odd
//! entry is paired with itself. A single remaining entry is hashed once more
//! to give the root.

use sha2::{Digest, Sha256};

/// Size of a double SHA-256 digest
pub const HASH_SIZE: usize = 32;

/// SHA-256 applied twice
pub fn double_sha256(data: &[u8]) -> [u8; HASH_SIZE] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

/// Merkle root of `leaves`
///
/// An empty list has the all-zero root.
pub fn merkle_root<T: AsRef<[u8]>>(leaves: &[T]) -> [u8; HASH_SIZE] {
    if leaves.is_empty() {
        return [0u8; HASH_SIZE];
    }

    let mut level: Vec<Vec<u8>> = leaves.iter().map(|leaf| leaf.as_ref().to_vec()).collect();

    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                let left = double_sha256(&pair[0]);
                let right = pair.get(1).map(|right| double_sha256(right)).unwrap_or(left);

                let mut combined = Vec::with_capacity(2 * HASH_SIZE);
                combined.extend_from_slice(&left);
                combined.extend_from_slice(&right);
                combined
            })
            .collect();
    }

    double_sha256(&level[0])
}
