//! # Storage Module
//!
//! On-disk formats and file handling for sealed key material.
//!
//! ## Storage Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         STORAGE SYSTEM                                  │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  AES-Key File ("KVEC")                                          │   │
//! │  │  ─────────────────────                                           │   │
//! │  │  Random data key sealed under a password-derived key.          │   │
//! │  │  Carries its own salt and iteration count.                     │   │
//! │  │  The same layout holds password-sealed private keys.           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Key-Pair File ("KVKP")                                         │   │
//! │  │  ──────────────────────                                          │   │
//! │  │  Ed25519 private key sealed under the data key.                │   │
//! │  │  Public key stored in the clear and authenticated.             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  codec.rs       byte layouts, strict decoding                          │
//! │  file_store.rs  atomic locked writes and updates, lock-free reads      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod codec;
mod file_store;

pub use file_store::{
    read_container, read_key_pair, update_container, write_container, write_key_pair,
};
