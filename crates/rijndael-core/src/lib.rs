//! Generic Rijndael implementation with derived substitution tables.
//!
//! This crate provides the cipher core shared across the workspace:
//! - GF(2^8) polynomial arithmetic ([`gf256`]).
//! - S-box, inverse S-box, and round-constant tables computed from the field
//!   arithmetic at first use, never hard-coded.
//! - A parameterizable key schedule and single-block encrypt/decrypt covering
//!   AES-128, AES-192, and AES-256 as three configurations of one transform.
//! - The [`BlockCipher`] capability consumed by the chaining-mode and
//!   key-wrap crates.
//!
//! The implementation aims for clarity and testability rather than
//! constant-time guarantees; it should not be treated as side-channel
//! hardened.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod block;
mod cipher;
mod error;
pub mod gf256;
mod round;
mod tables;

pub use crate::cipher::{BlockCipher, CipherParams, Rijndael, MAX_BLOCK_LEN};
pub use crate::error::{Error, Result};
