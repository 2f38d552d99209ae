//! Block-cipher chaining modes.
//!
//! Every mode is generic over the [`rijndael_core::BlockCipher`] capability
//! and consumes whole in-memory buffers whose length is a multiple of the
//! cipher block length. CFB decryption additionally offers a thread-parallel
//! path; see [`Cfb::parallel_decrypt`].

#![forbid(unsafe_code)]

mod cfb;
mod ecb;
mod ofb;

pub use crate::cfb::Cfb;
pub use crate::ecb::Ecb;
pub use crate::ofb::Ofb;

use rijndael_core::{Error, Result};

/// Checks the whole-blocks input contract shared by all modes.
fn check_input(len: usize, block_len: usize) -> Result<()> {
    if len % block_len != 0 {
        return Err(Error::InvalidArgument(
            "input length must be a multiple of the cipher block length",
        ));
    }
    Ok(())
}

/// Checks an IV against the cipher block length at mode construction.
fn check_iv(iv_len: usize, block_len: usize) -> Result<()> {
    if iv_len != block_len {
        return Err(Error::InvalidArgument(
            "iv length must equal the cipher block length",
        ));
    }
    Ok(())
}
