//! Electronic code book mode.

use rijndael_core::{BlockCipher, Result};

use crate::check_input;

/// ECB: every block transformed independently, no chaining.
///
/// This is a building block for higher constructions, not a secure mode on
/// its own: equal plaintext blocks produce equal ciphertext blocks.
pub struct Ecb<C> {
    cipher: C,
}

impl<C: BlockCipher> Ecb<C> {
    /// Wraps a cipher in ECB mode.
    pub fn new(cipher: C) -> Self {
        Self { cipher }
    }

    /// Encrypts `src`, which must be a multiple of the block length.
    pub fn encrypt(&self, src: &[u8]) -> Result<Vec<u8>> {
        let block_len = self.cipher.block_len();
        check_input(src.len(), block_len)?;
        let mut out = vec![0u8; src.len()];
        for (src_block, dst_block) in src.chunks_exact(block_len).zip(out.chunks_exact_mut(block_len)) {
            self.cipher.encrypt_block(src_block, dst_block)?;
        }
        Ok(out)
    }

    /// Decrypts `src`, which must be a multiple of the block length.
    pub fn decrypt(&self, src: &[u8]) -> Result<Vec<u8>> {
        let block_len = self.cipher.block_len();
        check_input(src.len(), block_len)?;
        let mut out = vec![0u8; src.len()];
        for (src_block, dst_block) in src.chunks_exact(block_len).zip(out.chunks_exact_mut(block_len)) {
            self.cipher.decrypt_block(src_block, dst_block)?;
        }
        Ok(out)
    }
}
