//! Output feedback mode.

use rijndael_core::{block::xor_into, BlockCipher, Result};

use crate::{check_input, check_iv};

/// OFB: a keystream is generated by repeatedly encrypting the IV, and both
/// directions XOR the input against it.
///
/// Encryption and decryption are the same keystream routine; `decrypt`
/// simply regenerates the keystream from the same IV and XORs again.
pub struct Ofb<C> {
    cipher: C,
    iv: Vec<u8>,
}

impl<C: BlockCipher> Ofb<C> {
    /// Wraps a cipher in OFB mode with the given IV.
    pub fn new(cipher: C, iv: &[u8]) -> Result<Self> {
        check_iv(iv.len(), cipher.block_len())?;
        Ok(Self {
            cipher,
            iv: iv.to_vec(),
        })
    }

    /// Encrypts `src`, which must be a multiple of the block length.
    pub fn encrypt(&self, src: &[u8]) -> Result<Vec<u8>> {
        self.apply_keystream(src)
    }

    /// Decrypts `src` by regenerating the keystream.
    pub fn decrypt(&self, src: &[u8]) -> Result<Vec<u8>> {
        self.apply_keystream(src)
    }

    fn apply_keystream(&self, src: &[u8]) -> Result<Vec<u8>> {
        let block_len = self.cipher.block_len();
        check_input(src.len(), block_len)?;
        let mut out = Vec::with_capacity(src.len());
        let mut feedback = self.iv.clone();
        let mut keystream = vec![0u8; block_len];
        for block in src.chunks_exact(block_len) {
            self.cipher.encrypt_block(&feedback, &mut keystream)?;
            feedback.copy_from_slice(&keystream);
            xor_into(&mut keystream, block);
            out.extend_from_slice(&keystream);
        }
        Ok(out)
    }
}
