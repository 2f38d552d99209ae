//! Cipher feedback mode with a parallel decryption path.

use rayon::prelude::*;
use rijndael_core::{block::xor_into, BlockCipher, Result};

use crate::{check_input, check_iv};

/// CFB: each ciphertext block is the plaintext XORed with the encryption of
/// the previous ciphertext block (the IV for the first).
///
/// Encryption is inherently sequential. Decryption of any block needs only
/// the immediately preceding ciphertext block, which is what makes
/// [`Cfb::parallel_decrypt`] possible.
pub struct Cfb<C> {
    cipher: C,
    iv: Vec<u8>,
}

impl<C: BlockCipher> Cfb<C> {
    /// Wraps a cipher in CFB mode with the given IV.
    pub fn new(cipher: C, iv: &[u8]) -> Result<Self> {
        check_iv(iv.len(), cipher.block_len())?;
        Ok(Self {
            cipher,
            iv: iv.to_vec(),
        })
    }

    /// Encrypts `src`, which must be a multiple of the block length.
    pub fn encrypt(&self, src: &[u8]) -> Result<Vec<u8>> {
        let block_len = self.cipher.block_len();
        check_input(src.len(), block_len)?;
        let mut out = Vec::with_capacity(src.len());
        let mut feedback = self.iv.clone();
        let mut keystream = vec![0u8; block_len];
        for block in src.chunks_exact(block_len) {
            self.cipher.encrypt_block(&feedback, &mut keystream)?;
            xor_into(&mut keystream, block);
            out.extend_from_slice(&keystream);
            feedback.copy_from_slice(&keystream);
        }
        Ok(out)
    }

    /// Decrypts `src` with the mode's own IV.
    pub fn decrypt(&self, src: &[u8]) -> Result<Vec<u8>> {
        self.decrypt_with_iv(src, &self.iv)
    }

    /// Decrypts `src` seeded by an arbitrary IV.
    ///
    /// Passing the ciphertext block immediately preceding `src` as `iv`
    /// decrypts any suffix or interior run of a longer ciphertext; the
    /// parallel path is built on this entry point.
    pub fn decrypt_with_iv(&self, src: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
        let block_len = self.cipher.block_len();
        check_input(src.len(), block_len)?;
        check_iv(iv.len(), block_len)?;
        let mut out = Vec::with_capacity(src.len());
        let mut feedback = iv.to_vec();
        let mut keystream = vec![0u8; block_len];
        for block in src.chunks_exact(block_len) {
            self.cipher.encrypt_block(&feedback, &mut keystream)?;
            xor_into(&mut keystream, block);
            out.extend_from_slice(&keystream);
            feedback.copy_from_slice(block);
        }
        Ok(out)
    }
}

impl<C: BlockCipher + Sync> Cfb<C> {
    /// Decrypts `src` across the available worker threads.
    ///
    /// The worker count is the smaller of the thread pool size and the block
    /// count; with one worker (or fewer blocks than two) this falls back to
    /// the sequential path. Output equals [`Cfb::decrypt`] byte for byte. If
    /// a partition fails, the first failing partition's error is returned and
    /// no output is produced.
    pub fn parallel_decrypt(&self, src: &[u8]) -> Result<Vec<u8>> {
        let block_len = self.cipher.block_len();
        check_input(src.len(), block_len)?;
        let n_blocks = src.len() / block_len;
        self.decrypt_partitioned(src, rayon::current_num_threads().min(n_blocks))
    }

    /// Decrypts `src` split into `partitions` contiguous block ranges.
    ///
    /// Partition 0 is seeded with the mode IV; every later partition is
    /// seeded with the ciphertext block immediately preceding it. Results
    /// are concatenated strictly in partition order.
    pub fn decrypt_partitioned(&self, src: &[u8], partitions: usize) -> Result<Vec<u8>> {
        let block_len = self.cipher.block_len();
        check_input(src.len(), block_len)?;
        let n_blocks = src.len() / block_len;
        let partitions = partitions.clamp(1, n_blocks.max(1));
        if partitions <= 1 {
            return self.decrypt(src);
        }

        let partition_len = (n_blocks / partitions) * block_len;
        let pieces = (0..partitions)
            .into_par_iter()
            .map(|index| {
                let start = index * partition_len;
                let end = if index + 1 == partitions {
                    src.len()
                } else {
                    start + partition_len
                };
                let iv = if index == 0 {
                    &self.iv[..]
                } else {
                    &src[start - block_len..start]
                };
                self.decrypt_with_iv(&src[start..end], iv)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(pieces.concat())
    }
}
