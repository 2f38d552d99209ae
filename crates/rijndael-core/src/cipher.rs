//! Cipher parameterization, key schedule, and the block transform.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::round::{
    add_round_key, inv_mix_columns, inv_shift_rows, inv_sub_bytes, mix_columns, shift_rows,
    sub_bytes,
};
use crate::tables::{round_constants, sbox};

/// Bytes per word of the key and state.
const WORD: usize = 4;

/// Upper bound on the block length supported by the working-state buffer.
pub const MAX_BLOCK_LEN: usize = 32;

/// Cipher geometry: key words, block words, and rounds.
///
/// The three AES variants are three values of this configuration; there is no
/// separate type per key size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CipherParams {
    /// Number of 4-byte words in the key.
    pub nk: usize,
    /// Number of 4-byte words in a block.
    pub nb: usize,
    /// Number of rounds.
    pub nr: usize,
}

impl CipherParams {
    /// AES-128: 4 key words, 4 block words, 10 rounds.
    pub const AES128: Self = Self { nk: 4, nb: 4, nr: 10 };
    /// AES-192: 6 key words, 4 block words, 12 rounds.
    pub const AES192: Self = Self { nk: 6, nb: 4, nr: 12 };
    /// AES-256: 8 key words, 4 block words, 14 rounds.
    pub const AES256: Self = Self { nk: 8, nb: 4, nr: 14 };

    /// Key length in bytes.
    pub const fn key_len(&self) -> usize {
        self.nk * WORD
    }

    /// Block length in bytes.
    pub const fn block_len(&self) -> usize {
        self.nb * WORD
    }
}

/// The capability consumed by chaining modes and key wrapping: a fixed-size
/// single-block transform.
///
/// Implementations must report a nonzero `block_len` and accept exactly
/// `block_len` bytes for `src` and `dst`. `src` and `dst` may alias the same
/// buffer contents (callers pass independent slices).
pub trait BlockCipher {
    /// Block length in bytes.
    fn block_len(&self) -> usize;

    /// Encrypts exactly one block from `src` into `dst`.
    fn encrypt_block(&self, src: &[u8], dst: &mut [u8]) -> Result<()>;

    /// Decrypts exactly one block from `src` into `dst`.
    fn decrypt_block(&self, src: &[u8], dst: &mut [u8]) -> Result<()>;
}

impl<C: BlockCipher + ?Sized> BlockCipher for &C {
    fn block_len(&self) -> usize {
        (**self).block_len()
    }

    fn encrypt_block(&self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        (**self).encrypt_block(src, dst)
    }

    fn decrypt_block(&self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        (**self).decrypt_block(src, dst)
    }
}

/// Generic Rijndael instance.
///
/// Construction runs the key schedule once; afterwards the instance is an
/// immutable, pure transform and can be shared across threads freely.
#[derive(Clone, Debug)]
pub struct Rijndael {
    params: CipherParams,
    round_keys: Vec<u8>,
}

impl Rijndael {
    /// Builds a cipher for the given geometry and key.
    ///
    /// Fails with [`Error::InvalidArgument`] when the key length is not
    /// `4 * nk` or the geometry is outside the supported range.
    pub fn new(params: CipherParams, key: &[u8]) -> Result<Self> {
        let CipherParams { nk, nb, nr } = params;
        if nk == 0 || nb == 0 || nr == 0 || params.block_len() > MAX_BLOCK_LEN {
            return Err(Error::InvalidArgument("unsupported cipher geometry"));
        }
        // The schedule reads round constant (i / nk) - 1 for every word
        // index i that is a multiple of nk; the per-round-count table must
        // cover the largest of them.
        if (nb * (nr + 1) - 1) / nk > nr {
            return Err(Error::InvalidArgument("unsupported cipher geometry"));
        }
        if key.len() != params.key_len() {
            return Err(Error::InvalidArgument("invalid key length"));
        }
        let round_keys = expand_key(params, key);
        Ok(Self { params, round_keys })
    }

    /// AES-128 instance from a 16-byte key.
    pub fn aes128(key: &[u8]) -> Result<Self> {
        Self::new(CipherParams::AES128, key)
    }

    /// AES-192 instance from a 24-byte key.
    pub fn aes192(key: &[u8]) -> Result<Self> {
        Self::new(CipherParams::AES192, key)
    }

    /// AES-256 instance from a 32-byte key.
    pub fn aes256(key: &[u8]) -> Result<Self> {
        Self::new(CipherParams::AES256, key)
    }

    /// The geometry this instance was built with.
    pub fn params(&self) -> CipherParams {
        self.params
    }

    fn round_key(&self, round: usize) -> &[u8] {
        let len = self.params.block_len();
        &self.round_keys[round * len..(round + 1) * len]
    }

    fn check_block(&self, src: &[u8], dst: &[u8]) -> Result<()> {
        let len = self.params.block_len();
        if src.len() != len || dst.len() != len {
            return Err(Error::InvalidArgument("invalid block length"));
        }
        Ok(())
    }

    /// Encrypts a single block from `src` into `dst`.
    pub fn encrypt_block(&self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        self.check_block(src, dst)?;
        let CipherParams { nb, nr, .. } = self.params;
        let mut buf = [0u8; MAX_BLOCK_LEN];
        let state = &mut buf[..self.params.block_len()];
        state.copy_from_slice(src);

        add_round_key(state, self.round_key(0));
        for round in 1..nr {
            sub_bytes(state);
            shift_rows(state, nb);
            mix_columns(state, nb);
            add_round_key(state, self.round_key(round));
        }
        sub_bytes(state);
        shift_rows(state, nb);
        add_round_key(state, self.round_key(nr));

        dst.copy_from_slice(state);
        Ok(())
    }

    /// Decrypts a single block from `src` into `dst`.
    pub fn decrypt_block(&self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        self.check_block(src, dst)?;
        let CipherParams { nb, nr, .. } = self.params;
        let mut buf = [0u8; MAX_BLOCK_LEN];
        let state = &mut buf[..self.params.block_len()];
        state.copy_from_slice(src);

        add_round_key(state, self.round_key(nr));
        for round in (1..nr).rev() {
            inv_shift_rows(state, nb);
            inv_sub_bytes(state);
            add_round_key(state, self.round_key(round));
            inv_mix_columns(state, nb);
        }
        inv_shift_rows(state, nb);
        inv_sub_bytes(state);
        add_round_key(state, self.round_key(0));

        dst.copy_from_slice(state);
        Ok(())
    }
}

impl BlockCipher for Rijndael {
    fn block_len(&self) -> usize {
        self.params.block_len()
    }

    fn encrypt_block(&self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        Rijndael::encrypt_block(self, src, dst)
    }

    fn decrypt_block(&self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        Rijndael::decrypt_block(self, src, dst)
    }
}

/// Expands `key` into `nr + 1` consecutive round keys of `4 * nb` bytes.
fn expand_key(params: CipherParams, key: &[u8]) -> Vec<u8> {
    let CipherParams { nk, nb, nr } = params;
    let n_words = nb * (nr + 1);
    let rconst: Arc<[u8]> = round_constants(nr);

    let mut w = vec![[0u8; WORD]; n_words];
    for (word, chunk) in w.iter_mut().zip(key.chunks_exact(WORD)) {
        word.copy_from_slice(chunk);
    }

    for i in nk..n_words {
        let mut tmp = w[i - 1];
        if i % nk == 0 {
            tmp.rotate_left(1);
            sub_word(&mut tmp);
            tmp[0] ^= rconst[i / nk - 1];
        } else if nk > 6 && i % nk == 4 {
            sub_word(&mut tmp);
        }
        for (t, prev) in tmp.iter_mut().zip(w[i - nk].iter()) {
            *t ^= *prev;
        }
        w[i] = tmp;
    }

    w.into_iter().flatten().collect()
}

fn sub_word(word: &mut [u8; WORD]) {
    for byte in word.iter_mut() {
        *byte = sbox(*byte);
    }
}
