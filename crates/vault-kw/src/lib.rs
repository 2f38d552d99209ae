//! NIST SP 800-38F key wrapping over AES-256.
//!
//! Two constructions are provided:
//! - [`wrap_key`] / [`unwrap_key`]: KW, for key data that is a multiple of
//!   eight bytes and at least 24 bytes long.
//! - [`wrap_key_padded`] / [`unwrap_key_padded`]: KWP, for key data of any
//!   length from one byte up, padded internally to whole semiblocks.
//!
//! Every integrity failure on unwrap (wrong key, corrupted ciphertext, bad
//! header, bad padding) reports the same undifferentiated error, so the
//! failure mode cannot be used as an unwrapping oracle. The comparisons are
//! plain byte compares, not constant-time ones.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use rijndael_core::{block::xor_into, Error, Result, Rijndael};

/// Key-wrap operates on 8-byte semiblocks, half the AES block length.
const SEMIBLOCK: usize = 8;

/// KW requires at least three semiblocks of input.
const MIN_WRAP_SEMIBLOCKS: usize = 3;

/// Default integrity check value prepended by KW (SP 800-38F section 6.2).
const ICV1: [u8; SEMIBLOCK] = [0xA6; SEMIBLOCK];

/// Header magic prepended by KWP (SP 800-38F section 6.3).
const ICV2: [u8; 4] = [0xA6, 0x59, 0x59, 0xA6];

const UNWRAP_FAILED: &str = "failed to unwrap key";

/// Wraps `plain` under the AES-256 key-encryption key `kek`.
///
/// `plain` must be a multiple of eight bytes and at least 24 bytes long; the
/// output is eight bytes longer than the input.
pub fn wrap_key(plain: &[u8], kek: &[u8]) -> Result<Vec<u8>> {
    if plain.len() % SEMIBLOCK != 0 {
        return Err(Error::InvalidArgument(
            "input length must be a multiple of eight bytes",
        ));
    }
    if plain.len() / SEMIBLOCK < MIN_WRAP_SEMIBLOCKS {
        return Err(Error::InvalidArgument(
            "input must span at least three semiblocks",
        ));
    }
    let cipher = Rijndael::aes256(kek)?;
    let mut extended = Vec::with_capacity(SEMIBLOCK + plain.len());
    extended.extend_from_slice(&ICV1);
    extended.extend_from_slice(plain);
    wrap_semiblocks(&extended, &cipher)
}

/// Unwraps KW output and verifies its integrity register.
///
/// Any mismatch, whether from a wrong `kek`, a tampered `wrapped`, or a
/// malformed input, yields the same [`Error::InvalidArgument`].
pub fn unwrap_key(wrapped: &[u8], kek: &[u8]) -> Result<Vec<u8>> {
    if wrapped.len() % SEMIBLOCK != 0
        || wrapped.len() / SEMIBLOCK < MIN_WRAP_SEMIBLOCKS + 1
    {
        return Err(Error::InvalidArgument(UNWRAP_FAILED));
    }
    let cipher = Rijndael::aes256(kek)?;
    let recovered = unwrap_semiblocks(wrapped, &cipher)?;
    if recovered[..SEMIBLOCK] != ICV1 {
        return Err(Error::InvalidArgument(UNWRAP_FAILED));
    }
    Ok(recovered[SEMIBLOCK..].to_vec())
}

/// Wraps `plain` of any length from one byte up (KWP).
///
/// The input is framed with the ICV2 magic and a 32-bit big-endian length,
/// then zero-padded to whole semiblocks. A frame of exactly two semiblocks is
/// a single AES block and is encrypted directly; longer frames go through the
/// wrap function.
pub fn wrap_key_padded(plain: &[u8], kek: &[u8]) -> Result<Vec<u8>> {
    if plain.is_empty() {
        return Err(Error::InvalidArgument("input must not be empty"));
    }
    let declared = u32::try_from(plain.len())
        .map_err(|_| Error::InvalidArgument("input too long for the 32-bit length field"))?;
    let padded_len = SEMIBLOCK + plain.len().div_ceil(SEMIBLOCK) * SEMIBLOCK;

    let mut padded = Vec::with_capacity(padded_len);
    padded.extend_from_slice(&ICV2);
    padded.extend_from_slice(&declared.to_be_bytes());
    padded.extend_from_slice(plain);
    padded.resize(padded_len, 0);

    let cipher = Rijndael::aes256(kek)?;
    if padded.len() == 2 * SEMIBLOCK {
        let mut out = vec![0u8; 2 * SEMIBLOCK];
        cipher.encrypt_block(&padded, &mut out)?;
        Ok(out)
    } else {
        wrap_semiblocks(&padded, &cipher)
    }
}

/// Unwraps KWP output, verifying magic, declared length, and zero padding.
pub fn unwrap_key_padded(wrapped: &[u8], kek: &[u8]) -> Result<Vec<u8>> {
    let n_semiblocks = wrapped.len() / SEMIBLOCK;
    if wrapped.len() % SEMIBLOCK != 0 || n_semiblocks < 2 {
        return Err(Error::InvalidArgument(UNWRAP_FAILED));
    }
    let cipher = Rijndael::aes256(kek)?;
    let padded = if n_semiblocks == 2 {
        let mut out = vec![0u8; 2 * SEMIBLOCK];
        cipher.decrypt_block(wrapped, &mut out)?;
        out
    } else {
        unwrap_semiblocks(wrapped, &cipher)?
    };

    if padded[..ICV2.len()] != ICV2 {
        return Err(Error::InvalidArgument(UNWRAP_FAILED));
    }
    let mut length_bytes = [0u8; 4];
    length_bytes.copy_from_slice(&padded[ICV2.len()..SEMIBLOCK]);
    let declared = u32::from_be_bytes(length_bytes) as usize;

    let body_len = padded.len() - SEMIBLOCK;
    let pad_len = body_len
        .checked_sub(declared)
        .ok_or(Error::InvalidArgument(UNWRAP_FAILED))?;
    if pad_len >= SEMIBLOCK {
        return Err(Error::InvalidArgument(UNWRAP_FAILED));
    }
    if padded[SEMIBLOCK + declared..].iter().any(|&b| b != 0) {
        return Err(Error::InvalidArgument(UNWRAP_FAILED));
    }
    Ok(padded[SEMIBLOCK..SEMIBLOCK + declared].to_vec())
}

/// The W function of SP 800-38F: 6(n-1) Feistel-like passes over the
/// semiblock register file.
fn wrap_semiblocks(data: &[u8], cipher: &Rijndael) -> Result<Vec<u8>> {
    let n_semiblocks = data.len() / SEMIBLOCK;
    let mut register = [0u8; SEMIBLOCK];
    register.copy_from_slice(&data[..SEMIBLOCK]);
    let mut rest = collect_semiblocks(&data[SEMIBLOCK..]);

    let mut buf = [0u8; 2 * SEMIBLOCK];
    let mut ciphered = [0u8; 2 * SEMIBLOCK];
    let iterations = (6 * (n_semiblocks - 1)) as u64;
    for t in 1..=iterations {
        buf[..SEMIBLOCK].copy_from_slice(&register);
        buf[SEMIBLOCK..].copy_from_slice(&rest[0]);
        cipher.encrypt_block(&buf, &mut ciphered)?;
        register.copy_from_slice(&ciphered[..SEMIBLOCK]);
        xor_into(&mut register, &t.to_be_bytes());
        rest.rotate_left(1);
        let last = rest.len() - 1;
        rest[last].copy_from_slice(&ciphered[SEMIBLOCK..]);
    }

    Ok(join_semiblocks(&register, &rest))
}

/// The inverse W function: the same passes unwound, t counting down.
fn unwrap_semiblocks(data: &[u8], cipher: &Rijndael) -> Result<Vec<u8>> {
    let n_semiblocks = data.len() / SEMIBLOCK;
    let mut register = [0u8; SEMIBLOCK];
    register.copy_from_slice(&data[..SEMIBLOCK]);
    let mut rest = collect_semiblocks(&data[SEMIBLOCK..]);

    let mut buf = [0u8; 2 * SEMIBLOCK];
    let mut deciphered = [0u8; 2 * SEMIBLOCK];
    let iterations = (6 * (n_semiblocks - 1)) as u64;
    for t in (1..=iterations).rev() {
        xor_into(&mut register, &t.to_be_bytes());
        buf[..SEMIBLOCK].copy_from_slice(&register);
        buf[SEMIBLOCK..].copy_from_slice(&rest[rest.len() - 1]);
        cipher.decrypt_block(&buf, &mut deciphered)?;
        register.copy_from_slice(&deciphered[..SEMIBLOCK]);
        rest.rotate_right(1);
        rest[0].copy_from_slice(&deciphered[SEMIBLOCK..]);
    }

    Ok(join_semiblocks(&register, &rest))
}

fn collect_semiblocks(data: &[u8]) -> Vec<[u8; SEMIBLOCK]> {
    data.chunks_exact(SEMIBLOCK)
        .map(|chunk| {
            let mut semiblock = [0u8; SEMIBLOCK];
            semiblock.copy_from_slice(chunk);
            semiblock
        })
        .collect()
}

fn join_semiblocks(register: &[u8; SEMIBLOCK], rest: &[[u8; SEMIBLOCK]]) -> Vec<u8> {
    let mut out = Vec::with_capacity(SEMIBLOCK * (1 + rest.len()));
    out.extend_from_slice(register);
    for semiblock in rest {
        out.extend_from_slice(semiblock);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    fn rfc3394_kek() -> Vec<u8> {
        hex::decode("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f")
            .unwrap()
    }

    #[test]
    fn wraps_192_bit_data_like_rfc3394() {
        let plain = hex::decode("00112233445566778899aabbccddeeff0001020304050607").unwrap();
        let wrapped = wrap_key(&plain, &rfc3394_kek()).unwrap();
        assert_eq!(
            hex::encode(wrapped),
            "a8f9bc1612c68b3ff6e6f4fbe30e71e4769c8b80a32cb8958cd5d17d6b254da1"
        );
    }

    #[test]
    fn wraps_256_bit_data_like_rfc3394() {
        let plain =
            hex::decode("00112233445566778899aabbccddeeff000102030405060708090a0b0c0d0e0f")
                .unwrap();
        let wrapped = wrap_key(&plain, &rfc3394_kek()).unwrap();
        assert_eq!(
            hex::encode(&wrapped),
            concat!(
                "28c9f404c4b810f4cbccb35cfb87f826",
                "3f5786e2d80ed326cbc7f0e71a99f43b",
                "fb988b9b7a02dd21"
            )
        );
        assert_eq!(unwrap_key(&wrapped, &rfc3394_kek()).unwrap(), plain);
    }

    #[test]
    fn kw_round_trip_random_lengths() {
        let mut rng = ChaCha20Rng::from_seed([31u8; 32]);
        let mut kek = [0u8; 32];
        rng.fill_bytes(&mut kek);
        for n_semiblocks in 3..12 {
            let mut plain = vec![0u8; n_semiblocks * 8];
            rng.fill_bytes(&mut plain);
            let wrapped = wrap_key(&plain, &kek).unwrap();
            assert_eq!(wrapped.len(), plain.len() + 8);
            assert_eq!(unwrap_key(&wrapped, &kek).unwrap(), plain);
        }
    }

    #[test]
    fn kw_length_boundaries() {
        let kek = [0u8; 32];
        // Two semiblocks are below the KW minimum.
        assert!(wrap_key(&[0u8; 16], &kek).is_err());
        // Three semiblocks are the smallest accepted input.
        assert!(wrap_key(&[0u8; 24], &kek).is_ok());
        assert!(wrap_key(&[0u8; 20], &kek).is_err());
        assert!(wrap_key(&[], &kek).is_err());
    }

    #[test]
    fn unwrap_rejects_wrong_key() {
        let kek = [1u8; 32];
        let wrapped = wrap_key(&[7u8; 24], &kek).unwrap();
        let err = unwrap_key(&wrapped, &[2u8; 32]).unwrap_err();
        assert_eq!(err, Error::InvalidArgument(UNWRAP_FAILED));
    }

    #[test]
    fn unwrap_detects_any_single_bit_flip() {
        let kek = [9u8; 32];
        let plain = [0x5au8; 24];
        let wrapped = wrap_key(&plain, &kek).unwrap();
        for byte in 0..wrapped.len() {
            for bit in 0..8 {
                let mut tampered = wrapped.clone();
                tampered[byte] ^= 1 << bit;
                assert!(
                    unwrap_key(&tampered, &kek).is_err(),
                    "flip at byte {byte} bit {bit} went undetected"
                );
            }
        }
    }

    #[test]
    fn kwp_round_trip_every_short_length() {
        let mut rng = ChaCha20Rng::from_seed([32u8; 32]);
        let mut kek = [0u8; 32];
        rng.fill_bytes(&mut kek);
        for len in 1..=40 {
            let mut plain = vec![0u8; len];
            rng.fill_bytes(&mut plain);
            let wrapped = wrap_key_padded(&plain, &kek).unwrap();
            assert_eq!(
                unwrap_key_padded(&wrapped, &kek).unwrap(),
                plain,
                "length {len}"
            );
        }
    }

    #[test]
    fn kwp_single_byte_wraps_to_one_block() {
        let kek = [3u8; 32];
        let wrapped = wrap_key_padded(&[0xd1], &kek).unwrap();
        assert_eq!(wrapped.len(), 16);
        assert_eq!(unwrap_key_padded(&wrapped, &kek).unwrap(), [0xd1]);
    }

    #[test]
    fn kwp_rejects_empty_input() {
        assert!(wrap_key_padded(&[], &[0u8; 32]).is_err());
    }

    #[test]
    fn kwp_detects_any_single_bit_flip() {
        let kek = [4u8; 32];
        for len in [1usize, 8, 9, 16, 25] {
            let plain = vec![0x33u8; len];
            let wrapped = wrap_key_padded(&plain, &kek).unwrap();
            for byte in 0..wrapped.len() {
                for bit in 0..8 {
                    let mut tampered = wrapped.clone();
                    tampered[byte] ^= 1 << bit;
                    assert!(
                        unwrap_key_padded(&tampered, &kek).is_err(),
                        "len {len}: flip at byte {byte} bit {bit} went undetected"
                    );
                }
            }
        }
    }

    #[test]
    fn unwrap_failures_are_undifferentiated() {
        let kek = [5u8; 32];
        let wrapped = wrap_key(&[1u8; 24], &kek).unwrap();
        let mut tampered = wrapped.clone();
        tampered[0] ^= 1;
        let wrong_key = unwrap_key(&wrapped, &[6u8; 32]).unwrap_err();
        let corrupted = unwrap_key(&tampered, &kek).unwrap_err();
        let malformed = unwrap_key(&wrapped[..wrapped.len() - 1], &kek).unwrap_err();
        assert_eq!(wrong_key, corrupted);
        assert_eq!(corrupted, malformed);
    }

    #[test]
    fn wrong_kek_length_is_rejected() {
        assert!(wrap_key(&[0u8; 24], &[0u8; 16]).is_err());
        assert!(wrap_key_padded(&[0u8; 3], &[0u8; 31]).is_err());
    }
}
