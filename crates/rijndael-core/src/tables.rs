//! Substitution and round-constant tables.
//!
//! Nothing here is hard-coded: the S-box pair is derived from field inversion
//! plus the Rijndael affine maps, and round constants are powers of x in the
//! field. Tables are built lazily, exactly once per process, behind
//! synchronized one-time initializers; rebuilding would yield identical
//! content, so sharing the first result is safe.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::gf256::{inverse_poly, power_field, scalar_product, RIJNDAEL_MODULUS};

/// Row matrix of the forward affine map, one `u8` per output bit.
const AFFINE_MATRIX: [u8; 8] = [0xf1, 0xe3, 0xc7, 0x8f, 0x1f, 0x3e, 0x7c, 0xf8];
const AFFINE_CONSTANT: u8 = 0x63;

/// Row matrix of the inverse affine map, applied before field inversion.
const INV_AFFINE_MATRIX: [u8; 8] = [0xa4, 0x49, 0x92, 0x25, 0x4a, 0x94, 0x29, 0x52];
const INV_AFFINE_CONSTANT: u8 = 0x05;

pub(crate) struct SboxTables {
    forward: [u8; 256],
    inverse: [u8; 256],
}

impl SboxTables {
    fn derive() -> Self {
        let mut forward = [0u8; 256];
        let mut inverse = [0u8; 256];
        for i in 0..=255u8 {
            forward[i as usize] = affine_transform(inverse_poly(i, RIJNDAEL_MODULUS));
            inverse[i as usize] = inverse_poly(inv_affine_transform(i), RIJNDAEL_MODULUS);
        }
        Self { forward, inverse }
    }
}

fn affine_transform(b: u8) -> u8 {
    apply_affine(b, &AFFINE_MATRIX, AFFINE_CONSTANT)
}

fn inv_affine_transform(b: u8) -> u8 {
    apply_affine(b, &INV_AFFINE_MATRIX, INV_AFFINE_CONSTANT)
}

/// Applies an 8x8 GF(2) matrix row by row and XORs in the constant vector.
fn apply_affine(b: u8, matrix: &[u8; 8], constant: u8) -> u8 {
    let mut result = 0u8;
    for (i, row) in matrix.iter().enumerate() {
        let bit = ((constant >> i) & 1) ^ scalar_product(u16::from(*row), u16::from(b));
        result |= bit << i;
    }
    result
}

fn sbox_tables() -> &'static SboxTables {
    static SBOX: OnceLock<SboxTables> = OnceLock::new();
    SBOX.get_or_init(SboxTables::derive)
}

/// Forward S-box lookup.
#[inline]
pub(crate) fn sbox(b: u8) -> u8 {
    sbox_tables().forward[b as usize]
}

/// Inverse S-box lookup.
#[inline]
pub(crate) fn inv_sbox(b: u8) -> u8 {
    sbox_tables().inverse[b as usize]
}

/// Round constants for a given round count: `rconst[i] = x^i` in the field.
///
/// One table per distinct round count, shared by every cipher instance with
/// that geometry.
pub(crate) fn round_constants(rounds: usize) -> Arc<[u8]> {
    static CACHE: OnceLock<Mutex<HashMap<usize, Arc<[u8]>>>> = OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(cache.entry(rounds).or_insert_with(|| {
        (0..rounds)
            .map(|i| power_field(0x02, i as u16, RIJNDAEL_MODULUS) as u8)
            .collect()
    }))
}
