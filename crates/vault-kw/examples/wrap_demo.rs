//! Wraps a data key under a key-encryption key and recovers it.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use vault_kw::{unwrap_key, wrap_key};

fn main() {
    // Deterministic seed for reproducibility in the example.
    let mut rng = ChaCha20Rng::from_seed([7u8; 32]);
    let mut kek = [0u8; 32];
    let mut data_key = [0u8; 32];
    rng.fill_bytes(&mut kek);
    rng.fill_bytes(&mut data_key);

    let wrapped = wrap_key(&data_key, &kek).expect("wrap");
    assert_eq!(wrapped.len(), data_key.len() + 8);

    let recovered = unwrap_key(&wrapped, &kek).expect("unwrap");
    assert_eq!(recovered, data_key);

    println!(
        "example succeeded; {} key bytes wrapped into {} bytes",
        data_key.len(),
        wrapped.len()
    );
}
