use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use rijndael_core::Rijndael;
use vault_modes::Cfb;

fn bench_cfb_decrypt(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::from_seed([5u8; 32]);
    let mut key = [0u8; 32];
    let mut iv = [0u8; 16];
    let mut message = vec![0u8; 1 << 20];
    rng.fill_bytes(&mut key);
    rng.fill_bytes(&mut iv);
    rng.fill_bytes(&mut message);

    let mode = Cfb::new(Rijndael::aes256(&key).unwrap(), &iv).unwrap();
    let ciphertext = mode.encrypt(&message).unwrap();

    let mut group = c.benchmark_group("cfb_decrypt_1mib");
    group.throughput(Throughput::Bytes(ciphertext.len() as u64));
    group.sample_size(10);
    group.bench_function("sequential", |b| {
        b.iter(|| mode.decrypt(&ciphertext).unwrap());
    });
    group.bench_function("parallel", |b| {
        b.iter(|| mode.parallel_decrypt(&ciphertext).unwrap());
    });
    group.finish();
}

criterion_group!(benches, bench_cfb_decrypt);
criterion_main!(benches);
