use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use pdf_security::crypto::{decrypt_aes128, decrypt_aes256, encrypt_aes128, encrypt_aes256, rc4};
use pdf_security::security::{
    compute_encryption_key, compute_object_key, compute_user_password_hash_r6,
    compute_user_values_r6,
};

const PAYLOAD_SIZES: &[usize] = &[64, 1024, 64 * 1024];

fn bench_rc4(c: &mut Criterion) {
    let key = [0x5Au8; 16];
    let mut group = c.benchmark_group("rc4");
    for &size in PAYLOAD_SIZES {
        let data = vec![0xA5u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(format!("{size}"), |b| {
            b.iter(|| rc4(black_box(&key), black_box(&data)).unwrap())
        });
    }
    group.finish();
}

fn bench_aes(c: &mut Criterion) {
    let key128 = [0x11u8; 16];
    let key256 = [0x22u8; 32];
    let mut group = c.benchmark_group("aes");
    for &size in PAYLOAD_SIZES {
        let data = vec![0xA5u8; size];
        let encrypted128 = encrypt_aes128(&key128, &data).unwrap();
        let encrypted256 = encrypt_aes256(&key256, &data).unwrap();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(format!("encrypt_128/{size}"), |b| {
            b.iter(|| encrypt_aes128(black_box(&key128), black_box(&data)).unwrap())
        });
        group.bench_function(format!("decrypt_128/{size}"), |b| {
            b.iter(|| decrypt_aes128(black_box(&key128), black_box(&encrypted128)).unwrap())
        });
        group.bench_function(format!("encrypt_256/{size}"), |b| {
            b.iter(|| encrypt_aes256(black_box(&key256), black_box(&data)).unwrap())
        });
        group.bench_function(format!("decrypt_256/{size}"), |b| {
            b.iter(|| decrypt_aes256(black_box(&key256), black_box(&encrypted256)).unwrap())
        });
    }
    group.finish();
}

fn bench_key_derivation(c: &mut Criterion) {
    let owner_value = [0x33u8; 32];
    let file_id = [0x44u8; 16];
    c.bench_function("legacy_encryption_key", |b| {
        b.iter(|| {
            compute_encryption_key(
                black_box(b"password"),
                black_box(&owner_value),
                -44,
                black_box(&file_id),
                4,
                16,
                true,
            )
            .unwrap()
        })
    });

    let file_key = [0x55u8; 16];
    c.bench_function("object_key", |b| {
        b.iter(|| compute_object_key(black_box(&file_key), 42, 0, true))
    });
}

fn bench_r6_hash(c: &mut Criterion) {
    let file_key = [0x66u8; 32];
    let (user_value, _) = compute_user_values_r6(&file_key, b"password", 6).unwrap();
    c.bench_function("r6_password_hash", |b| {
        b.iter(|| {
            compute_user_password_hash_r6(black_box(b"password"), black_box(&user_value), 6)
                .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_rc4,
    bench_aes,
    bench_key_derivation,
    bench_r6_hash
);
criterion_main!(benches);
