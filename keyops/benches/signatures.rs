use criterion::{Criterion, black_box, criterion_group, criterion_main};
use curve::registry;
use keyops::{EddsaSigningKey, HashAlgorithm, KeyPair, ecdsa, eddsa, ecies};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn bench_ecdsa_sign(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let curve = registry::weierstrass("secp256k1").unwrap();
    let key = KeyPair::generate(&curve, &mut rng).expect("keygen");
    let msg = b"hello keyops";

    c.bench_function("ecdsa_secp256k1_sign", |bencher| {
        bencher.iter(|| {
            let sig = ecdsa::sign(&key, black_box(msg), HashAlgorithm::Sha256, &mut rng).expect("sign");
            black_box(sig);
        })
    });
}

fn bench_ecdsa_verify(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let curve = registry::weierstrass("secp256k1").unwrap();
    let key = KeyPair::generate(&curve, &mut rng).expect("keygen");
    let msg = b"hello keyops";
    let sig = ecdsa::sign(&key, msg, HashAlgorithm::Sha256, &mut rng).expect("sign");

    c.bench_function("ecdsa_secp256k1_verify", |bencher| {
        bencher.iter(|| {
            let ok = ecdsa::verify(key.public(), black_box(msg), black_box(&sig)).expect("verify");
            black_box(ok);
        })
    });
}

fn bench_eddsa_sign(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let curve = registry::ed25519().unwrap();
    let key = EddsaSigningKey::generate(&curve, &mut rng).expect("keygen");
    let msg = b"hello keyops";

    c.bench_function("eddsa_ed25519_sign", |bencher| {
        bencher.iter(|| {
            let sig = key.sign(black_box(msg)).expect("sign");
            black_box(sig);
        })
    });
}

fn bench_eddsa_verify(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let curve = registry::ed25519().unwrap();
    let key = EddsaSigningKey::generate(&curve, &mut rng).expect("keygen");
    let msg = b"hello keyops";
    let sig = key.sign(msg).expect("sign");

    c.bench_function("eddsa_ed25519_verify", |bencher| {
        bencher.iter(|| {
            let ok = eddsa::verify(key.public(), black_box(msg), black_box(&sig)).expect("verify");
            black_box(ok);
        })
    });
}

fn bench_ecies(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let curve = registry::weierstrass("secp256r1").unwrap();
    let key = KeyPair::generate(&curve, &mut rng).expect("keygen");

    c.bench_function("ecies_secp256r1_encrypt", |bencher| {
        bencher.iter(|| {
            let secret = ecies::encrypt(black_box(key.public()), &mut rng).expect("encrypt");
            black_box(secret);
        })
    });
}

criterion_group!(
    benches,
    bench_ecdsa_sign,
    bench_ecdsa_verify,
    bench_eddsa_sign,
    bench_eddsa_verify,
    bench_ecies
);
criterion_main!(benches);
