use curve::{Curve, CurvePoint, WeierstrassCurve, WeierstrassParams, registry};
use keyops::{HashAlgorithm, KeyPair, ecdsa, ecies, recover_private_key};
use num_bigint::BigUint;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

fn separator() {
    println!("{}", "-".repeat(100));
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut rng = StdRng::seed_from_u64(42);
    let curve = registry::weierstrass("secp112r1").expect("lookup curve");
    println!("Selected curve parameters");
    println!("{curve}");
    separator();

    let keypair = KeyPair::from_known_scalar(&curve, 0x12345u32.into()).expect("keypair");
    println!("Generated keypair");
    println!("Private scalar: 0x{:x}", keypair.private_scalar());
    println!("Public point  : {}", keypair.public());
    separator();

    let secret = ecies::encrypt(keypair.public(), &mut rng).expect("encrypt");
    println!("Encryption");
    println!("Transmitted R  : {}", secret.r_point);
    println!("Symmetric key S: {}", secret.shared);
    separator();

    let recovered = ecies::decrypt(&keypair, &secret.r_point).expect("decrypt");
    println!("Decryption");
    println!("Recovered S    : {recovered}");
    separator();

    println!("Signing message");
    let signature = ecdsa::sign(&keypair, b"foobar", HashAlgorithm::Sha1, &mut rng).expect("sign");
    println!("r: 0x{:x}", signature.r);
    println!("s: 0x{:x}", signature.s);
    separator();

    println!("Verification of signature");
    let unmodified = ecdsa::verify(keypair.public(), b"foobar", &signature).expect("verify");
    let modified = ecdsa::verify(keypair.public(), b"foobaz", &signature).expect("verify");
    println!("Original message: {unmodified}");
    println!("Modified message: {modified}");
    separator();

    println!("Generating signatures with identical nonces for exploitation");
    let nonce = BigUint::from(123456u32);
    let sig1 = ecdsa::sign_with_nonce(&keypair, b"foobar", HashAlgorithm::Sha1, &nonce).expect("sign");
    let sig2 = ecdsa::sign_with_nonce(&keypair, b"foobaz", HashAlgorithm::Sha1, &nonce).expect("sign");
    println!("r1: 0x{:x}", sig1.r);
    println!("s1: 0x{:x}", sig1.s);
    println!("r2: 0x{:x}", sig2.r);
    println!("s2: 0x{:x}", sig2.s);
    let exploit = recover_private_key(&curve, b"foobar", &sig1, b"foobaz", &sig2).expect("recover");
    println!("Recovered nonce      : {}", exploit.nonce);
    println!("Recovered private key: 0x{:x}", exploit.private_key);
    separator();

    let x = BigUint::from(123456u32);
    println!("Finding points on the curve with x == {x}");
    match curve.points_with_x(&x) {
        Some((p1, p2)) => {
            println!("Point 1: {p1}");
            println!("Point 2: {p2}");
            println!("On curve? {} {}", p1.is_on_curve(), p2.is_on_curve());
        }
        None => println!("No point found"),
    }
    separator();

    println!("Generating a tiny curve");
    let tiny = WeierstrassCurve::new(WeierstrassParams {
        name: "tiny".into(),
        a: 2u32.into(),
        b: 3u32.into(),
        p: 263u32.into(),
        n: 270u32.into(),
        cofactor: 1u32.into(),
        gx: 200u32.into(),
        gy: 39u32.into(),
    })
    .expect("tiny curve");
    println!("{tiny}");
    println!("Curve is of order {}", tiny.count_points().expect("count points"));
    println!("Generator has order {}", tiny.generator().order().expect("point order"));
    separator();

    for k in 125..127u64 {
        let p = curve.generator().mul_u64(k).expect("scalar mul");
        println!("Uncompressed point: {p}");
        let c = p.compress().expect("compress");
        println!("Compressed point  : (0x{:x}, {})", c.x, u8::from(c.y_odd));
        let u = curve.decompress(&c).expect("decompress");
        println!("Uncompressed point: {u}");
        assert_eq!(u, p);
        separator();
    }
}
