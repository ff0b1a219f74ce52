//! Runtime-generated certificates and credential encodings, shared by the
//! unit tests and the integration tests.

use openssl::asn1::Asn1Time;
use openssl::bn::BigNum;
use openssl::ec::{EcGroup, EcKey};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkcs12::Pkcs12;
use openssl::pkey::{PKey, Private};
use openssl::stack::Stack;
use openssl::symm::Cipher;
use openssl::x509::extension::{
    AuthorityKeyIdentifier, BasicConstraints, KeyUsage, SubjectKeyIdentifier,
};
use openssl::x509::{X509Builder, X509NameBuilder, X509Ref, X509};
use std::sync::atomic::{AtomicU32, Ordering};

static SERIAL: AtomicU32 = AtomicU32::new(1);

/// Generate a P-256 key pair
pub fn generate_ec_key() -> PKey<Private> {
    let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap();
    let ec_key = EcKey::generate(&group).unwrap();
    PKey::from_ec_key(ec_key).unwrap()
}

fn base_builder(cn: &str, key: &PKey<Private>) -> X509Builder {
    let mut name_builder = X509NameBuilder::new().unwrap();
    name_builder.append_entry_by_text("CN", cn).unwrap();
    let name = name_builder.build();

    let mut builder = X509Builder::new().unwrap();
    builder.set_version(2).unwrap();

    let serial = BigNum::from_u32(SERIAL.fetch_add(1, Ordering::Relaxed)).unwrap();
    builder.set_serial_number(&serial.to_asn1_integer().unwrap()).unwrap();

    builder.set_subject_name(&name).unwrap();
    builder.set_pubkey(key).unwrap();

    let not_before = Asn1Time::days_from_now(0).unwrap();
    let not_after = Asn1Time::days_from_now(365).unwrap();
    builder.set_not_before(&not_before).unwrap();
    builder.set_not_after(&not_after).unwrap();
    builder
}

/// Self-signed CA that may also sign content directly.
pub fn generate_ca(cn: &str) -> (PKey<Private>, X509) {
    let key = generate_ec_key();
    let mut builder = base_builder(cn, &key);

    let mut name_builder = X509NameBuilder::new().unwrap();
    name_builder.append_entry_by_text("CN", cn).unwrap();
    builder.set_issuer_name(&name_builder.build()).unwrap();

    builder
        .append_extension(BasicConstraints::new().critical().ca().build().unwrap())
        .unwrap();
    builder
        .append_extension(
            KeyUsage::new()
                .critical()
                .key_cert_sign()
                .crl_sign()
                .digital_signature()
                .build()
                .unwrap(),
        )
        .unwrap();
    let ski = SubjectKeyIdentifier::new()
        .build(&builder.x509v3_context(None, None))
        .unwrap();
    builder.append_extension(ski).unwrap();

    builder.sign(&key, MessageDigest::sha256()).unwrap();
    (key, builder.build())
}

/// End-entity signing certificate issued by `ca_cert`.
pub fn generate_leaf(cn: &str, ca_key: &PKey<Private>, ca_cert: &X509Ref) -> (PKey<Private>, X509) {
    let key = generate_ec_key();
    let mut builder = base_builder(cn, &key);
    builder.set_issuer_name(ca_cert.subject_name()).unwrap();

    builder
        .append_extension(BasicConstraints::new().build().unwrap())
        .unwrap();
    builder
        .append_extension(
            KeyUsage::new()
                .critical()
                .digital_signature()
                .non_repudiation()
                .build()
                .unwrap(),
        )
        .unwrap();
    let aki = AuthorityKeyIdentifier::new()
        .keyid(false)
        .build(&builder.x509v3_context(Some(ca_cert), None))
        .unwrap();
    builder.append_extension(aki).unwrap();

    builder.sign(ca_key, MessageDigest::sha256()).unwrap();
    (key, builder.build())
}

/// Certificate followed by a PKCS#8 key, the key encrypted when `password` is set.
pub fn identity_pem(cert: &X509, key: &PKey<Private>, password: Option<&str>) -> Vec<u8> {
    let mut data = cert.to_pem().unwrap();
    let key_pem = match password {
        Some(pass) => key
            .private_key_to_pem_pkcs8_passphrase(Cipher::aes_256_cbc(), pass.as_bytes())
            .unwrap(),
        None => key.private_key_to_pem_pkcs8().unwrap(),
    };
    data.extend_from_slice(&key_pem);
    data
}

/// DER PKCS#12 archive with an optional CA certificate in the chain.
pub fn p12_der(cert: &X509, key: &PKey<Private>, ca: Option<&X509>, password: &str) -> Vec<u8> {
    let mut builder = Pkcs12::builder();
    builder.name("p7sign test").pkey(key).cert(cert);
    if let Some(ca) = ca {
        let mut chain = Stack::new().unwrap();
        chain.push(ca.clone()).unwrap();
        builder.ca(chain);
    }
    builder.build2(password).unwrap().to_der().unwrap()
}
