//! Pluggable verification registries keyed by the DNSSEC algorithm and
//! digest type numbers.
//!
//! The identifier domains are closed enums, so a registry can only ever be
//! populated with ids the resolver knows how to talk about; unlisted wire
//! values simply never match an entry. The default registries verify for
//! real through ring.

use std::collections::HashMap;
use std::fmt;

use ring::digest;
use ring::signature::{
    self, ECDSA_P256_SHA256_FIXED, RSA_PKCS1_1024_8192_SHA1_FOR_LEGACY_USE_ONLY,
    RSA_PKCS1_1024_8192_SHA256_FOR_LEGACY_USE_ONLY, RsaPublicKeyComponents,
};

/// Signature algorithms eligible for registration (RFC 4034, 5155, 5702,
/// 6605).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// RSA/SHA-1 (RFC 3110)
    RsaSha1,
    /// RSASHA1-NSEC3-SHA1 (RFC 5155)
    RsaSha1Nsec3Sha1,
    /// RSA/SHA-256 (RFC 5702)
    RsaSha256,
    /// ECDSA Curve P-256 with SHA-256 (RFC 6605)
    EcdsaP256Sha256,
}

impl Algorithm {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            5 => Some(Self::RsaSha1),
            7 => Some(Self::RsaSha1Nsec3Sha1),
            8 => Some(Self::RsaSha256),
            13 => Some(Self::EcdsaP256Sha256),
            _ => None,
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::RsaSha1 => 5,
            Self::RsaSha1Nsec3Sha1 => 7,
            Self::RsaSha256 => 8,
            Self::EcdsaP256Sha256 => 13,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RsaSha1 => write!(f, "RSASHA1"),
            Self::RsaSha1Nsec3Sha1 => write!(f, "RSASHA1-NSEC3-SHA1"),
            Self::RsaSha256 => write!(f, "RSASHA256"),
            Self::EcdsaP256Sha256 => write!(f, "ECDSAP256SHA256"),
        }
    }
}

/// DS digest types eligible for registration (RFC 3658, 4509).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestType {
    Sha1,
    Sha256,
}

impl DigestType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Sha1),
            2 => Some(Self::Sha256),
            _ => None,
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::Sha1 => 1,
            Self::Sha256 => 2,
        }
    }
}

impl fmt::Display for DigestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1 => write!(f, "SHA1"),
            Self::Sha256 => write!(f, "SHA256"),
        }
    }
}

type SignatureFn = Box<dyn Fn(&[u8], &[u8], &[u8]) -> bool + Send + Sync>;
type DigestFn = Box<dyn Fn(&[u8], &[u8]) -> bool + Send + Sync>;

/// A named `(public key, signed data, signature) -> bool` check. Never
/// errors; anything malformed is simply not verified.
pub struct SignatureVerifier {
    name: &'static str,
    verify: SignatureFn,
}

impl SignatureVerifier {
    pub fn new(
        name: &'static str,
        verify: impl Fn(&[u8], &[u8], &[u8]) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            verify: Box::new(verify),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn verify(&self, public_key: &[u8], signed_data: &[u8], signature: &[u8]) -> bool {
        (self.verify)(public_key, signed_data, signature)
    }
}

/// A named `(message, expected digest) -> bool` check.
pub struct DigestVerifier {
    name: &'static str,
    verify: DigestFn,
}

impl DigestVerifier {
    pub fn new(
        name: &'static str,
        verify: impl Fn(&[u8], &[u8]) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            verify: Box::new(verify),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn verify(&self, message: &[u8], expected: &[u8]) -> bool {
        (self.verify)(message, expected)
    }
}

/// Lookup table from wire algorithm numbers to signature verifiers.
pub struct AlgorithmRegistry {
    entries: HashMap<Algorithm, SignatureVerifier>,
}

impl AlgorithmRegistry {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn register(&mut self, algorithm: Algorithm, verifier: SignatureVerifier) {
        self.entries.insert(algorithm, verifier);
    }

    /// Resolve a wire algorithm number to its verifier, if registered.
    pub fn get(&self, id: u8) -> Option<&SignatureVerifier> {
        Algorithm::from_u8(id).and_then(|alg| self.entries.get(&alg))
    }

    pub fn supports(&self, id: u8) -> bool {
        self.get(id).is_some()
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(
            Algorithm::RsaSha1,
            SignatureVerifier::new("RSASHA1", |key, data, sig| {
                verify_rsa(&RSA_PKCS1_1024_8192_SHA1_FOR_LEGACY_USE_ONLY, key, data, sig)
            }),
        );
        registry.register(
            Algorithm::RsaSha1Nsec3Sha1,
            SignatureVerifier::new("RSASHA1-NSEC3-SHA1", |key, data, sig| {
                verify_rsa(&RSA_PKCS1_1024_8192_SHA1_FOR_LEGACY_USE_ONLY, key, data, sig)
            }),
        );
        registry.register(
            Algorithm::RsaSha256,
            SignatureVerifier::new("RSASHA256", |key, data, sig| {
                verify_rsa(
                    &RSA_PKCS1_1024_8192_SHA256_FOR_LEGACY_USE_ONLY,
                    key,
                    data,
                    sig,
                )
            }),
        );
        registry.register(
            Algorithm::EcdsaP256Sha256,
            SignatureVerifier::new("P256SHA256", verify_ecdsa_p256),
        );
        registry
    }
}

/// Lookup table from wire digest type numbers to digest verifiers.
pub struct DigestRegistry {
    entries: HashMap<DigestType, DigestVerifier>,
}

impl DigestRegistry {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn register(&mut self, digest_type: DigestType, verifier: DigestVerifier) {
        self.entries.insert(digest_type, verifier);
    }

    pub fn get(&self, id: u8) -> Option<&DigestVerifier> {
        DigestType::from_u8(id).and_then(|dt| self.entries.get(&dt))
    }

    pub fn supports(&self, id: u8) -> bool {
        self.get(id).is_some()
    }
}

impl Default for DigestRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(
            DigestType::Sha1,
            DigestVerifier::new("SHA1", |message, expected| {
                digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, message).as_ref() == expected
            }),
        );
        registry.register(
            DigestType::Sha256,
            DigestVerifier::new("SHA256", |message, expected| {
                digest::digest(&digest::SHA256, message).as_ref() == expected
            }),
        );
        registry
    }
}

/// Split an RFC 3110 public key field into (modulus, exponent). The
/// exponent length is one octet, or three when the first octet is zero.
fn rsa_components(key: &[u8]) -> Option<(&[u8], &[u8])> {
    let (e_len, e_start) = match *key.first()? {
        0 => {
            let len = key.get(1..3)?;
            (usize::from(u16::from_be_bytes([len[0], len[1]])), 3)
        }
        len => (usize::from(len), 1),
    };
    if e_len == 0 {
        return None;
    }
    let e = key.get(e_start..e_start + e_len)?;
    let n = &key[e_start + e_len..];
    if n.is_empty() {
        return None;
    }
    Some((n, e))
}

fn verify_rsa(
    params: &'static signature::RsaParameters,
    key: &[u8],
    data: &[u8],
    sig: &[u8],
) -> bool {
    match rsa_components(key) {
        Some((n, e)) => RsaPublicKeyComponents { n, e }
            .verify(params, data, sig)
            .is_ok(),
        None => false,
    }
}

/// DNSKEY carries the bare x||y point; ring wants the uncompressed form
/// with the 0x04 prefix. The signature is already the fixed r||s layout
/// DNSSEC uses (RFC 6605 section 4).
fn verify_ecdsa_p256(key: &[u8], data: &[u8], sig: &[u8]) -> bool {
    if key.len() != 64 {
        return false;
    }
    let mut prefixed = Vec::with_capacity(65);
    prefixed.push(0x04);
    prefixed.extend_from_slice(key);
    signature::UnparsedPublicKey::new(&ECDSA_P256_SHA256_FIXED, &prefixed)
        .verify(data, sig)
        .is_ok()
}
