pub mod key_tag;
pub mod prover;
pub mod registry;
pub mod resolver;
pub mod signed_set;
pub mod trust_anchor;

pub use key_tag::calculate_key_tag;
pub use prover::DnsProver;
pub use registry::{Algorithm, AlgorithmRegistry, DigestRegistry, DigestType, DigestVerifier, SignatureVerifier};
pub use resolver::ProvableAnswer;
pub use signed_set::SignedSet;
pub use trust_anchor::{TrustAnchor, root_trust_anchors};

/// DNSSEC constants
pub mod constants {
    /// Advertised EDNS0 UDP payload size (RFC 4035).
    pub const EDNS_UDP_SIZE: u16 = 4096;

    /// DNSSEC OK flag in the EDNS0 TTL field.
    pub const DO_FLAG: u16 = 0x8000;

    /// Fixed id for outgoing queries; sessions match responses by
    /// transport, not by id.
    pub const QUERY_ID: u16 = 1;
}
