//! DNSSEC chain-of-trust prover.
//!
//! Resolves a record set over a pluggable transport (DNS-over-HTTPS by
//! default) and recursively validates its RRSIG signatures through parent
//! zones up to a static set of root trust anchors, producing the verified
//! answer together with the ordered proof chain that authenticates it.

pub mod dns;
pub mod dnssec;
pub mod error;
pub mod transport;

pub use dns::DnsMessage;
pub use dnssec::{DnsProver, ProvableAnswer, SignedSet};
pub use error::ProofError;
