use thiserror::Error;

use crate::dns::DnsMessage;
use crate::dns::resource::ResourceRecord;
use crate::transport::TransportError;

/// Errors raised by the DNS wire codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DnsError {
    #[error("buffer too small: need {need} bytes, have {have} bytes")]
    BufferTooSmall { need: usize, have: usize },

    #[error("invalid label length: {0}")]
    InvalidLabelLength(u8),

    #[error("DNS name too long")]
    NameTooLong,

    #[error("compression pointer loop")]
    PointerLoop,

    #[error("compression pointer not allowed here")]
    UnexpectedPointer,

    #[error("record data length {0} exceeds remaining buffer")]
    BadRdataLength(u16),

    #[error("signed set contains no records")]
    EmptyRecordSet,

    #[error("unknown record type: {0}")]
    UnknownRecordType(String),
}

/// Outcome taxonomy for a trust-chain resolution.
///
/// Any of these aborts the whole top-level call; a partial proof chain is
/// never returned. Absence of records is not an error and surfaces as
/// `Ok(None)` from [`crate::dnssec::DnsProver::query_with_proof`].
#[derive(Error, Debug)]
pub enum ProofError {
    /// The server answered with a non-NOERROR rcode. Carries the query we
    /// sent and the response we got back.
    #[error("DNS server responded with rcode {}", response.header.rcode)]
    ResponseCode {
        query: Box<DnsMessage>,
        response: Box<DnsMessage>,
    },

    /// Every candidate signature/key combination failed or was unsupported.
    /// Carries the record set that could not be validated.
    #[error("no DNSKEY record validates any RRSIG on the candidate record set")]
    NoValidDnskey { records: Vec<ResourceRecord> },

    /// Every DS/key/signature combination for a delegation failed.
    /// Carries the DNSKEY set that could not be validated.
    #[error("no DS record validates any RRSIG on the DNSKEY set")]
    NoValidDs { keys: Vec<ResourceRecord> },

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("decode error: {0}")]
    Decode(#[from] DnsError),
}
