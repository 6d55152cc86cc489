//! Canonical serialization of a signed record set (RFC 4034 sections 3.1.8.1
//! and 6), the exact byte string an RRSIG signature is computed over.

use std::fmt;

use crate::dns::enums::RecordType;
use crate::dns::name;
use crate::dns::resource::{self, RData, ResourceRecord, Rrsig};
use crate::error::DnsError;

/// An ordered record set together with the one RRSIG covering it.
///
/// All member records share `name` and their type equals
/// `signature.type_covered`. Canonical bytes are recomputed from the
/// current records on every call, never cached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedSet {
    pub name: String,
    pub class: u16,
    pub records: Vec<ResourceRecord>,
    pub signature: Rrsig,
}

impl SignedSet {
    pub fn new(name: String, class: u16, records: Vec<ResourceRecord>, signature: Rrsig) -> Self {
        Self {
            name,
            class,
            records,
            signature,
        }
    }

    /// Record type shared by the member records.
    pub fn record_type(&self) -> RecordType {
        self.signature.type_covered
    }

    /// Build the byte string the signature was computed over.
    ///
    /// Operates on clones: owner names are lowercased, TTLs are replaced by
    /// the signature's original TTL, and records are sorted by the byte-wise
    /// order of their rdata encoding alone (stable, so equal encodings keep
    /// their relative order). With `include_rrsig` the RRSIG rdata is
    /// prepended with a zero-length signature field, since the signature
    /// cannot sign itself.
    pub fn to_wire(&self, include_rrsig: bool) -> Vec<u8> {
        let mut members = self.records.clone();
        for record in &mut members {
            record.name = name::canonical(&record.name);
            record.ttl = self.signature.original_ttl;
        }
        members.sort_by_cached_key(|record| record.rdata.encode());

        let mut out = Vec::new();
        if include_rrsig {
            let header = Rrsig {
                signature: Vec::new(),
                ..self.signature.clone()
            };
            out = RData::Rrsig(header).encode();
        }
        for record in &members {
            record.encode(&mut out);
        }
        out
    }

    /// Parse the canonical layout back: the fixed RRSIG rdata (with the
    /// signature field elided) followed by concatenated records. The owner
    /// and class of the first record stand in for the whole set; the given
    /// `signature` bytes are restored into the RRSIG.
    pub fn from_wire(data: &[u8], signature: &[u8]) -> Result<Self, DnsError> {
        let (mut rrsig, records_start) = resource::decode_rrsig_rdata(data)?;
        rrsig.signature = signature.to_vec();

        let mut records = Vec::new();
        let mut pos = records_start;
        while pos < data.len() {
            let (record, next) = ResourceRecord::decode(data, pos)?;
            records.push(record);
            pos = next;
        }
        let first = records.first().ok_or(DnsError::EmptyRecordSet)?;
        let (name, class) = (first.name.clone(), first.class);

        Ok(Self {
            name,
            class,
            records,
            signature: rrsig,
        })
    }

    /// The covering RRSIG materialized as a full resource record, for
    /// display and diagnostics.
    pub fn signature_record(&self) -> ResourceRecord {
        ResourceRecord {
            name: self.name.clone(),
            rtype: RecordType::RRSIG,
            class: self.class,
            ttl: self.signature.original_ttl,
            rdata: RData::Rrsig(self.signature.clone()),
        }
    }
}

impl fmt::Display for SignedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            writeln!(f, "{}", record)?;
        }
        write!(f, "{}", self.signature_record())
    }
}
