//! Resource records and typed rdata.
//!
//! Records decoded from a response keep their type-specific payload parsed
//! out; types the prover never inspects are carried as raw bytes. Encoding
//! of the DNSSEC payloads is canonical (uncompressed names) so the same
//! routines serve both message building and signature input construction.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::dns::enums::{CLASS_IN, RecordType};
use crate::dns::name;
use crate::error::DnsError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: String,
    pub rtype: RecordType,
    /// Raw class value. OPT pseudo-records overload this field with the
    /// advertised UDP payload size, so no enum here.
    pub class: u16,
    pub ttl: u32,
    pub rdata: RData,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RData {
    A([u8; 4]),
    Aaaa([u8; 16]),
    Txt(Vec<Vec<u8>>),
    Dnskey(Dnskey),
    Ds(Ds),
    Rrsig(Rrsig),
    Opt(Vec<u8>),
    Unknown(Vec<u8>),
}

/// DNSKEY rdata (RFC 4034 section 2).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dnskey {
    pub flags: u16,
    pub protocol: u8,
    pub algorithm: u8,
    pub public_key: Vec<u8>,
}

impl Dnskey {
    /// Canonical rdata encoding, the layout both the key tag and the DS
    /// digest are computed over.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.public_key.len());
        out.extend_from_slice(&self.flags.to_be_bytes());
        out.push(self.protocol);
        out.push(self.algorithm);
        out.extend_from_slice(&self.public_key);
        out
    }
}

/// DS rdata (RFC 4034 section 5).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ds {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: u8,
    pub digest: Vec<u8>,
}

/// RRSIG rdata (RFC 4034 section 3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rrsig {
    pub type_covered: RecordType,
    pub algorithm: u8,
    pub labels: u8,
    pub original_ttl: u32,
    pub expiration: u32,
    pub inception: u32,
    pub key_tag: u16,
    pub signer_name: String,
    pub signature: Vec<u8>,
}

/// Length of the fixed RRSIG rdata prefix before the signer name.
pub const RRSIG_FIXED_LEN: usize = 18;

impl RData {
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::A(addr) => addr.to_vec(),
            Self::Aaaa(addr) => addr.to_vec(),
            Self::Txt(strings) => {
                let mut out = Vec::new();
                for s in strings {
                    out.push(s.len() as u8);
                    out.extend_from_slice(s);
                }
                out
            }
            Self::Dnskey(key) => key.encode(),
            Self::Ds(ds) => {
                let mut out = Vec::with_capacity(4 + ds.digest.len());
                out.extend_from_slice(&ds.key_tag.to_be_bytes());
                out.push(ds.algorithm);
                out.push(ds.digest_type);
                out.extend_from_slice(&ds.digest);
                out
            }
            Self::Rrsig(sig) => {
                let mut out = Vec::new();
                out.extend_from_slice(&sig.type_covered.to_u16().to_be_bytes());
                out.push(sig.algorithm);
                out.push(sig.labels);
                out.extend_from_slice(&sig.original_ttl.to_be_bytes());
                out.extend_from_slice(&sig.expiration.to_be_bytes());
                out.extend_from_slice(&sig.inception.to_be_bytes());
                out.extend_from_slice(&sig.key_tag.to_be_bytes());
                out.extend_from_slice(&name::encode_name(&sig.signer_name));
                out.extend_from_slice(&sig.signature);
                out
            }
            Self::Opt(data) | Self::Unknown(data) => data.clone(),
        }
    }

    pub fn decode(rtype: RecordType, rdata: &[u8]) -> Result<Self, DnsError> {
        let too_small = |need: usize| DnsError::BufferTooSmall {
            need,
            have: rdata.len(),
        };
        match rtype {
            RecordType::A => {
                let bytes: [u8; 4] = rdata.try_into().map_err(|_| too_small(4))?;
                Ok(Self::A(bytes))
            }
            RecordType::AAAA => {
                let bytes: [u8; 16] = rdata.try_into().map_err(|_| too_small(16))?;
                Ok(Self::Aaaa(bytes))
            }
            RecordType::TXT => {
                let mut strings = Vec::new();
                let mut pos = 0;
                while pos < rdata.len() {
                    let len = usize::from(rdata[pos]);
                    pos += 1;
                    let bytes = rdata
                        .get(pos..pos + len)
                        .ok_or_else(|| too_small(pos + len))?;
                    strings.push(bytes.to_vec());
                    pos += len;
                }
                Ok(Self::Txt(strings))
            }
            RecordType::DNSKEY => {
                if rdata.len() < 4 {
                    return Err(too_small(4));
                }
                Ok(Self::Dnskey(Dnskey {
                    flags: u16::from_be_bytes([rdata[0], rdata[1]]),
                    protocol: rdata[2],
                    algorithm: rdata[3],
                    public_key: rdata[4..].to_vec(),
                }))
            }
            RecordType::DS => {
                if rdata.len() < 4 {
                    return Err(too_small(4));
                }
                Ok(Self::Ds(Ds {
                    key_tag: u16::from_be_bytes([rdata[0], rdata[1]]),
                    algorithm: rdata[2],
                    digest_type: rdata[3],
                    digest: rdata[4..].to_vec(),
                }))
            }
            RecordType::RRSIG => {
                let (sig, _) = decode_rrsig_rdata(rdata)?;
                Ok(Self::Rrsig(sig))
            }
            RecordType::OPT => Ok(Self::Opt(rdata.to_vec())),
            _ => Ok(Self::Unknown(rdata.to_vec())),
        }
    }
}

/// Decode an RRSIG rdata. Returns the record and the offset of the first
/// signature byte; everything from there to the end of `rdata` is the
/// signature itself.
pub fn decode_rrsig_rdata(rdata: &[u8]) -> Result<(Rrsig, usize), DnsError> {
    if rdata.len() < RRSIG_FIXED_LEN {
        return Err(DnsError::BufferTooSmall {
            need: RRSIG_FIXED_LEN,
            have: rdata.len(),
        });
    }
    let (signer_name, sig_start) = name::decode_name_plain(rdata, RRSIG_FIXED_LEN)?;
    Ok((
        Rrsig {
            type_covered: RecordType::from_u16(u16::from_be_bytes([rdata[0], rdata[1]])),
            algorithm: rdata[2],
            labels: rdata[3],
            original_ttl: u32::from_be_bytes([rdata[4], rdata[5], rdata[6], rdata[7]]),
            expiration: u32::from_be_bytes([rdata[8], rdata[9], rdata[10], rdata[11]]),
            inception: u32::from_be_bytes([rdata[12], rdata[13], rdata[14], rdata[15]]),
            key_tag: u16::from_be_bytes([rdata[16], rdata[17]]),
            signer_name,
            signature: rdata[sig_start..].to_vec(),
        },
        sig_start,
    ))
}

impl ResourceRecord {
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&name::encode_name(&self.name));
        out.extend_from_slice(&self.rtype.to_u16().to_be_bytes());
        out.extend_from_slice(&self.class.to_be_bytes());
        out.extend_from_slice(&self.ttl.to_be_bytes());
        let rdata = self.rdata.encode();
        out.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        out.extend_from_slice(&rdata);
    }

    /// Decode one record at `offset`; returns it and the offset just past
    /// it, so concatenated records can be consumed sequentially.
    pub fn decode(msg: &[u8], offset: usize) -> Result<(Self, usize), DnsError> {
        let (owner, pos) = name::decode_name(msg, offset)?;
        let fixed = msg.get(pos..pos + 10).ok_or(DnsError::BufferTooSmall {
            need: pos + 10,
            have: msg.len(),
        })?;
        let rtype = RecordType::from_u16(u16::from_be_bytes([fixed[0], fixed[1]]));
        let class = u16::from_be_bytes([fixed[2], fixed[3]]);
        let ttl = u32::from_be_bytes([fixed[4], fixed[5], fixed[6], fixed[7]]);
        let rdlength = u16::from_be_bytes([fixed[8], fixed[9]]);
        let rdata_start = pos + 10;
        let rdata_end = rdata_start + usize::from(rdlength);
        let rdata = msg
            .get(rdata_start..rdata_end)
            .ok_or(DnsError::BadRdataLength(rdlength))?;
        Ok((
            Self {
                name: owner,
                rtype,
                class,
                ttl,
                rdata: RData::decode(rtype, rdata)?,
            },
            rdata_end,
        ))
    }
}

fn class_str(class: u16) -> String {
    if class == CLASS_IN {
        "IN".to_string()
    } else {
        format!("CLASS{}", class)
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A(addr) => write!(f, "{}", Ipv4Addr::from(*addr)),
            Self::Aaaa(addr) => write!(f, "{}", Ipv6Addr::from(*addr)),
            Self::Txt(strings) => {
                let mut first = true;
                for s in strings {
                    if !first {
                        write!(f, " ")?;
                    }
                    first = false;
                    write!(f, "\"{}\"", String::from_utf8_lossy(s))?;
                }
                Ok(())
            }
            Self::Dnskey(key) => write!(
                f,
                "{} {} {} {}",
                key.flags,
                key.protocol,
                key.algorithm,
                BASE64.encode(&key.public_key)
            ),
            Self::Ds(ds) => write!(
                f,
                "{} {} {} {}",
                ds.key_tag,
                ds.algorithm,
                ds.digest_type,
                hex::encode(&ds.digest)
            ),
            Self::Rrsig(sig) => write!(
                f,
                "{} {} {} {} {} {} {} {} {}",
                sig.type_covered,
                sig.algorithm,
                sig.labels,
                sig.original_ttl,
                sig.expiration,
                sig.inception,
                sig.key_tag,
                sig.signer_name,
                BASE64.encode(&sig.signature)
            ),
            Self::Opt(_) => Ok(()),
            Self::Unknown(data) => write!(f, "\\# {} {}", data.len(), hex::encode(data)),
        }
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.name,
            self.ttl,
            class_str(self.class),
            self.rtype
        )?;
        match &self.rdata {
            RData::Opt(_) => Ok(()),
            rdata => write!(f, " {}", rdata),
        }
    }
}
