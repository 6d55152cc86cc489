use std::fmt;
use std::str::FromStr;

use crate::error::DnsError;

/// The IN class; the only class this crate queries.
pub const CLASS_IN: u16 = 1;

/// Response code constants (RFC 1035 section 4.1.1).
pub const RCODE_NOERROR: u8 = 0;
pub const RCODE_SERVFAIL: u8 = 2;
pub const RCODE_NXDOMAIN: u8 = 3;

/// DNS record types understood by the codec. Anything else is carried as
/// `Unknown` so it survives a decode/encode round trip untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    NS,
    CNAME,
    SOA,
    PTR,
    MX,
    TXT,
    AAAA,
    OPT,
    DS,
    RRSIG,
    DNSKEY,
    Unknown(u16),
}

impl RecordType {
    pub fn from_u16(value: u16) -> Self {
        match value {
            1 => Self::A,
            2 => Self::NS,
            5 => Self::CNAME,
            6 => Self::SOA,
            12 => Self::PTR,
            15 => Self::MX,
            16 => Self::TXT,
            28 => Self::AAAA,
            41 => Self::OPT,
            43 => Self::DS,
            46 => Self::RRSIG,
            48 => Self::DNSKEY,
            other => Self::Unknown(other),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            Self::A => 1,
            Self::NS => 2,
            Self::CNAME => 5,
            Self::SOA => 6,
            Self::PTR => 12,
            Self::MX => 15,
            Self::TXT => 16,
            Self::AAAA => 28,
            Self::OPT => 41,
            Self::DS => 43,
            Self::RRSIG => 46,
            Self::DNSKEY => 48,
            Self::Unknown(other) => other,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::NS => write!(f, "NS"),
            Self::CNAME => write!(f, "CNAME"),
            Self::SOA => write!(f, "SOA"),
            Self::PTR => write!(f, "PTR"),
            Self::MX => write!(f, "MX"),
            Self::TXT => write!(f, "TXT"),
            Self::AAAA => write!(f, "AAAA"),
            Self::OPT => write!(f, "OPT"),
            Self::DS => write!(f, "DS"),
            Self::RRSIG => write!(f, "RRSIG"),
            Self::DNSKEY => write!(f, "DNSKEY"),
            // RFC 3597 notation for types we do not name
            Self::Unknown(other) => write!(f, "TYPE{}", other),
        }
    }
}

impl FromStr for RecordType {
    type Err = DnsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "NS" => Ok(Self::NS),
            "CNAME" => Ok(Self::CNAME),
            "SOA" => Ok(Self::SOA),
            "PTR" => Ok(Self::PTR),
            "MX" => Ok(Self::MX),
            "TXT" => Ok(Self::TXT),
            "AAAA" => Ok(Self::AAAA),
            "OPT" => Ok(Self::OPT),
            "DS" => Ok(Self::DS),
            "RRSIG" => Ok(Self::RRSIG),
            "DNSKEY" => Ok(Self::DNSKEY),
            other => match other.strip_prefix("TYPE").and_then(|n| n.parse().ok()) {
                Some(n) => Ok(Self::from_u16(n)),
                None => Err(DnsError::UnknownRecordType(s.to_string())),
            },
        }
    }
}
