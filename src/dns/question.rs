use crate::dns::enums::RecordType;
use crate::dns::name;
use crate::error::DnsError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub name: String,
    pub qtype: RecordType,
    pub qclass: u16,
}

impl Question {
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&name::encode_name(&self.name));
        out.extend_from_slice(&self.qtype.to_u16().to_be_bytes());
        out.extend_from_slice(&self.qclass.to_be_bytes());
    }

    /// Decode one question at `offset`; returns it and the offset just past it.
    pub fn decode(msg: &[u8], offset: usize) -> Result<(Self, usize), DnsError> {
        let (qname, pos) = name::decode_name(msg, offset)?;
        let fixed = msg.get(pos..pos + 4).ok_or(DnsError::BufferTooSmall {
            need: pos + 4,
            have: msg.len(),
        })?;
        Ok((
            Self {
                name: qname,
                qtype: RecordType::from_u16(u16::from_be_bytes([fixed[0], fixed[1]])),
                qclass: u16::from_be_bytes([fixed[2], fixed[3]]),
            },
            pos + 4,
        ))
    }
}
