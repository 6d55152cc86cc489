use crate::error::DnsError;

/// Size of the fixed DNS message header.
pub const HEADER_LEN: usize = 12;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DnsHeader {
    pub id: u16,
    pub qr: bool,
    pub opcode: u8,
    pub aa: bool,
    pub tc: bool,
    pub rd: bool,
    pub ra: bool,
    pub z: u8,
    pub rcode: u8,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

impl DnsHeader {
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.id.to_be_bytes());
        out.push(
            (self.qr as u8) << 7
                | (self.opcode & 0x0F) << 3
                | (self.aa as u8) << 2
                | (self.tc as u8) << 1
                | self.rd as u8,
        );
        out.push((self.ra as u8) << 7 | (self.z & 0x07) << 4 | (self.rcode & 0x0F));
        out.extend_from_slice(&self.qdcount.to_be_bytes());
        out.extend_from_slice(&self.ancount.to_be_bytes());
        out.extend_from_slice(&self.nscount.to_be_bytes());
        out.extend_from_slice(&self.arcount.to_be_bytes());
    }

    pub fn decode(buf: &[u8]) -> Result<Self, DnsError> {
        if buf.len() < HEADER_LEN {
            return Err(DnsError::BufferTooSmall {
                need: HEADER_LEN,
                have: buf.len(),
            });
        }
        Ok(Self {
            id: u16::from_be_bytes([buf[0], buf[1]]),
            qr: buf[2] & 0x80 != 0,
            opcode: (buf[2] >> 3) & 0x0F,
            aa: buf[2] & 0x04 != 0,
            tc: buf[2] & 0x02 != 0,
            rd: buf[2] & 0x01 != 0,
            ra: buf[3] & 0x80 != 0,
            z: (buf[3] >> 4) & 0x07,
            rcode: buf[3] & 0x0F,
            qdcount: u16::from_be_bytes([buf[4], buf[5]]),
            ancount: u16::from_be_bytes([buf[6], buf[7]]),
            nscount: u16::from_be_bytes([buf[8], buf[9]]),
            arcount: u16::from_be_bytes([buf[10], buf[11]]),
        })
    }
}
