//! DNS message wire codec: header, question and resource record sections,
//! with name compression handled on decode.

pub mod enums;
pub mod header;
pub mod name;
pub mod question;
pub mod resource;

use tracing::trace;

use crate::error::DnsError;
use header::DnsHeader;
use question::Question;
use resource::ResourceRecord;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DnsMessage {
    pub header: DnsHeader,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl DnsMessage {
    /// Encode to wire format. Section counts are taken from the section
    /// vectors, not from the stored header.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(512);
        let header = DnsHeader {
            qdcount: self.questions.len() as u16,
            ancount: self.answers.len() as u16,
            nscount: self.authorities.len() as u16,
            arcount: self.additionals.len() as u16,
            ..self.header.clone()
        };
        header.encode(&mut out);
        for question in &self.questions {
            question.encode(&mut out);
        }
        for record in self
            .answers
            .iter()
            .chain(self.authorities.iter())
            .chain(self.additionals.iter())
        {
            record.encode(&mut out);
        }
        out
    }

    pub fn decode(buf: &[u8]) -> Result<Self, DnsError> {
        trace!(len = buf.len(), "decoding DNS message");
        let header = DnsHeader::decode(buf)?;
        let mut pos = header::HEADER_LEN;

        let mut questions = Vec::with_capacity(header.qdcount.into());
        for _ in 0..header.qdcount {
            let (question, next) = Question::decode(buf, pos)?;
            questions.push(question);
            pos = next;
        }

        let mut sections = [
            Vec::with_capacity(header.ancount.into()),
            Vec::with_capacity(header.nscount.into()),
            Vec::with_capacity(header.arcount.into()),
        ];
        let counts = [header.ancount, header.nscount, header.arcount];
        for (section, count) in sections.iter_mut().zip(counts) {
            for _ in 0..count {
                let (record, next) = ResourceRecord::decode(buf, pos)?;
                section.push(record);
                pos = next;
            }
        }
        let [answers, authorities, additionals] = sections;

        Ok(Self {
            header,
            questions,
            answers,
            authorities,
            additionals,
        })
    }
}
