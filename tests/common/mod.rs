#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use dnsproof::dns::DnsMessage;
use dnsproof::dns::enums::{CLASS_IN, RCODE_SERVFAIL, RecordType};
use dnsproof::dns::header::DnsHeader;
use dnsproof::dns::name;
use dnsproof::dnssec::registry::{Algorithm, AlgorithmRegistry, SignatureVerifier};
use dnsproof::dnssec::trust_anchor::TrustAnchor;
use dnsproof::dns::resource::{Dnskey, Ds, RData, ResourceRecord, Rrsig};
use dnsproof::dnssec::calculate_key_tag;
use dnsproof::transport::{QueryTransport, TransportError};

/// Serves canned responses keyed by (name, type) and counts transport
/// invocations per key. Unknown keys get an empty NOERROR answer.
pub struct StaticTransport {
    responses: HashMap<(String, RecordType), DnsMessage>,
    pub hits: Mutex<HashMap<(String, RecordType), usize>>,
    pub queries: Mutex<Vec<DnsMessage>>,
}

impl StaticTransport {
    pub fn new(responses: HashMap<(String, RecordType), DnsMessage>) -> Self {
        Self {
            responses,
            hits: Mutex::new(HashMap::new()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn hit_count(&self, qname: &str, rtype: RecordType) -> usize {
        self.hits
            .lock()
            .unwrap()
            .get(&(qname.to_string(), rtype))
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl QueryTransport for StaticTransport {
    async fn send(&self, query: &DnsMessage) -> Result<DnsMessage, TransportError> {
        let question = &query.questions[0];
        let key = (question.name.clone(), question.qtype);
        *self.hits.lock().unwrap().entry(key.clone()).or_insert(0) += 1;
        self.queries.lock().unwrap().push(query.clone());
        Ok(self
            .responses
            .get(&key)
            .cloned()
            .unwrap_or_else(|| response(Vec::new())))
    }
}

pub fn response(answers: Vec<ResourceRecord>) -> DnsMessage {
    DnsMessage {
        header: DnsHeader {
            id: 1,
            qr: true,
            rd: true,
            ra: true,
            ..Default::default()
        },
        answers,
        ..Default::default()
    }
}

pub fn servfail() -> DnsMessage {
    let mut message = response(Vec::new());
    message.header.rcode = RCODE_SERVFAIL;
    message
}

pub fn txt_record(qname: &str, ttl: u32, text: &str) -> ResourceRecord {
    ResourceRecord {
        name: qname.to_string(),
        rtype: RecordType::TXT,
        class: CLASS_IN,
        ttl,
        rdata: RData::Txt(vec![text.as_bytes().to_vec()]),
    }
}

/// A deterministic fake zone key; signature checks in these tests go
/// through an accept-all verifier, only tags and digests are real.
pub fn dnskey_record(qname: &str, seed: u8) -> ResourceRecord {
    ResourceRecord {
        name: qname.to_string(),
        rtype: RecordType::DNSKEY,
        class: CLASS_IN,
        ttl: 3600,
        rdata: RData::Dnskey(Dnskey {
            flags: 257,
            protocol: 3,
            algorithm: 8,
            public_key: (0..32).map(|i| i ^ seed).collect(),
        }),
    }
}

pub fn dnskey_data(record: &ResourceRecord) -> Dnskey {
    match &record.rdata {
        RData::Dnskey(key) => key.clone(),
        other => panic!("not a DNSKEY record: {:?}", other),
    }
}

pub fn rrsig_record(records: &[ResourceRecord], signer: &str, key: &Dnskey) -> ResourceRecord {
    let covered = &records[0];
    let labels = covered.name.split('.').filter(|l| !l.is_empty()).count() as u8;
    ResourceRecord {
        name: covered.name.clone(),
        rtype: RecordType::RRSIG,
        class: covered.class,
        ttl: covered.ttl,
        rdata: RData::Rrsig(Rrsig {
            type_covered: covered.rtype,
            algorithm: key.algorithm,
            labels,
            original_ttl: covered.ttl,
            expiration: 2_000_000_000,
            inception: 1_000_000_000,
            key_tag: calculate_key_tag(key),
            signer_name: signer.to_string(),
            signature: vec![0xAB; 16],
        }),
    }
}

/// Real SHA-256 DS digest over owner name ++ DNSKEY rdata, so the digest
/// path is exercised for real even when signatures are stubbed.
pub fn ds_digest(key_record: &ResourceRecord) -> Vec<u8> {
    let key = dnskey_data(key_record);
    let mut message = name::encode_name(&key_record.name);
    message.extend_from_slice(&key.encode());
    ring::digest::digest(&ring::digest::SHA256, &message)
        .as_ref()
        .to_vec()
}

pub fn ds_record(key_record: &ResourceRecord) -> ResourceRecord {
    let key = dnskey_data(key_record);
    ResourceRecord {
        name: key_record.name.clone(),
        rtype: RecordType::DS,
        class: CLASS_IN,
        ttl: 3600,
        rdata: RData::Ds(Ds {
            key_tag: calculate_key_tag(&key),
            algorithm: key.algorithm,
            digest_type: 2,
            digest: ds_digest(key_record),
        }),
    }
}

pub fn anchor_for(key_record: &ResourceRecord) -> TrustAnchor {
    let key = dnskey_data(key_record);
    TrustAnchor::new(
        key_record.name.clone(),
        Ds {
            key_tag: calculate_key_tag(&key),
            algorithm: key.algorithm,
            digest_type: 2,
            digest: ds_digest(key_record),
        },
    )
}

/// Accept-all verifier for RSASHA256, for tests about resolution
/// structure rather than cryptography.
pub fn permissive_algorithms() -> AlgorithmRegistry {
    let mut registry = AlgorithmRegistry::empty();
    registry.register(
        Algorithm::RsaSha256,
        SignatureVerifier::new("ACCEPT-ALL", |_, _, _| true),
    );
    registry
}

/// The three-zone fixture: root signs com's DS, com signs example.com's
/// DS, example.com signs a TXT set. Returns the transport responses, the
/// matching root anchor, and the per-zone keys.
pub struct ChainFixture {
    pub responses: HashMap<(String, RecordType), DnsMessage>,
    pub anchor: TrustAnchor,
    pub root_key: ResourceRecord,
    pub com_key: ResourceRecord,
    pub example_key: ResourceRecord,
}

pub fn chain_fixture() -> ChainFixture {
    let root_key = dnskey_record(".", 0x11);
    let com_key = dnskey_record("com", 0x22);
    let example_key = dnskey_record("example.com", 0x33);

    let root_dnskey = dnskey_data(&root_key);
    let com_dnskey = dnskey_data(&com_key);
    let example_dnskey = dnskey_data(&example_key);

    let mut responses = HashMap::new();
    responses.insert(
        (".".to_string(), RecordType::DNSKEY),
        response(vec![
            root_key.clone(),
            rrsig_record(std::slice::from_ref(&root_key), ".", &root_dnskey),
        ]),
    );

    let com_ds = ds_record(&com_key);
    responses.insert(
        ("com".to_string(), RecordType::DS),
        response(vec![
            com_ds.clone(),
            rrsig_record(std::slice::from_ref(&com_ds), ".", &root_dnskey),
        ]),
    );
    responses.insert(
        ("com".to_string(), RecordType::DNSKEY),
        response(vec![
            com_key.clone(),
            rrsig_record(std::slice::from_ref(&com_key), "com", &com_dnskey),
        ]),
    );

    let example_ds = ds_record(&example_key);
    responses.insert(
        ("example.com".to_string(), RecordType::DS),
        response(vec![
            example_ds.clone(),
            rrsig_record(std::slice::from_ref(&example_ds), "com", &com_dnskey),
        ]),
    );
    responses.insert(
        ("example.com".to_string(), RecordType::DNSKEY),
        response(vec![
            example_key.clone(),
            rrsig_record(std::slice::from_ref(&example_key), "example.com", &example_dnskey),
        ]),
    );

    let txt = txt_record("example.com", 300, "proof me");
    responses.insert(
        ("example.com".to_string(), RecordType::TXT),
        response(vec![
            txt.clone(),
            rrsig_record(std::slice::from_ref(&txt), "example.com", &example_dnskey),
        ]),
    );

    ChainFixture {
        responses,
        anchor: anchor_for(&root_key),
        root_key,
        com_key,
        example_key,
    }
}
