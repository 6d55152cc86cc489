//! The recursive trust-chain resolution engine.
//!
//! One [`ProofSession`] lives for exactly one top-level call. It owns the
//! query cache and threads every recursive step through the prover's
//! configuration; nothing here is shared between sessions.

use std::collections::HashMap;

use futures::future::BoxFuture;
use tracing::{debug, trace};

use crate::dns::enums::{CLASS_IN, RCODE_NOERROR, RecordType};
use crate::dns::header::DnsHeader;
use crate::dns::name;
use crate::dns::question::Question;
use crate::dns::resource::{Dnskey, Ds, RData, ResourceRecord, Rrsig};
use crate::dns::DnsMessage;
use crate::dnssec::constants;
use crate::dnssec::key_tag::calculate_key_tag;
use crate::dnssec::prover::DnsProver;
use crate::dnssec::signed_set::SignedSet;
use crate::error::ProofError;

/// A verified record set plus the chain that authenticates it.
///
/// `proofs[0]` is the proof closest to the root; the last entry is the
/// DNSKEY set that signed the answer.
#[derive(Debug, Clone)]
pub struct ProvableAnswer {
    pub answer: SignedSet,
    pub proofs: Vec<SignedSet>,
}

pub(crate) struct ProofSession<'a> {
    prover: &'a DnsProver,
    cache: HashMap<(String, RecordType), DnsMessage>,
}

impl<'a> ProofSession<'a> {
    pub(crate) fn new(prover: &'a DnsProver) -> Self {
        Self {
            prover,
            cache: HashMap::new(),
        }
    }

    /// Resolve `qname`/`rtype` and authenticate the result up to a trust
    /// anchor. `Ok(None)` means the name exists but carries no records of
    /// the requested type (distinct from a proven denial, which is out of
    /// scope here).
    pub(crate) fn query_with_proof<'s>(
        &'s mut self,
        rtype: RecordType,
        qname: &str,
    ) -> BoxFuture<'s, Result<Option<ProvableAnswer>, ProofError>> {
        let qname = qname.to_string();
        Box::pin(async move {
            let response = self.lookup(rtype, &qname).await?;

            let answers: Vec<ResourceRecord> = response
                .answers
                .iter()
                .filter(|r| r.rtype == rtype && r.name == qname)
                .cloned()
                .collect();
            if answers.is_empty() {
                debug!(%qname, %rtype, "no records of requested type");
                return Ok(None);
            }

            let sigs: Vec<Rrsig> = response
                .answers
                .iter()
                .filter(|r| r.rtype == RecordType::RRSIG && r.name == qname)
                .filter_map(|r| match &r.rdata {
                    RData::Rrsig(sig) if sig.type_covered == rtype => Some(sig.clone()),
                    _ => None,
                })
                .collect();

            // A self-signed DNSKEY set is authenticated by the parent's DS
            // records rather than by another DNSKEY signature; recursing on
            // the signer would never terminate.
            if rtype == RecordType::DNSKEY && sigs.iter().any(|sig| sig.signer_name == qname) {
                trace!(%qname, "self-signed DNSKEY set, authenticating via delegation");
                return self.verify_with_ds(answers, sigs).await.map(Some);
            }
            self.verify_rrset(answers, sigs).await.map(Some)
        })
    }

    /// Memoized query. The response is cached before its rcode is checked,
    /// so revisiting a failed (name, type) within this session re-raises
    /// the same error without another transport round trip.
    async fn lookup(&mut self, rtype: RecordType, qname: &str) -> Result<DnsMessage, ProofError> {
        let query = build_query(rtype, qname);
        let key = (qname.to_string(), rtype);
        if !self.cache.contains_key(&key) {
            trace!(%qname, %rtype, "sending query");
            let response = self.prover.transport().send(&query).await?;
            self.cache.insert(key.clone(), response);
        }
        let response = &self.cache[&key];
        if response.header.rcode != RCODE_NOERROR {
            return Err(ProofError::ResponseCode {
                query: Box::new(query),
                response: Box::new(response.clone()),
            });
        }
        Ok(response.clone())
    }

    /// Authenticate a record set against the DNSKEY set of each candidate
    /// signature's signer, in response order; first verifying key wins.
    async fn verify_rrset(
        &mut self,
        answers: Vec<ResourceRecord>,
        sigs: Vec<Rrsig>,
    ) -> Result<ProvableAnswer, ProofError> {
        for sig in &sigs {
            if !self.prover.algorithms().supports(sig.algorithm) {
                trace!(algorithm = sig.algorithm, "skipping unregistered algorithm");
                continue;
            }
            let set = SignedSet::new(
                answers[0].name.clone(),
                answers[0].class,
                answers.clone(),
                sig.clone(),
            );

            let Some(ProvableAnswer { answer, mut proofs }) = self
                .query_with_proof(RecordType::DNSKEY, &sig.signer_name)
                .await?
            else {
                return Err(ProofError::NoValidDnskey { records: answers });
            };

            for key in &answer.records {
                if self.verify_signature(&set, key) {
                    debug!(name = %set.name, rtype = %set.record_type(), signer = %sig.signer_name, "record set verified");
                    proofs.push(answer);
                    return Ok(ProvableAnswer { answer: set, proofs });
                }
            }
        }
        Err(ProofError::NoValidDnskey { records: answers })
    }

    /// Authenticate a self-signed DNSKEY set through a delegation: DS
    /// records from the parent zone, or the static trust anchors at the
    /// root (the terminal base case).
    async fn verify_with_ds(
        &mut self,
        keys: Vec<ResourceRecord>,
        sigs: Vec<Rrsig>,
    ) -> Result<ProvableAnswer, ProofError> {
        let key_name = keys[0].name.clone();
        let key_class = keys[0].class;

        let (ds_candidates, mut proofs): (Vec<(String, Ds)>, Vec<SignedSet>) =
            if key_name == name::ROOT {
                trace!("at root, using static trust anchors");
                let anchors = self
                    .prover
                    .anchors()
                    .iter()
                    .map(|anchor| (anchor.name.clone(), anchor.ds.clone()))
                    .collect();
                (anchors, Vec::new())
            } else {
                let Some(ProvableAnswer { answer, mut proofs }) =
                    self.query_with_proof(RecordType::DS, &key_name).await?
                else {
                    return Err(ProofError::NoValidDs { keys });
                };
                let ds = answer
                    .records
                    .iter()
                    .filter_map(|r| match &r.rdata {
                        RData::Ds(ds) => Some((r.name.clone(), ds.clone())),
                        _ => None,
                    })
                    .collect();
                proofs.push(answer);
                (ds, proofs)
            };

        // Key tags narrow the candidate search to O(1) per DS record.
        let mut keys_by_tag: HashMap<u16, Vec<&ResourceRecord>> = HashMap::new();
        for record in &keys {
            if let RData::Dnskey(key) = &record.rdata {
                keys_by_tag
                    .entry(calculate_key_tag(key))
                    .or_default()
                    .push(record);
            }
        }
        let mut sigs_by_tag: HashMap<u16, Vec<&Rrsig>> = HashMap::new();
        for sig in &sigs {
            sigs_by_tag.entry(sig.key_tag).or_default().push(sig);
        }

        for (ds_name, ds) in &ds_candidates {
            for record in keys_by_tag.get(&ds.key_tag).map(Vec::as_slice).unwrap_or(&[]) {
                let RData::Dnskey(key) = &record.rdata else {
                    continue;
                };
                if !self.check_ds(ds_name, ds, &record.name, key) {
                    continue;
                }
                for sig in sigs_by_tag.get(&ds.key_tag).map(Vec::as_slice).unwrap_or(&[]) {
                    let set = SignedSet::new(
                        key_name.clone(),
                        key_class,
                        keys.clone(),
                        (*sig).clone(),
                    );
                    if self.verify_signature(&set, record) {
                        debug!(name = %key_name, key_tag = ds.key_tag, "DNSKEY set verified via DS");
                        return Ok(ProvableAnswer {
                            answer: set,
                            proofs,
                        });
                    }
                }
            }
        }
        Err(ProofError::NoValidDs { keys })
    }

    /// Check one candidate key against the set's signature. Never errors;
    /// a mismatched or unregistered candidate simply does not verify.
    fn verify_signature(&self, set: &SignedSet, key_record: &ResourceRecord) -> bool {
        let RData::Dnskey(key) = &key_record.rdata else {
            return false;
        };
        let sig = &set.signature;
        if key.algorithm != sig.algorithm
            || calculate_key_tag(key) != sig.key_tag
            || key_record.name != sig.signer_name
        {
            return false;
        }
        let Some(verifier) = self.prover.algorithms().get(sig.algorithm) else {
            return false;
        };
        let verified = verifier.verify(&key.public_key, &set.to_wire(true), &sig.signature);
        trace!(
            verifier = verifier.name(),
            key_tag = sig.key_tag,
            verified,
            "signature check"
        );
        verified
    }

    /// Check one DS record against one candidate key. The digest input is
    /// the wire-encoded owner name followed by the key's rdata, with no
    /// length prefix (RFC 4034 section 5.1.4).
    fn check_ds(&self, ds_name: &str, ds: &Ds, key_name: &str, key: &Dnskey) -> bool {
        if key.algorithm != ds.algorithm || key_name != ds_name {
            return false;
        }
        let Some(verifier) = self.prover.digests().get(ds.digest_type) else {
            return false;
        };
        let mut message = name::encode_name(ds_name);
        message.extend_from_slice(&key.encode());
        let matched = verifier.verify(&message, &ds.digest);
        trace!(
            verifier = verifier.name(),
            key_tag = ds.key_tag,
            matched,
            "DS digest check"
        );
        matched
    }
}

/// Build the query message for one lookup: recursion desired, one
/// question, and an EDNS0 OPT advertising DNSSEC support.
fn build_query(rtype: RecordType, qname: &str) -> DnsMessage {
    DnsMessage {
        header: DnsHeader {
            id: constants::QUERY_ID,
            rd: true,
            ..Default::default()
        },
        questions: vec![Question {
            name: qname.to_string(),
            qtype: rtype,
            qclass: CLASS_IN,
        }],
        answers: Vec::new(),
        authorities: Vec::new(),
        additionals: vec![ResourceRecord {
            name: name::ROOT.to_string(),
            rtype: RecordType::OPT,
            class: constants::EDNS_UDP_SIZE,
            ttl: u32::from(constants::DO_FLAG),
            rdata: RData::Opt(Vec::new()),
        }],
    }
}
