mod common;

use std::sync::Arc;

use dnsproof::DnsProver;
use dnsproof::dns::enums::RecordType;
use dnsproof::dns::resource::RData;
use dnsproof::error::ProofError;

use common::*;

fn prover_for(transport: Arc<StaticTransport>, fixture: &ChainFixture) -> DnsProver {
    DnsProver::new(transport)
        .with_algorithms(permissive_algorithms())
        .with_anchors(vec![fixture.anchor.clone()])
}

#[tokio::test]
async fn test_root_dnskey_set_has_empty_proof_list() {
    let fixture = chain_fixture();
    let transport = Arc::new(StaticTransport::new(fixture.responses.clone()));
    let prover = prover_for(transport.clone(), &fixture);

    let result = prover
        .query_with_proof(RecordType::DNSKEY, ".")
        .await
        .unwrap()
        .expect("root DNSKEY set should resolve");

    assert!(result.proofs.is_empty());
    assert_eq!(result.answer.name, ".");
    assert_eq!(result.answer.record_type(), RecordType::DNSKEY);
    assert_eq!(result.answer.records, vec![fixture.root_key.clone()]);
}

#[tokio::test]
async fn test_chain_across_two_delegations() {
    let fixture = chain_fixture();
    let transport = Arc::new(StaticTransport::new(fixture.responses.clone()));
    let prover = prover_for(transport.clone(), &fixture);

    let result = prover
        .query_with_proof(RecordType::TXT, "example.com")
        .await
        .unwrap()
        .expect("TXT set should resolve");

    assert_eq!(result.answer.name, "example.com");
    assert_eq!(result.answer.record_type(), RecordType::TXT);

    // Ordered from the proof nearest the root to the proof nearest the
    // answer, alternating DNSKEY and DS sets per zone cut.
    let shape: Vec<(String, RecordType)> = result
        .proofs
        .iter()
        .map(|proof| (proof.name.clone(), proof.record_type()))
        .collect();
    assert_eq!(
        shape,
        vec![
            (".".to_string(), RecordType::DNSKEY),
            ("com".to_string(), RecordType::DS),
            ("com".to_string(), RecordType::DNSKEY),
            ("example.com".to_string(), RecordType::DS),
            ("example.com".to_string(), RecordType::DNSKEY),
        ]
    );

    // Every lookup in the chain went out exactly once.
    for (qname, rtype) in [
        (".", RecordType::DNSKEY),
        ("com", RecordType::DS),
        ("com", RecordType::DNSKEY),
        ("example.com", RecordType::DS),
        ("example.com", RecordType::DNSKEY),
        ("example.com", RecordType::TXT),
    ] {
        assert_eq!(transport.hit_count(qname, rtype), 1, "{qname} {rtype}");
    }
}

#[tokio::test]
async fn test_repeated_lookup_hits_session_cache() {
    let mut fixture = chain_fixture();

    // Two signatures over the TXT set, both naming example.com as signer.
    // The first carries a key tag matching no key, so its DNSKEY
    // resolution succeeds but verification moves on to the second
    // signature, which resolves the same (name, type) again.
    let example_dnskey = dnskey_data(&fixture.example_key);
    let txt = txt_record("example.com", 300, "proof me");
    let good_sig = rrsig_record(std::slice::from_ref(&txt), "example.com", &example_dnskey);
    let mut bad_sig = good_sig.clone();
    if let RData::Rrsig(sig) = &mut bad_sig.rdata {
        sig.key_tag = sig.key_tag.wrapping_add(1);
    }
    fixture.responses.insert(
        ("example.com".to_string(), RecordType::TXT),
        response(vec![txt, bad_sig, good_sig]),
    );

    let transport = Arc::new(StaticTransport::new(fixture.responses.clone()));
    let prover = prover_for(transport.clone(), &fixture);

    let result = prover
        .query_with_proof(RecordType::TXT, "example.com")
        .await
        .unwrap();
    assert!(result.is_some());
    assert_eq!(transport.hit_count("example.com", RecordType::DNSKEY), 1);
}

#[tokio::test]
async fn test_missing_records_is_not_found() {
    let fixture = chain_fixture();
    let transport = Arc::new(StaticTransport::new(fixture.responses.clone()));
    let prover = prover_for(transport.clone(), &fixture);

    let result = prover
        .query_with_proof(RecordType::TXT, "nothing.example.com")
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_servfail_carries_query_and_response() {
    let mut fixture = chain_fixture();
    fixture
        .responses
        .insert(("broken.test".to_string(), RecordType::TXT), servfail());
    let transport = Arc::new(StaticTransport::new(fixture.responses.clone()));
    let prover = prover_for(transport.clone(), &fixture);

    let err = prover
        .query_with_proof(RecordType::TXT, "broken.test")
        .await
        .unwrap_err();
    match err {
        ProofError::ResponseCode { query, response } => {
            assert_eq!(query.questions[0].name, "broken.test");
            assert_eq!(query.questions[0].qtype, RecordType::TXT);
            assert_eq!(response.header.rcode, 2);
        }
        other => panic!("expected ResponseCode, got {:?}", other),
    }
}

#[tokio::test]
async fn test_transport_failure_unwinds_whole_call() {
    // The TXT set itself resolves, but its signer's DNSKEY lookup fails;
    // the error aborts the top-level call with no partial proof.
    let mut fixture = chain_fixture();
    fixture.responses.insert(
        ("example.com".to_string(), RecordType::DNSKEY),
        servfail(),
    );
    let transport = Arc::new(StaticTransport::new(fixture.responses.clone()));
    let prover = prover_for(transport.clone(), &fixture);

    let err = prover
        .query_with_proof(RecordType::TXT, "example.com")
        .await
        .unwrap_err();
    match err {
        ProofError::ResponseCode { query, .. } => {
            assert_eq!(query.questions[0].qtype, RecordType::DNSKEY);
            assert_eq!(query.questions[0].name, "example.com");
        }
        other => panic!("expected ResponseCode, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unregistered_algorithm_is_skipped_not_fatal() {
    let mut fixture = chain_fixture();
    let example_dnskey = dnskey_data(&fixture.example_key);
    let txt = txt_record("example.com", 300, "proof me");
    let good_sig = rrsig_record(std::slice::from_ref(&txt), "example.com", &example_dnskey);
    let mut alien_sig = good_sig.clone();
    if let RData::Rrsig(sig) = &mut alien_sig.rdata {
        sig.algorithm = 3; // never registered
    }
    fixture.responses.insert(
        ("example.com".to_string(), RecordType::TXT),
        response(vec![txt, alien_sig, good_sig]),
    );
    let transport = Arc::new(StaticTransport::new(fixture.responses.clone()));
    let prover = prover_for(transport.clone(), &fixture);

    let result = prover
        .query_with_proof(RecordType::TXT, "example.com")
        .await
        .unwrap();
    assert!(result.is_some());
}

#[tokio::test]
async fn test_all_algorithms_unsupported_is_no_valid_dnskey() {
    let mut fixture = chain_fixture();
    let example_dnskey = dnskey_data(&fixture.example_key);
    let txt = txt_record("example.com", 300, "proof me");
    let mut sig = rrsig_record(std::slice::from_ref(&txt), "example.com", &example_dnskey);
    if let RData::Rrsig(rrsig) = &mut sig.rdata {
        rrsig.algorithm = 3;
    }
    fixture.responses.insert(
        ("example.com".to_string(), RecordType::TXT),
        response(vec![txt.clone(), sig]),
    );
    let transport = Arc::new(StaticTransport::new(fixture.responses.clone()));
    let prover = prover_for(transport.clone(), &fixture);

    let err = prover
        .query_with_proof(RecordType::TXT, "example.com")
        .await
        .unwrap_err();
    match err {
        ProofError::NoValidDnskey { records } => {
            assert_eq!(records, vec![txt]);
        }
        other => panic!("expected NoValidDnskey, got {:?}", other),
    }
}

#[tokio::test]
async fn test_anchor_digest_mismatch_is_no_valid_ds() {
    let fixture = chain_fixture();
    let mut bad_anchor = fixture.anchor.clone();
    bad_anchor.ds.digest = vec![0; 32];
    let transport = Arc::new(StaticTransport::new(fixture.responses.clone()));
    let prover = DnsProver::new(transport)
        .with_algorithms(permissive_algorithms())
        .with_anchors(vec![bad_anchor]);

    let err = prover
        .query_with_proof(RecordType::DNSKEY, ".")
        .await
        .unwrap_err();
    match err {
        ProofError::NoValidDs { keys } => {
            assert_eq!(keys, vec![fixture.root_key.clone()]);
        }
        other => panic!("expected NoValidDs, got {:?}", other),
    }
}

#[tokio::test]
async fn test_outgoing_query_shape() {
    let fixture = chain_fixture();
    let transport = Arc::new(StaticTransport::new(fixture.responses.clone()));
    let prover = prover_for(transport.clone(), &fixture);

    prover
        .query_with_proof(RecordType::TXT, "example.com")
        .await
        .unwrap();

    let queries = transport.queries.lock().unwrap();
    let first = &queries[0];
    assert!(first.header.rd);
    assert_eq!(first.additionals.len(), 1);
    let opt = &first.additionals[0];
    assert_eq!(opt.rtype, RecordType::OPT);
    assert_eq!(opt.class, 4096);
    assert_eq!(opt.ttl, 0x8000, "DO bit set in EDNS flags");
}
