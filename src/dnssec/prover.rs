use std::sync::Arc;

use tracing::debug;

use crate::dns::enums::RecordType;
use crate::dnssec::registry::{AlgorithmRegistry, DigestRegistry};
use crate::dnssec::resolver::{ProofSession, ProvableAnswer};
use crate::dnssec::trust_anchor::{TrustAnchor, root_trust_anchors};
use crate::error::ProofError;
use crate::transport::{DohTransport, QueryTransport};

/// The public entry point: holds the transport, the verification
/// registries and the trust anchors, and starts a fresh resolution
/// session for every top-level call. Configuration is immutable once the
/// prover is built; sessions never share state.
pub struct DnsProver {
    transport: Arc<dyn QueryTransport>,
    digests: DigestRegistry,
    algorithms: AlgorithmRegistry,
    anchors: Vec<TrustAnchor>,
}

impl DnsProver {
    /// Build a prover with the default registries and root trust anchors.
    pub fn new(transport: Arc<dyn QueryTransport>) -> Self {
        Self {
            transport,
            digests: DigestRegistry::default(),
            algorithms: AlgorithmRegistry::default(),
            anchors: root_trust_anchors(),
        }
    }

    /// Convenience constructor over a DNS-over-HTTPS endpoint.
    pub fn doh(url: impl Into<String>) -> Self {
        Self::new(Arc::new(DohTransport::new(url)))
    }

    pub fn with_digests(mut self, digests: DigestRegistry) -> Self {
        self.digests = digests;
        self
    }

    pub fn with_algorithms(mut self, algorithms: AlgorithmRegistry) -> Self {
        self.algorithms = algorithms;
        self
    }

    pub fn with_anchors(mut self, anchors: Vec<TrustAnchor>) -> Self {
        self.anchors = anchors;
        self
    }

    /// Resolve and authenticate one record set. Each call runs in its own
    /// session with a fresh query cache.
    pub async fn query_with_proof(
        &self,
        rtype: RecordType,
        qname: &str,
    ) -> Result<Option<ProvableAnswer>, ProofError> {
        debug!(%qname, %rtype, "starting proof session");
        let mut session = ProofSession::new(self);
        session.query_with_proof(rtype, qname).await
    }

    pub(crate) fn transport(&self) -> &dyn QueryTransport {
        self.transport.as_ref()
    }

    pub(crate) fn algorithms(&self) -> &AlgorithmRegistry {
        &self.algorithms
    }

    pub(crate) fn digests(&self) -> &DigestRegistry {
        &self.digests
    }

    pub(crate) fn anchors(&self) -> &[TrustAnchor] {
        &self.anchors
    }
}
