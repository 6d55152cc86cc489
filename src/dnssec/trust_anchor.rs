use crate::dns::name;
use crate::dns::resource::Ds;

/// A pre-configured, out-of-band-trusted DS record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustAnchor {
    /// Name the anchor authenticates, normally the root.
    pub name: String,
    pub ds: Ds,
}

impl TrustAnchor {
    pub fn new(name: impl Into<String>, ds: Ds) -> Self {
        Self {
            name: name.into(),
            ds,
        }
    }
}

/// The well-known root zone trust anchors: KSK-2010 (key tag 19036) and
/// KSK-2017 (key tag 20326), both RSASHA256 with SHA-256 digests.
pub fn root_trust_anchors() -> Vec<TrustAnchor> {
    vec![
        TrustAnchor::new(
            name::ROOT,
            Ds {
                key_tag: 19036,
                algorithm: 8,
                digest_type: 2,
                digest: hex::decode(
                    "49AAC11D7B6F6446702E54A1607371607A1A41855200FD2CE1CDDE32F24E8FB5",
                )
                .unwrap(),
            },
        ),
        TrustAnchor::new(
            name::ROOT,
            Ds {
                key_tag: 20326,
                algorithm: 8,
                digest_type: 2,
                digest: hex::decode(
                    "E06D44B80B8F1D39A95C0B0D7C65D08458E880409BBC683457104237C7F8EC8D",
                )
                .unwrap(),
            },
        ),
    ]
}
