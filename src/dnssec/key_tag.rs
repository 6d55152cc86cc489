use crate::dns::resource::Dnskey;

/// Calculate the key tag for a DNSKEY (RFC 4034 Appendix B).
///
/// Sums the canonical rdata as big-endian 16-bit words, folds the carry
/// back once and masks to 16 bits. The appendix's special case for the
/// obsolete RSAMD5 algorithm is deliberately not applied; the general rule
/// covers every algorithm id here.
pub fn calculate_key_tag(key: &Dnskey) -> u16 {
    let rdata = key.encode();
    let mut accumulator: u32 = 0;
    for (i, &byte) in rdata.iter().enumerate() {
        if i % 2 == 0 {
            accumulator += u32::from(byte) << 8;
        } else {
            accumulator += u32::from(byte);
        }
    }
    accumulator += accumulator >> 16;
    (accumulator & 0xFFFF) as u16
}
