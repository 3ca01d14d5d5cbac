use crate::sbom_generation::domain::{Hash, HashAlgorithm, RawPackage};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashMap;

/// Algorithms emitted from a subresource-integrity string, in output order
const SRI_ORDER: [HashAlgorithm; 4] = [
    HashAlgorithm::Sha512,
    HashAlgorithm::Sha384,
    HashAlgorithm::Sha256,
    HashAlgorithm::Sha1,
];

/// HashProcessor service extracting content hashes from a raw record
///
/// Evidence precedence:
/// 1. explicit `hashes` list (even when empty)
/// 2. legacy `_shasum` -> one SHA-1
/// 3. `_integrity` SRI string -> one hash per algorithm present
pub struct HashProcessor;

impl HashProcessor {
    /// Extracts hashes from a raw record
    ///
    /// # Returns
    /// The hash list; an empty list means the component carries no hashes
    pub fn process(raw: &RawPackage) -> Vec<Hash> {
        if let Some(hashes) = &raw.hashes {
            return hashes
                .iter()
                .filter_map(|h| match h.algorithm.parse::<HashAlgorithm>() {
                    Ok(alg) => Some(Self::make_hash(alg, &h.content)),
                    Err(e) => {
                        tracing::debug!(package = %raw.name, "{}", e);
                        None
                    }
                })
                .collect();
        }

        if let Some(shasum) = raw.shasum.as_deref().filter(|s| !s.is_empty()) {
            return vec![Self::make_hash(HashAlgorithm::Sha1, shasum)];
        }

        if let Some(integrity) = raw.integrity.as_deref() {
            let digests = Self::parse_integrity(integrity);
            return SRI_ORDER
                .iter()
                .filter_map(|alg| digests.get(alg).map(|digest| Self::make_hash(*alg, digest)))
                .collect();
        }

        Vec::new()
    }

    /// Parses an SRI string into the first digest of each supported algorithm
    ///
    /// Entries are whitespace separated `alg-digest[?options]` tokens;
    /// unknown algorithms and malformed tokens are ignored.
    pub fn parse_integrity(integrity: &str) -> HashMap<HashAlgorithm, String> {
        let mut digests = HashMap::new();
        for token in integrity.split_whitespace() {
            let Some((prefix, rest)) = token.split_once('-') else {
                continue;
            };
            let Some(alg) = HashAlgorithm::from_sri_prefix(prefix) else {
                continue;
            };
            let digest = rest.split('?').next().unwrap_or_default();
            if !digest.is_empty() {
                digests.entry(alg).or_insert_with(|| digest.to_string());
            }
        }
        digests
    }

    /// Keeps a well-formed hex digest, otherwise tries a base64 -> hex reinterpretation
    pub fn repair_digest(digest: &str) -> String {
        if Self::is_hex_digest(digest) {
            return digest.to_string();
        }

        match STANDARD.decode(digest) {
            Ok(bytes) if STANDARD.encode(&bytes) == digest => hex::encode(bytes),
            _ => digest.to_string(),
        }
    }

    /// True for hex strings with the length of any supported algorithm
    fn is_hex_digest(digest: &str) -> bool {
        HashAlgorithm::ALL
            .iter()
            .any(|alg| alg.hex_len() == digest.len())
            && digest.chars().all(|c| c.is_ascii_hexdigit())
    }

    fn make_hash(alg: HashAlgorithm, digest: &str) -> Hash {
        Hash::new(alg, Self::repair_digest(digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::RawHash;

    const SHA1_HEX: &str = "679591c564c3bffaae8454cf0b3df370c3d6911c";

    #[test]
    fn test_explicit_hashes_take_precedence() {
        let mut raw = RawPackage::new("a", "1");
        raw.hashes = Some(vec![RawHash {
            algorithm: "SHA-1".to_string(),
            content: SHA1_HEX.to_string(),
        }]);
        raw.shasum = Some("ignored".to_string());

        let hashes = HashProcessor::process(&raw);
        assert_eq!(hashes, vec![Hash::new(HashAlgorithm::Sha1, SHA1_HEX)]);
    }

    #[test]
    fn test_empty_explicit_hash_list_blocks_fallbacks() {
        let mut raw = RawPackage::new("a", "1");
        raw.hashes = Some(Vec::new());
        raw.shasum = Some(SHA1_HEX.to_string());

        assert!(HashProcessor::process(&raw).is_empty());
    }

    #[test]
    fn test_unknown_explicit_algorithm_is_dropped() {
        let mut raw = RawPackage::new("a", "1");
        raw.hashes = Some(vec![RawHash {
            algorithm: "BLAKE3".to_string(),
            content: "00".to_string(),
        }]);
        assert!(HashProcessor::process(&raw).is_empty());
    }

    #[test]
    fn test_shasum_yields_single_sha1() {
        let mut raw = RawPackage::new("a", "1");
        raw.shasum = Some(SHA1_HEX.to_string());
        raw.integrity = Some("sha512-AAAA".to_string());

        let hashes = HashProcessor::process(&raw);
        assert_eq!(hashes.len(), 1);
        assert_eq!(hashes[0].alg, HashAlgorithm::Sha1);
        assert_eq!(hashes[0].content, SHA1_HEX);
    }

    #[test]
    fn test_integrity_fan_out_order() {
        let mut raw = RawPackage::new("a", "1");
        // sha256 listed before sha512 in the input
        raw.integrity = Some("sha256-AAEC sha512-AwQF".to_string());

        let hashes = HashProcessor::process(&raw);
        assert_eq!(hashes.len(), 2);
        assert_eq!(hashes[0].alg, HashAlgorithm::Sha512);
        assert_eq!(hashes[1].alg, HashAlgorithm::Sha256);
        assert_eq!(hashes[0].content, "030405");
        assert_eq!(hashes[1].content, "000102");
    }

    #[test]
    fn test_integrity_keeps_first_digest_per_algorithm() {
        let digests = HashProcessor::parse_integrity("sha512-AAEC sha512-AwQF?opt md5-xyz bogus");
        assert_eq!(digests.len(), 1);
        assert_eq!(digests[&HashAlgorithm::Sha512], "AAEC");
    }

    #[test]
    fn test_repair_digest_keeps_hex() {
        assert_eq!(HashProcessor::repair_digest(SHA1_HEX), SHA1_HEX);
    }

    #[test]
    fn test_repair_digest_converts_base64() {
        // base64 of the 20 bytes of SHA1_HEX
        let encoded = STANDARD.encode(hex::decode(SHA1_HEX).unwrap());
        assert_eq!(HashProcessor::repair_digest(&encoded), SHA1_HEX);
    }

    #[test]
    fn test_repair_digest_keeps_unrecognised_input() {
        assert_eq!(HashProcessor::repair_digest("not-base64!"), "not-base64!");
    }

    #[test]
    fn test_no_evidence_no_hashes() {
        assert!(HashProcessor::process(&RawPackage::new("a", "1")).is_empty());
    }
}
