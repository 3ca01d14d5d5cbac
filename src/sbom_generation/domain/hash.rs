use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hash algorithms a component digest may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[serde(rename = "MD5")]
    Md5,
    #[serde(rename = "SHA-1")]
    Sha1,
    #[serde(rename = "SHA-256")]
    Sha256,
    #[serde(rename = "SHA-384")]
    Sha384,
    #[serde(rename = "SHA-512")]
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 5] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "MD5",
            HashAlgorithm::Sha1 => "SHA-1",
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha384 => "SHA-384",
            HashAlgorithm::Sha512 => "SHA-512",
        }
    }

    /// Number of hex characters in a digest of this algorithm
    pub fn hex_len(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 32,
            HashAlgorithm::Sha1 => 40,
            HashAlgorithm::Sha256 => 64,
            HashAlgorithm::Sha384 => 96,
            HashAlgorithm::Sha512 => 128,
        }
    }

    /// Maps a subresource-integrity prefix (`sha512`, `sha1`...) to an algorithm
    pub fn from_sri_prefix(prefix: &str) -> Option<Self> {
        match prefix.to_ascii_lowercase().as_str() {
            "sha512" => Some(HashAlgorithm::Sha512),
            "sha384" => Some(HashAlgorithm::Sha384),
            "sha256" => Some(HashAlgorithm::Sha256),
            "sha1" => Some(HashAlgorithm::Sha1),
            _ => None,
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "MD5" => Ok(HashAlgorithm::Md5),
            "SHA1" => Ok(HashAlgorithm::Sha1),
            "SHA256" => Ok(HashAlgorithm::Sha256),
            "SHA384" => Ok(HashAlgorithm::Sha384),
            "SHA512" => Ok(HashAlgorithm::Sha512),
            _ => Err(format!("Unsupported hash algorithm: {}", s)),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A component digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hash {
    pub alg: HashAlgorithm,
    pub content: String,
}

impl Hash {
    pub fn new(alg: HashAlgorithm, content: impl Into<String>) -> Self {
        Self {
            alg,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_algorithm_from_str_variants() {
        assert_eq!("SHA-256".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha256));
        assert_eq!("sha256".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha256));
        assert_eq!("sha_512".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha512));
        assert_eq!("md5".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Md5));
        assert!("BLAKE3".parse::<HashAlgorithm>().is_err());
    }

    #[test]
    fn test_hash_algorithm_sri_prefix() {
        assert_eq!(
            HashAlgorithm::from_sri_prefix("sha384"),
            Some(HashAlgorithm::Sha384)
        );
        assert_eq!(HashAlgorithm::from_sri_prefix("md5"), None);
    }

    #[test]
    fn test_hash_algorithm_serializes_with_schema_names() {
        let json = serde_json::to_string(&Hash::new(HashAlgorithm::Sha1, "abc")).unwrap();
        assert_eq!(json, r#"{"alg":"SHA-1","content":"abc"}"#);
    }

    #[test]
    fn test_hash_algorithm_hex_len() {
        assert_eq!(HashAlgorithm::Sha384.hex_len(), 96);
        assert_eq!(HashAlgorithm::Md5.to_string(), "MD5");
    }
}
