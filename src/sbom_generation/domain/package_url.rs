use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building or parsing a package URL.
///
/// The assembly engine never lets these escape: classification and
/// reference extraction fall through to their defaults instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurlError {
    #[error("package URL must start with 'pkg:': {0}")]
    MissingScheme(String),

    #[error("package URL has no type: {0}")]
    MissingType(String),

    #[error("package URL type contains invalid characters: {0}")]
    InvalidType(String),

    #[error("package URL has no name: {0}")]
    MissingName(String),
}

/// Package URL value object.
///
/// Every component is stored percent-decoded; `Display` produces the
/// canonical encoded form. Because inputs are decoded once before being
/// stored, feeding an already-encoded value (`%40angular`) yields the same
/// purl as the raw value (`@angular`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageUrl {
    purl_type: String,
    namespace: Option<String>,
    name: String,
    version: Option<String>,
    qualifiers: BTreeMap<String, String>,
    subpath: Option<String>,
}

impl PackageUrl {
    /// Creates a package URL with a type and a name
    ///
    /// # Errors
    /// Returns an error if the type is empty or not made of
    /// ASCII letters, digits, `.`, `+` or `-`, or if the name is empty.
    pub fn new(purl_type: &str, name: &str) -> Result<Self, PurlError> {
        let purl_type = purl_type.trim().to_ascii_lowercase();
        if purl_type.is_empty() {
            return Err(PurlError::MissingType(name.to_string()));
        }
        if !purl_type
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-'))
        {
            return Err(PurlError::InvalidType(purl_type));
        }

        let name = decode_component(name.trim());
        if name.is_empty() {
            return Err(PurlError::MissingName(purl_type));
        }

        Ok(Self {
            purl_type,
            namespace: None,
            name,
            version: None,
            qualifiers: BTreeMap::new(),
            subpath: None,
        })
    }

    pub fn with_namespace(mut self, namespace: Option<&str>) -> Self {
        self.namespace = namespace
            .map(|ns| decode_component(ns.trim_matches('/')))
            .filter(|ns| !ns.is_empty());
        self
    }

    pub fn with_version(mut self, version: Option<&str>) -> Self {
        self.version = version.map(decode_component).filter(|v| !v.is_empty());
        self
    }

    pub fn with_qualifiers<'a, I>(mut self, qualifiers: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        self.qualifiers = qualifiers
            .into_iter()
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), decode_component(v)))
            .filter(|(k, v)| !k.is_empty() && !v.is_empty())
            .collect();
        self
    }

    pub fn with_subpath(mut self, subpath: Option<&str>) -> Self {
        self.subpath = subpath
            .map(|sp| decode_component(sp.trim_matches('/')))
            .filter(|sp| !sp.is_empty());
        self
    }

    pub fn purl_type(&self) -> &str {
        &self.purl_type
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn qualifiers(&self) -> &BTreeMap<String, String> {
        &self.qualifiers
    }

    pub fn subpath(&self) -> Option<&str> {
        self.subpath.as_deref()
    }

    /// The purl decoded once, which is what components use as `bom-ref`
    pub fn to_bom_ref(&self) -> String {
        decode_component(&self.to_string())
    }
}

impl fmt::Display for PackageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pkg:{}/", self.purl_type)?;

        if let Some(namespace) = &self.namespace {
            let segments: Vec<String> = namespace
                .split('/')
                .filter(|s| !s.is_empty())
                .map(encode_component)
                .collect();
            if !segments.is_empty() {
                write!(f, "{}/", segments.join("/"))?;
            }
        }

        f.write_str(&encode_component(&self.name))?;

        if let Some(version) = &self.version {
            write!(f, "@{}", encode_component(version))?;
        }

        if !self.qualifiers.is_empty() {
            let pairs: Vec<String> = self
                .qualifiers
                .iter()
                .map(|(k, v)| format!("{}={}", k, encode_component(v)))
                .collect();
            write!(f, "?{}", pairs.join("&"))?;
        }

        if let Some(subpath) = &self.subpath {
            let segments: Vec<String> = subpath
                .split('/')
                .filter(|s| !s.is_empty() && *s != "." && *s != "..")
                .map(encode_component)
                .collect();
            if !segments.is_empty() {
                write!(f, "#{}", segments.join("/"))?;
            }
        }

        Ok(())
    }
}

impl FromStr for PackageUrl {
    type Err = PurlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let rest = trimmed
            .strip_prefix("pkg:")
            .ok_or_else(|| PurlError::MissingScheme(trimmed.to_string()))?
            .trim_start_matches('/');

        let (rest, subpath) = match rest.split_once('#') {
            Some((head, sp)) => (head, Some(sp)),
            None => (rest, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((head, q)) => (head, Some(q)),
            None => (rest, None),
        };

        let (purl_type, path) = rest
            .split_once('/')
            .ok_or_else(|| PurlError::MissingName(trimmed.to_string()))?;

        let path = path.trim_end_matches('/');
        let (namespace, last) = match path.rsplit_once('/') {
            Some((ns, last)) => (Some(ns), last),
            None => (None, path),
        };
        let (name, version) = match last.rsplit_once('@') {
            Some((n, v)) if !n.is_empty() => (n, Some(v)),
            _ => (last, None),
        };

        let mut qualifiers = BTreeMap::new();
        if let Some(query) = query {
            for pair in query.split('&') {
                if let Some((k, v)) = pair.split_once('=') {
                    qualifiers.insert(k.to_string(), v.to_string());
                }
            }
        }

        Ok(PackageUrl::new(purl_type, name)?
            .with_namespace(namespace)
            .with_version(version)
            .with_qualifiers(qualifiers.iter())
            .with_subpath(subpath))
    }
}

/// Percent-decodes a purl or one of its components, keeping the input
/// unchanged when the decoded bytes are not valid UTF-8
pub fn decode_component(value: &str) -> String {
    urlencoding::decode(value)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

/// Percent-encodes one purl component; `:` stays literal.
fn encode_component(value: &str) -> String {
    urlencoding::encode(&decode_component(value)).replace("%3A", ":")
}
