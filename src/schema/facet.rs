use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::BinarySerializable;

/// `\u{1}` separates path segments inside the binary encoding of a
/// `Facet`. It's a control character unlikely to appear in a hand-typed
/// facet path and, unlike `/`, never needs escaping in the textual form
/// of a plain segment.
const FACET_PATH_SEP: char = '\u{1}';

/// A slash-separated hierarchical path (`/electronics/laptops`), indexed
/// as one token per path prefix so that a query against `/electronics`
/// also matches documents faceted under `/electronics/laptops`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Facet(String);

impl Facet {
    pub fn root() -> Facet {
        Facet(String::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn from_path<I, S>(segments: I) -> Facet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut encoded = String::new();
        for segment in segments {
            encoded.push(FACET_PATH_SEP);
            encoded.push_str(segment.as_ref());
        }
        Facet(encoded)
    }

    /// Every ancestor of this facet, root-first, including itself.
    /// `/a/b/c` yields `/`, `/a`, `/a/b`, `/a/b/c`.
    pub fn ancestors(&self) -> Vec<Facet> {
        let mut result = vec![Facet::root()];
        let mut acc = String::new();
        for segment in self.0.split(FACET_PATH_SEP).skip(1) {
            acc.push(FACET_PATH_SEP);
            acc.push_str(segment);
            result.push(Facet(acc.clone()));
        }
        result
    }

    pub fn encoded_str(&self) -> &str {
        &self.0
    }

    /// Rebuilds a `Facet` from bytes already in the `\u{1}`-separated
    /// encoding -- what a facet field's term dictionary keys actually
    /// hold (used by `collector::FacetCollector` to turn a fast field's
    /// term ordinals back into facet paths).
    pub fn from_encoded(bytes: &[u8]) -> Result<Facet, std::str::Utf8Error> {
        Ok(Facet(std::str::from_utf8(bytes)?.to_string()))
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, "/");
        }
        for segment in self.0.split(FACET_PATH_SEP).skip(1) {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetParseError(String);

impl fmt::Display for FacetParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid facet path: {}", self.0)
    }
}

impl std::error::Error for FacetParseError {}

impl FromStr for Facet {
    type Err = FacetParseError;

    fn from_str(text: &str) -> Result<Facet, FacetParseError> {
        if text.is_empty() || text == "/" {
            return Ok(Facet::root());
        }
        if !text.starts_with('/') {
            return Err(FacetParseError(text.to_string()));
        }
        Ok(Facet::from_path(text[1..].split('/')))
    }
}

impl BinarySerializable for Facet {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.0.serialize(writer)
    }
    fn deserialize<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Facet(String::deserialize(reader)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_display_roundtrip() {
        let facet: Facet = "/electronics/laptops".parse().unwrap();
        assert_eq!(facet.to_string(), "/electronics/laptops");
    }

    #[test]
    fn test_facet_root() {
        let facet: Facet = "/".parse().unwrap();
        assert!(facet.is_root());
        assert_eq!(facet.to_string(), "/");
    }

    #[test]
    fn test_facet_ancestors() {
        let facet: Facet = "/a/b/c".parse().unwrap();
        let ancestors: Vec<String> = facet.ancestors().iter().map(|f| f.to_string()).collect();
        assert_eq!(ancestors, vec!["/", "/a", "/a/b", "/a/b/c"]);
    }

    #[test]
    fn test_facet_rejects_missing_leading_slash() {
        assert!("electronics".parse::<Facet>().is_err());
    }
}
