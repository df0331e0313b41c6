use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique, randomly generated identifier for a segment. Segment ids are
/// never reused: a merge produces a brand new id rather than recycling
/// one of its inputs', so that a stale reference can never silently
/// resolve to unrelated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(Uuid);

impl SegmentId {
    /// Generates a fresh, random segment id.
    pub fn generate() -> SegmentId {
        SegmentId(Uuid::new_v4())
    }

    /// The plain hex form used to build on-disk file names
    /// (`<segment_id>.<ext>`, §6 "On-disk file naming").
    pub fn uuid_string(&self) -> String {
        self.0.to_string().replace('-', "")
    }

    pub fn short_uuid_string(&self) -> String {
        self.uuid_string()[..8].to_string()
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_uuid_string())
    }
}

impl Serialize for SegmentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.uuid_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SegmentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        let uuid = Uuid::parse_str(&text).map_err(serde::de::Error::custom)?;
        Ok(SegmentId(uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_id_unique() {
        assert_ne!(SegmentId::generate(), SegmentId::generate());
    }

    #[test]
    fn test_segment_id_json_roundtrip() {
        let id = SegmentId::generate();
        let json = serde_json::to_string(&id).unwrap();
        let read_back: SegmentId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, read_back);
    }
}
