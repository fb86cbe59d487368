//! Opaque record identifiers.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// Identifier of one collection record.
///
/// The remote store assigns ids (numeric or textual); locally synthesized ids
/// are epoch-millisecond numbers rendered as text. Numeric ids double as a
/// creation-order proxy for recency sorting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric view of the id, when it is an integer.
    pub fn as_number(&self) -> Option<i64> {
        self.0.trim().parse::<i64>().ok()
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<i64> for ResourceId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for ResourceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = ResourceId;

            fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str("a string or integer id")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                if value.trim().is_empty() {
                    return Err(E::custom("id cannot be blank"));
                }
                Ok(ResourceId::new(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                Ok(ResourceId::from(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                Ok(ResourceId::new(value.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::ResourceId;

    #[test]
    fn accepts_numeric_and_text_ids() {
        let numeric: ResourceId = serde_json::from_str("42").expect("numeric id");
        assert_eq!(numeric.as_str(), "42");
        assert_eq!(numeric.as_number(), Some(42));

        let text: ResourceId =
            serde_json::from_str("\"6f1c0a2e-1b7d-4c34-9a55-1c0f6f9b2d10\"").expect("text id");
        assert_eq!(text.as_number(), None);
    }

    #[test]
    fn rejects_blank_ids() {
        assert!(serde_json::from_str::<ResourceId>("\"  \"").is_err());
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&ResourceId::from(7)).expect("serialize");
        assert_eq!(json, "\"7\"");
    }
}
