//! Identifier of a stored review.
//!
//! Ids are opaque strings assigned by the store. They use `Arc<str>` so
//! cloning one into a state snapshot or a render layer is cheap.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReviewId(Arc<str>);

impl ReviewId {
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(s.as_ref().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ReviewId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for ReviewId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// Plain JSON string on the wire.
impl Serialize for ReviewId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ReviewId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}
