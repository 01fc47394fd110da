//! Movie runtime and its `"<n> mins"` wire encoding.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::CoreError;

/// A runtime in whole minutes.
///
/// On the wire this is always a JSON string such as `"102 mins"`; bare numbers
/// and any other unit are rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Runtime(pub i32);

impl Runtime {
    pub fn minutes(self) -> i32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parse the unquoted `"<n> mins"` form.
    ///
    /// Exactly one space, exactly the unit `mins`, and an `i32` count. No
    /// other whitespace or unit is tolerated.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let parts: Vec<&str> = s.split(' ').collect();
        if parts.len() != 2 || parts[1] != "mins" {
            return Err(CoreError::InvalidRuntimeFormat);
        }
        parts[0]
            .parse::<i32>()
            .map(Runtime)
            .map_err(|_| CoreError::InvalidRuntimeFormat)
    }
}

impl From<i32> for Runtime {
    fn from(minutes: i32) -> Self {
        Runtime(minutes)
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mins", self.0)
    }
}

impl Serialize for Runtime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct RuntimeVisitor;

impl Visitor<'_> for RuntimeVisitor {
    type Value = Runtime;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string of the form \"<runtime> mins\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Runtime, E> {
        Runtime::parse(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Runtime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Non-string input reaches `Visitor::invalid_type`; map every failure
        // to the same error so callers see one message.
        deserializer
            .deserialize_str(RuntimeVisitor)
            .map_err(|_| de::Error::custom(CoreError::InvalidRuntimeFormat))
    }
}
