//! Xcode object identifiers
//!
//! Every object in a `project.pbxproj` is keyed by a 24 digit hex string.
//! The IDs carry no meaning beyond identity; they only link entries together.

use std::fmt;

use uuid::Uuid;

/// Length of an object ID in hex digits
pub const OBJECT_ID_LEN: usize = 24;

/// Opaque 24 character object identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of fresh object IDs
pub trait IdGenerator {
    fn next_id(&mut self) -> ObjectId;
}

/// Random IDs from a v4 UUID, truncated to 24 digits
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> ObjectId {
        let mut hex = Uuid::new_v4().simple().to_string();
        hex.truncate(OBJECT_ID_LEN);
        ObjectId(hex)
    }
}

/// Deterministic IDs from a counter, for reproducible output
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> ObjectId {
        self.next += 1;
        ObjectId(format!("{:0width$x}", self.next, width = OBJECT_ID_LEN))
    }
}
