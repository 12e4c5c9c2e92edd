//! Member-related types for the settlement engine
//!
//! Members are identified by an opaque string id. The id ordering is the
//! total order the debt netter relies on to visit every pair exactly once.

use std::fmt;

/// Opaque member identifier
///
/// Stable within one computation; no two members of a group share an id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberId(String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        MemberId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        MemberId::new(id)
    }
}

impl From<String> for MemberId {
    fn from(id: String) -> Self {
        MemberId(id)
    }
}

/// Group member
///
/// The display name is carried for presentation only; the engine never
/// emits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub display_name: String,
}

impl Member {
    pub fn new(id: impl Into<MemberId>, display_name: impl Into<String>) -> Self {
        Member {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}
