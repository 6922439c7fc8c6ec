use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque page identifier, assigned once by the store and never reused.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this id can name a record. Only non-empty ASCII alphanumerics
    /// qualify, so an id is never interpreted as a path.
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_alphanumeric())
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for PageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for PageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A wiki page as persisted. `body` is always in identifier-form: links name
/// other pages by id, never by title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Page {
    pub id: PageId,
    pub title: String,
    pub body: String,
}

impl Page {
    /// A page not yet stored. The id stays empty until the store assigns one.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: PageId::default(),
            title: title.into(),
            body: body.into(),
        }
    }
}
