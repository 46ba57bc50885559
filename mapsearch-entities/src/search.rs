use crate::geo::*;

/// Raw free-text input of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The query text without surrounding whitespace.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    pub fn is_empty(&self) -> bool {
        self.trimmed().is_empty()
    }
}

impl From<&str> for SearchQuery {
    fn from(from: &str) -> Self {
        Self::new(from)
    }
}

impl From<String> for SearchQuery {
    fn from(from: String) -> Self {
        Self::new(from)
    }
}

/// A single hit reported by a geocoding provider.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceCandidate {
    pub coordinate: Coordinate,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlace {
    pub coordinate: Coordinate,
    pub label: String,
}
