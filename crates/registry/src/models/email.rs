use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered, lower-cased significant words of a person's name.
///
/// Built by [`crate::services::tokenizer::tokenize`]. May be empty when the
/// source string held nothing but connector words and single vowels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTokens(Vec<String>);

impl NameTokens {
    pub fn new(tokens: Vec<String>) -> Self {
        Self(tokens)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for NameTokens {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A generated address of the form `{token}.{token}@{domain}`.
///
/// Nothing about construction makes it unique; only an existence check does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailCandidate(String);

impl EmailCandidate {
    pub fn new(first: &str, last: &str, domain: &str) -> Self {
        Self(format!("{}.{}@{}", first, last, domain))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EmailCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of asking the directory whether a candidate is already registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistenceResult {
    /// No account uses the address.
    Free,
    /// An account already owns the address.
    Taken,
    /// The check could not be completed (transport, status or decode failure).
    Unknown,
}

/// Which half of the name a token sequence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NameField {
    Name,
    Surname,
}

impl fmt::Display for NameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameField::Name => f.write_str("name"),
            NameField::Surname => f.write_str("surname"),
        }
    }
}

/// Final state of one resolution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The first free candidate in search order.
    Resolved(EmailCandidate),
    /// Every combination came back taken or unknown.
    Exhausted,
    /// Both sequences hold a single token and that one pairing is taken.
    ConflictBothSingleToken,
    /// The primary check could not be completed.
    LookupFailed,
    /// A token sequence was empty, so no candidate could be formed.
    EmptyTokenSequence(NameField),
}
