//! Filters over stored grant documents.
//!
//! A [`GrantFilter`] is a conjunction of clauses. Collections either evaluate
//! it in-process with [`GrantFilter::matches`] or render it into their own
//! query language.

use std::fmt;

use time::OffsetDateTime;

use crate::types::GrantDocument;

/// Text fields of a grant document that can be matched by equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantField {
    Key,
    Type,
    SubjectId,
    ClientId,
}

impl GrantField {
    /// Name of the field in the stored document.
    #[must_use]
    pub fn document_name(self) -> &'static str {
        match self {
            Self::Key => "Key",
            Self::Type => "Type",
            Self::SubjectId => "SubjectId",
            Self::ClientId => "ClientId",
        }
    }

    fn value_of(self, doc: &GrantDocument) -> &str {
        match self {
            Self::Key => &doc.key,
            Self::Type => &doc.grant_type,
            Self::SubjectId => &doc.subject_id,
            Self::ClientId => &doc.client_id,
        }
    }
}

impl fmt::Display for GrantField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.document_name())
    }
}

/// A single filter clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// Field equals the given value.
    Equals { field: GrantField, value: String },
    /// `Expiration` is set and strictly before the given instant.
    ExpiresBefore(OffsetDateTime),
}

impl Clause {
    fn matches(&self, doc: &GrantDocument) -> bool {
        match self {
            Self::Equals { field, value } => field.value_of(doc) == value,
            Self::ExpiresBefore(instant) => doc.expiration.is_some_and(|exp| exp < *instant),
        }
    }
}

/// Conjunction of clauses. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantFilter {
    clauses: Vec<Clause>,
}

impl GrantFilter {
    /// Filter matching every document.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Adds an equality clause.
    #[must_use]
    pub fn eq(mut self, field: GrantField, value: impl Into<String>) -> Self {
        self.clauses.push(Clause::Equals {
            field,
            value: value.into(),
        });
        self
    }

    /// Adds an expiration clause.
    #[must_use]
    pub fn expires_before(mut self, instant: OffsetDateTime) -> Self {
        self.clauses.push(Clause::ExpiresBefore(instant));
        self
    }

    #[must_use]
    pub fn by_key(key: &str) -> Self {
        Self::all().eq(GrantField::Key, key)
    }

    #[must_use]
    pub fn by_subject(subject_id: &str) -> Self {
        Self::all().eq(GrantField::SubjectId, subject_id)
    }

    #[must_use]
    pub fn by_subject_and_client(subject_id: &str, client_id: &str) -> Self {
        Self::by_subject(subject_id).eq(GrantField::ClientId, client_id)
    }

    #[must_use]
    pub fn by_subject_client_and_type(subject_id: &str, client_id: &str, grant_type: &str) -> Self {
        Self::by_subject_and_client(subject_id, client_id).eq(GrantField::Type, grant_type)
    }

    #[must_use]
    pub fn expired_before(instant: OffsetDateTime) -> Self {
        Self::all().expires_before(instant)
    }

    /// The clauses, in the order they were added.
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Evaluates the filter against a document.
    #[must_use]
    pub fn matches(&self, doc: &GrantDocument) -> bool {
        self.clauses.iter().all(|c| c.matches(doc))
    }
}
