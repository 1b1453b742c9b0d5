//! Record types and error definitions for the student registry.

use crate::summarization::SummarizationClientError;
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, IgnoredAny, MapAccess, Visitor},
};
use std::fmt;
use thiserror::Error;

/// Identifier assigned to a student by the store.
pub type StudentId = u64;

/// A stored student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Store-assigned identifier, unique and never reused.
    pub id: StudentId,
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: i64,
    /// Contact address.
    pub email: String,
}

/// Write payload for create and update requests.
///
/// Carries every field except the identifier, which only the store assigns. Decoding is lenient:
///
/// - keys match case-insensitively (`Name`, `EMAIL`), and a later duplicate wins;
/// - missing or `null` fields stay empty so the validation rules, not the decoder, report them;
/// - unknown keys, including `id`, are ignored, and a bare `null` body decodes to an empty draft.
///
/// Wrong value types and non-object bodies are still decoding errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudentDraft {
    /// Display name; must be non-empty.
    pub name: String,
    /// Age in years; must not be negative.
    pub age: i64,
    /// Contact address; must match the accepted email shape.
    pub email: String,
}

impl<'de> Deserialize<'de> for StudentDraft {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DraftVisitor)
    }
}

struct DraftVisitor;

impl<'de> Visitor<'de> for DraftVisitor {
    type Value = StudentDraft;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a student object")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(StudentDraft::default())
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut draft = StudentDraft::default();
        while let Some(key) = map.next_key::<String>()? {
            if key.eq_ignore_ascii_case("name") {
                if let Some(name) = map.next_value::<Option<String>>()? {
                    draft.name = name;
                }
            } else if key.eq_ignore_ascii_case("age") {
                if let Some(age) = map.next_value::<Option<i64>>()? {
                    draft.age = age;
                }
            } else if key.eq_ignore_ascii_case("email") {
                if let Some(email) = map.next_value::<Option<String>>()? {
                    draft.email = email;
                }
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(draft)
    }
}

impl StudentDraft {
    /// Convenience constructor used by seeds and tests.
    pub fn new(name: impl Into<String>, age: i64, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            email: email.into(),
        }
    }

    pub(crate) fn into_student(self, id: StudentId) -> Student {
        Student {
            id,
            name: self.name,
            age: self.age,
            email: self.email,
        }
    }
}

/// Errors raised by the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record carries the requested identifier.
    #[error("student {0} not found")]
    NotFound(StudentId),
    /// The store lock was poisoned by a panic in another request.
    #[error("student store is unavailable")]
    Poisoned,
}

/// Field-level rejections produced by the validation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `name` was empty.
    #[error("Name cannot be empty")]
    EmptyName,
    /// `age` was below zero.
    #[error("Age cannot be negative")]
    NegativeAge,
    /// `email` did not match the accepted pattern.
    #[error("Invalid email format")]
    InvalidEmail,
}

/// Errors surfaced by [`crate::students::StudentApi`] operations.
#[derive(Debug, Error)]
pub enum StudentError {
    /// Write payload failed validation before reaching the store.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Store lookup or mutation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The summarization provider could not produce a summary.
    #[error("Failed to generate summary: {0}")]
    Summarization(#[from] SummarizationClientError),
}

impl StudentError {
    /// Whether the error means the requested record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(StoreError::NotFound(_)))
    }
}
