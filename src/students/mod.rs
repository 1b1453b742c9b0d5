//! Student registry: record types, validation, the in-memory store, and the service facade.

mod service;
mod store;
pub mod types;
pub mod validation;

pub use service::{StudentApi, StudentService};
pub use store::StudentStore;
pub use types::{
    StoreError, Student, StudentDraft, StudentError, StudentId, ValidationError,
};
pub use validation::{is_valid_email, validate_draft};
