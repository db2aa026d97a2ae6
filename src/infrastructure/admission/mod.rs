//! Request admission for address lookups

mod service;

pub use service::{Admission, AdmissionError, AdmissionService};
