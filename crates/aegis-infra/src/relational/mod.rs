//! Relational source read by the contact-submission migration utility.

pub mod contact_submission;

mod source;

pub use source::{connect, fetch_submissions};
