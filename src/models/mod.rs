pub mod contact;
pub mod content;

pub use contact::{ContactRecord, ContactSubmission};
pub use content::ContentDocument;
