mod document;

pub use document::{Document, DocumentChanges};
