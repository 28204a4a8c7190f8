//! Command implementations for the ax CLI

mod get;
mod list;
mod search;

pub use get::execute as get_document;
pub use list::execute as list_documents;
pub use search::execute as search;
