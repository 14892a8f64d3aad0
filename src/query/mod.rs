pub mod filter;
pub mod server;

pub use filter::{browse, resolve_language, ExamTypeFilter, Projection, Selection};
pub use server::BrowseServer;
